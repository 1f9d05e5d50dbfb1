mod effects;
mod input;
mod search;
mod session;
mod state;
mod tasks;

pub use input::InputLine;
pub use search::Candidate;
pub use session::{Effect, Resolution};
pub use state::*;

use effects::EffectRunner;
use tasks::spawn_health_check;

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::api::client::RustlinksClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::keys::preset::Action;
use crate::keys::KeybindingMap;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Fold one message into the state. Returns the effects the caller must run.
pub fn update(state: &mut AppState, msg: AppMessage, keybindings: &KeybindingMap) -> Vec<Effect> {
    match msg {
        AppMessage::Key(key) => handle_key(state, &key, keybindings),
        AppMessage::DebounceElapsed(generation) => state.session.debounce_elapsed(generation),
        AppMessage::SearchSettled { request, outcome } => {
            state.session.search_settled(request, outcome);
            Vec::new()
        }
        AppMessage::ResolutionSettled { request, outcome } => {
            state.session.resolution_settled(request, outcome);
            Vec::new()
        }
        AppMessage::HealthChecked(health) => {
            state.health = health;
            Vec::new()
        }
        AppMessage::Tick => {
            if state.busy() {
                state.spinner_frame = state.spinner_frame.wrapping_add(1);
            }
            Vec::new()
        }
    }
}

fn handle_key(state: &mut AppState, key: &KeyEvent, keybindings: &KeybindingMap) -> Vec<Effect> {
    if state.show_help {
        // Any key closes help
        state.show_help = false;
        return Vec::new();
    }

    if let Some(action) = keybindings.resolve(key) {
        return handle_action(state, action);
    }

    if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
        return Vec::new();
    }

    let session = &mut state.session;
    match key.code {
        KeyCode::Char(c) => session.edit_input(|line| line.insert_char(c)),
        KeyCode::Backspace => session.edit_input(InputLine::delete_back),
        KeyCode::Delete => session.edit_input(InputLine::delete_forward),
        KeyCode::Left => session.edit_input(InputLine::move_left),
        KeyCode::Right => session.edit_input(InputLine::move_right),
        KeyCode::Home => session.edit_input(InputLine::move_home),
        KeyCode::End => session.edit_input(InputLine::move_end),
        _ => Vec::new(),
    }
}

fn handle_action(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Select => state.session.select_highlighted(),
        Action::Clear => state.session.clear(),
        Action::Next => {
            state.session.highlight_next();
            Vec::new()
        }
        Action::Prev => {
            state.session.highlight_prev();
            Vec::new()
        }
        Action::Help => {
            state.show_help = true;
            Vec::new()
        }
        Action::Quit => {
            state.should_quit = true;
            Vec::new()
        }
    }
}

pub async fn run(config: &AppConfig, terminal: &mut DefaultTerminal) -> Result<()> {
    let keybindings = KeybindingMap::with_overrides(&config.keybindings.bindings)?;
    let mut state = AppState::new(config, keybindings.hints());

    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();

    let client = RustlinksClient::new(
        &config.server.base_url,
        config.api_token(),
        config.request_timeout(),
    )?;
    tracing::info!(server = client.base_url(), "session started");

    spawn_health_check(&client, &tx);
    let mut runner = EffectRunner::new(client, tx.clone(), config.debounce());

    // Spawn event reader task
    let event_tx = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if event_tx.send(AppMessage::Key(key)).is_err() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "terminal event stream failed");
                    break;
                }
                None => break,
                _ => {}
            }
        }
    });

    // Spawn tick timer
    let tick_tx = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tick_tx.send(AppMessage::Tick).is_err() {
                break;
            }
        }
    });

    // Main loop
    loop {
        terminal.draw(|frame| crate::ui::render(frame, &state))?;

        let Some(msg) = rx.recv().await else {
            break;
        };
        let effects = update(&mut state, msg, &keybindings);
        runner.run(effects);

        if state.should_quit {
            break;
        }
    }

    runner.shutdown();
    tracing::info!("session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{LinkSummary, Rustlink};
    use crate::error::ErrorKind;
    use std::collections::HashMap;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn keymap() -> KeybindingMap {
        KeybindingMap::with_overrides(&HashMap::new()).unwrap()
    }

    fn test_state() -> AppState {
        AppState::new(&AppConfig::defaults(), keymap().hints())
    }

    fn key(code: KeyCode) -> AppMessage {
        AppMessage::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppMessage {
        AppMessage::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(state: &mut AppState, keys: &KeybindingMap, text: &str) -> Vec<Effect> {
        text.chars()
            .flat_map(|c| update(state, key(KeyCode::Char(c)), keys))
            .collect()
    }

    fn hit(alias: &str, target: &str) -> LinkSummary {
        LinkSummary {
            alias: alias.into(),
            target: target.into(),
        }
    }

    // --- key handling ---

    #[test]
    fn typing_edits_input_and_schedules_search() {
        let keys = keymap();
        let mut state = test_state();
        let effects = type_text(&mut state, &keys, "gh");

        assert_eq!(state.session.input().text(), "gh");
        assert!(matches!(effects.last(), Some(Effect::ScheduleSearch { .. })));
    }

    #[test]
    fn shifted_characters_are_typed() {
        let keys = keymap();
        let mut state = test_state();
        let shifted = AppMessage::Key(KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT));
        update(&mut state, shifted, &keys);
        assert_eq!(state.session.input().text(), "D");
    }

    #[test]
    fn unbound_control_chords_are_ignored() {
        let keys = keymap();
        let mut state = test_state();
        assert!(update(&mut state, ctrl('z'), &keys).is_empty());
        assert!(state.session.input().is_empty());
    }

    #[test]
    fn editing_keys_move_and_delete() {
        let keys = keymap();
        let mut state = test_state();
        type_text(&mut state, &keys, "abc");
        update(&mut state, key(KeyCode::Left), &keys);
        update(&mut state, key(KeyCode::Backspace), &keys);
        assert_eq!(state.session.input().text(), "ac");

        update(&mut state, key(KeyCode::Home), &keys);
        update(&mut state, key(KeyCode::Delete), &keys);
        assert_eq!(state.session.input().text(), "c");

        update(&mut state, key(KeyCode::End), &keys);
        assert_eq!(state.session.input().cursor(), 1);
    }

    #[test]
    fn escape_clears_everything() {
        let keys = keymap();
        let mut state = test_state();
        type_text(&mut state, &keys, "example.com");
        let effects = update(&mut state, key(KeyCode::Esc), &keys);

        assert!(effects.contains(&Effect::CancelResolution));
        assert!(state.session.input().is_empty());
        assert!(state.session.candidates().is_empty());
    }

    #[test]
    fn enter_selects_highlighted_candidate() {
        let keys = keymap();
        let mut state = test_state();
        type_text(&mut state, &keys, "example.com");

        let effects = update(&mut state, key(KeyCode::Enter), &keys);
        assert!(effects.contains(&Effect::Create {
            request: 1,
            target: "example.com".into()
        }));
        assert!(state.busy());
    }

    #[test]
    fn arrows_move_highlight() {
        let keys = keymap();
        let mut state = test_state();
        let effects = type_text(&mut state, &keys, "fo");
        let generation = match effects.last() {
            Some(Effect::ScheduleSearch { generation }) => *generation,
            other => panic!("expected a scheduled search, got {:?}", other),
        };
        let search = update(&mut state, AppMessage::DebounceElapsed(generation), &keys);
        let request = match search.as_slice() {
            [Effect::Search { request, .. }] => *request,
            other => panic!("expected one search, got {:?}", other),
        };
        update(
            &mut state,
            AppMessage::SearchSettled {
                request,
                outcome: Ok(vec![hit("foo", "foo.com")]),
            },
            &keys,
        );

        update(&mut state, key(KeyCode::Down), &keys);
        assert_eq!(state.session.selected(), 1);
        update(&mut state, key(KeyCode::Up), &keys);
        assert_eq!(state.session.selected(), 0);
    }

    #[test]
    fn help_opens_and_any_key_closes_it() {
        let keys = keymap();
        let mut state = test_state();
        update(&mut state, key(KeyCode::F(1)), &keys);
        assert!(state.show_help);

        // The closing key is swallowed
        update(&mut state, key(KeyCode::Char('x')), &keys);
        assert!(!state.show_help);
        assert!(state.session.input().is_empty());
    }

    #[test]
    fn ctrl_c_quits() {
        let keys = keymap();
        let mut state = test_state();
        update(&mut state, ctrl('c'), &keys);
        assert!(state.should_quit);
    }

    #[test]
    fn overridden_binding_replaces_default() {
        let overrides = HashMap::from([("quit".to_string(), "Ctrl+q".to_string())]);
        let keys = KeybindingMap::with_overrides(&overrides).unwrap();
        let mut state = test_state();

        update(&mut state, ctrl('c'), &keys);
        assert!(!state.should_quit);
        update(&mut state, ctrl('q'), &keys);
        assert!(state.should_quit);
    }

    // --- messages ---

    #[test]
    fn health_check_updates_header_state() {
        let keys = keymap();
        let mut state = test_state();
        assert_eq!(state.health, ServerHealth::Unknown);
        update(&mut state, AppMessage::HealthChecked(ServerHealth::Down), &keys);
        assert_eq!(state.health, ServerHealth::Down);
    }

    #[test]
    fn spinner_only_advances_while_busy() {
        let keys = keymap();
        let mut state = test_state();
        update(&mut state, AppMessage::Tick, &keys);
        assert_eq!(state.spinner_frame, 0);

        type_text(&mut state, &keys, "example.com");
        update(&mut state, key(KeyCode::Enter), &keys);
        update(&mut state, AppMessage::Tick, &keys);
        update(&mut state, AppMessage::Tick, &keys);
        assert_eq!(state.spinner_frame, 2);
    }

    #[test]
    fn resolution_failure_surfaces_error_notice() {
        let keys = keymap();
        let mut state = test_state();
        type_text(&mut state, &keys, "example.com");
        update(&mut state, key(KeyCode::Enter), &keys);
        update(
            &mut state,
            AppMessage::ResolutionSettled {
                request: 1,
                outcome: Err(ErrorKind::CreateError),
            },
            &keys,
        );

        let notice = state.error_notice().unwrap();
        assert_eq!(notice.title, "Create Failed");
        assert!(!state.busy());
    }

    // --- against a live mock server ---

    struct Harness {
        state: AppState,
        keys: KeybindingMap,
        runner: EffectRunner,
        rx: mpsc::UnboundedReceiver<AppMessage>,
    }

    impl Harness {
        fn new(server: &MockServer) -> Self {
            let mut config = AppConfig::defaults();
            config.server.base_url = server.uri();
            let client =
                RustlinksClient::new(&server.uri(), None, config.request_timeout()).unwrap();
            let (tx, rx) = mpsc::unbounded_channel();
            let keys = keymap();
            Self {
                state: AppState::new(&config, keys.hints()),
                keys,
                runner: EffectRunner::new(client, tx, Duration::from_millis(20)),
                rx,
            }
        }

        fn send(&mut self, msg: AppMessage) {
            let effects = update(&mut self.state, msg, &self.keys);
            self.runner.run(effects);
        }

        fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.send(key(KeyCode::Char(c)));
            }
        }

        async fn pump_until(&mut self, done: impl Fn(&AppState) -> bool) {
            tokio::time::timeout(Duration::from_secs(5), async {
                while !done(&self.state) {
                    let msg = self.rx.recv().await.expect("channel closed");
                    self.send(msg);
                }
            })
            .await
            .expect("timed out waiting for the session");
        }
    }

    #[tokio::test]
    async fn shortening_unknown_url_creates_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/links"))
            .and(body_json(serde_json::json!({"url": "example.com"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({
                        "alias": "x7k2",
                        "url": "example.com"
                    }))
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut h = Harness::new(&server);
        h.type_text("example.com");

        // Double submit while the first is outstanding
        h.send(key(KeyCode::Enter));
        h.send(key(KeyCode::Enter));
        h.pump_until(|s| s.session.resolved_link().is_some()).await;

        assert_eq!(
            h.state.session.resolved_link(),
            Some(&Rustlink {
                alias: "x7k2".into(),
                target: "example.com".into(),
                views: None,
            })
        );
    }

    #[tokio::test]
    async fn later_query_wins_over_slow_earlier_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/links/search"))
            .and(body_json(serde_json::json!({"query": "ab"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "results": [{"alias": "ab", "url": "https://ab.dev"}]
                    }))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/links/search"))
            .and(body_json(serde_json::json!({"query": "abc"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"alias": "abc", "url": "https://abc.dev"}]
            })))
            .mount(&server)
            .await;

        let mut h = Harness::new(&server);
        h.type_text("ab");
        h.pump_until(|s| s.session.searching()).await;
        h.type_text("c");
        h.pump_until(|s| s.session.candidates().iter().any(|c| c.alias() == Some("abc")))
            .await;

        // Give the slow response time to land if it was going to.
        tokio::time::sleep(Duration::from_millis(500)).await;
        while let Ok(msg) = h.rx.try_recv() {
            h.send(msg);
        }

        let aliases: Vec<Option<&str>> = h
            .state
            .session
            .candidates()
            .iter()
            .map(Candidate::alias)
            .collect();
        assert_eq!(aliases, vec![Some("abc")]);
    }

    #[tokio::test]
    async fn selecting_existing_link_looks_it_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/links/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"alias": "docs", "url": "https://docs.rs"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/links/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "alias": "docs",
                "url": "https://docs.rs",
                "views": {"today": 1, "week": 4, "all": 42}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut h = Harness::new(&server);
        h.type_text("do");
        h.pump_until(|s| s.session.candidates().len() == 2 && !s.session.searching())
            .await;

        h.send(key(KeyCode::Enter));
        h.pump_until(|s| !s.session.loading()).await;

        let link = h.state.session.resolved_link().unwrap();
        assert_eq!(link.alias, "docs");
        assert_eq!(link.views.map(|v| v.all), Some(42));
    }

    #[tokio::test]
    async fn search_outage_still_allows_shortening() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/links/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut h = Harness::new(&server);
        h.type_text("example.com");
        h.pump_until(|s| s.session.error_kind().is_some()).await;

        assert_eq!(h.state.session.error_kind(), Some(ErrorKind::SearchFailed));
        assert_eq!(
            h.state.session.candidates(),
            &[Candidate::Create {
                target: "example.com".into()
            }]
        );
    }
}
