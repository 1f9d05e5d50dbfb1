use crate::api::types::{LinkSummary, Rustlink};
use crate::config::AppConfig;
use crate::error::{ErrorKind, ErrorNotice};

use super::session::{RequestId, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerHealth {
    Unknown,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Key(crossterm::event::KeyEvent),
    DebounceElapsed(u64),
    SearchSettled {
        request: RequestId,
        outcome: Result<Vec<LinkSummary>, ErrorKind>,
    },
    ResolutionSettled {
        request: RequestId,
        outcome: Result<Rustlink, ErrorKind>,
    },
    HealthChecked(ServerHealth),
    Tick,
}

pub struct AppState {
    pub session: Session,
    pub server_url: String,
    pub redirect_base: String,
    pub health: ServerHealth,
    pub hints: Vec<(String, &'static str)>,
    pub show_help: bool,
    pub should_quit: bool,
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(config: &AppConfig, hints: Vec<(String, &'static str)>) -> Self {
        Self {
            session: Session::new(config.search.min_query_len),
            server_url: config.server.base_url.clone(),
            redirect_base: config.redirect_base().to_string(),
            health: ServerHealth::Unknown,
            hints,
            show_help: false,
            should_quit: false,
            spinner_frame: 0,
        }
    }

    pub fn error_notice(&self) -> Option<ErrorNotice> {
        self.session.error_kind().map(ErrorNotice::from_kind)
    }

    pub fn busy(&self) -> bool {
        self.session.loading() || self.session.searching()
    }
}
