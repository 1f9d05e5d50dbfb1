use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::api::client::RustlinksClient;

use super::session::Effect;
use super::state::AppMessage;
use super::tasks::{spawn_create, spawn_debounce, spawn_lookup, spawn_search};

/// Performs session effects. Owns the debounce timer and the handles of the
/// outstanding search and resolution tasks; aborting them is best-effort, the
/// session drops whatever still reports back.
pub(super) struct EffectRunner {
    client: RustlinksClient,
    tx: mpsc::UnboundedSender<AppMessage>,
    debounce: Duration,
    debounce_timer: Option<AbortHandle>,
    search_task: Option<AbortHandle>,
    resolve_task: Option<AbortHandle>,
}

impl EffectRunner {
    pub(super) fn new(
        client: RustlinksClient,
        tx: mpsc::UnboundedSender<AppMessage>,
        debounce: Duration,
    ) -> Self {
        Self {
            client,
            tx,
            debounce,
            debounce_timer: None,
            search_task: None,
            resolve_task: None,
        }
    }

    pub(super) fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        tracing::trace!(?effect, "applying effect");
        match effect {
            Effect::ScheduleSearch { generation } => {
                abort(&mut self.debounce_timer);
                self.debounce_timer = Some(spawn_debounce(self.debounce, generation, &self.tx));
            }
            Effect::CancelDebounce => abort(&mut self.debounce_timer),
            Effect::Search { request, query } => {
                abort(&mut self.search_task);
                self.search_task = Some(spawn_search(&self.client, request, query, &self.tx));
            }
            Effect::CancelSearch => abort(&mut self.search_task),
            Effect::Lookup { request, alias } => {
                abort(&mut self.resolve_task);
                self.resolve_task = Some(spawn_lookup(&self.client, request, alias, &self.tx));
            }
            Effect::Create { request, target } => {
                abort(&mut self.resolve_task);
                self.resolve_task = Some(spawn_create(&self.client, request, target, &self.tx));
            }
            Effect::CancelResolution => abort(&mut self.resolve_task),
        }
    }

    pub(super) fn shutdown(&mut self) {
        abort(&mut self.debounce_timer);
        abort(&mut self.search_task);
        abort(&mut self.resolve_task);
    }
}

fn abort(slot: &mut Option<AbortHandle>) {
    if let Some(handle) = slot.take() {
        handle.abort();
    }
}
