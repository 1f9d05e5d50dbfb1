use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::api::client::RustlinksClient;
use crate::error::ErrorKind;

use super::session::RequestId;
use super::state::{AppMessage, ServerHealth};

pub(super) fn spawn_debounce(
    delay: Duration,
    generation: u64,
    tx: &mpsc::UnboundedSender<AppMessage>,
) -> AbortHandle {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(AppMessage::DebounceElapsed(generation));
    })
    .abort_handle()
}

pub(super) fn spawn_search(
    client: &RustlinksClient,
    request: RequestId,
    query: String,
    tx: &mpsc::UnboundedSender<AppMessage>,
) -> AbortHandle {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.search(&query).await.map_err(|e| {
            tracing::warn!(request, %query, error = %e, "search request failed");
            ErrorKind::for_search(&e)
        });
        let _ = tx.send(AppMessage::SearchSettled { request, outcome });
    })
    .abort_handle()
}

pub(super) fn spawn_lookup(
    client: &RustlinksClient,
    request: RequestId,
    alias: String,
    tx: &mpsc::UnboundedSender<AppMessage>,
) -> AbortHandle {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.lookup(&alias).await.map_err(|e| {
            tracing::warn!(request, %alias, error = %e, "lookup request failed");
            ErrorKind::for_lookup(&e)
        });
        let _ = tx.send(AppMessage::ResolutionSettled { request, outcome });
    })
    .abort_handle()
}

pub(super) fn spawn_create(
    client: &RustlinksClient,
    request: RequestId,
    target: String,
    tx: &mpsc::UnboundedSender<AppMessage>,
) -> AbortHandle {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.create(&target).await.map_err(|e| {
            tracing::warn!(
                request,
                %target,
                error = %e,
                detail = %e.server_message().unwrap_or_default(),
                "create request failed"
            );
            ErrorKind::for_create(&e)
        });
        let _ = tx.send(AppMessage::ResolutionSettled { request, outcome });
    })
    .abort_handle()
}

pub(super) fn spawn_health_check(client: &RustlinksClient, tx: &mpsc::UnboundedSender<AppMessage>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let health = match client.health().await {
            Ok(()) => ServerHealth::Up,
            Err(e) => {
                tracing::warn!(server = client.base_url(), error = %e, "health check failed");
                ServerHealth::Down
            }
        };
        let _ = tx.send(AppMessage::HealthChecked(health));
    });
}
