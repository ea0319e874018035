// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Background query task and request/event channel types.

use std::sync::Arc;

use ragchat_client::{BackendError, ChatAnswer, ChatBackend};
use tokio::sync::mpsc;
use tracing::debug;

/// Request sent from the TUI to the background task.
#[derive(Debug)]
pub enum BackendRequest {
    Query(String),
}

/// Event sent back to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    Finished(Result<ChatAnswer, BackendError>),
}

/// Background task that owns the backend and forwards outcomes to the TUI.
///
/// Requests are handled one at a time; the controller never has more than
/// one outstanding, so no queueing beyond the channel is needed.
pub async fn backend_task(
    backend: Arc<dyn ChatBackend>,
    mut rx: mpsc::Receiver<BackendRequest>,
    tx: mpsc::Sender<BackendEvent>,
) {
    while let Some(req) = rx.recv().await {
        match req {
            BackendRequest::Query(query) => {
                debug!(query_len = query.len(), endpoint = backend.endpoint(), "backend task received query");
                let outcome = backend.query(&query).await;
                if tx.send(BackendEvent::Finished(outcome)).await.is_err() {
                    debug!("TUI gone, backend task exiting");
                    break;
                }
            }
        }
    }
}
