//! Async backend: bridges the sync TUI event loop with async API calls.
//!
//! Uses an mpsc channel pair. The TUI sends `BackendCommand` values, and a
//! background tokio task executes them and sends `BackendResponse` values
//! back. Each command runs as its own spawned task, so multiple calls can
//! be in flight at once with no coordination and no cancellation -- view
//! staleness is resolved at apply time via the ticket carried by
//! view-scoped responses.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api;
use crate::api::client::RespioClient;
use crate::api::TransportError;
use crate::models::{Listing, ListingDraft, Message, MessageDraft};

/// Commands sent from the TUI event loop to the async backend.
pub enum BackendCommand {
    LoadListings {
        ticket: u64,
    },
    SearchListings {
        query: String,
        ticket: u64,
    },
    CreateListing {
        draft: ListingDraft,
    },
    SendMessage {
        chat_id: i64,
        draft: MessageDraft,
    },
}

/// Responses from the async backend to the TUI.
pub enum BackendResponse {
    Listings {
        ticket: u64,
        result: Result<Vec<Listing>, TransportError>,
    },
    SearchResults {
        ticket: u64,
        result: Result<Vec<Listing>, TransportError>,
    },
    ListingCreated(Result<Listing, TransportError>),
    MessageSent {
        chat_id: i64,
        result: Result<Message, TransportError>,
    },
    /// Initial client construction failed (config issue).
    ClientError(String),
}

/// Handle for interacting with the backend from the TUI side.
pub struct Backend {
    cmd_tx: mpsc::UnboundedSender<BackendCommand>,
    resp_rx: mpsc::UnboundedReceiver<BackendResponse>,
}

impl Backend {
    /// Start the backend. Spawns a tokio task that processes commands.
    pub fn start() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        tokio::spawn(backend_loop(cmd_rx, resp_tx));

        Self { cmd_tx, resp_rx }
    }

    /// Send a command to the backend (non-blocking).
    pub fn send(&self, cmd: BackendCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Backend channel closed -- command dropped");
        }
    }

    /// Drain one pending response, if any (non-blocking, for the poll loop).
    pub fn try_recv(&mut self) -> Option<BackendResponse> {
        self.resp_rx.try_recv().ok()
    }

    /// Channel-only handle for unit tests: no client, no spawned task.
    #[cfg(test)]
    pub fn detached() -> (
        Self,
        mpsc::UnboundedReceiver<BackendCommand>,
        mpsc::UnboundedSender<BackendResponse>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        (Self { cmd_tx, resp_rx }, cmd_rx, resp_tx)
    }
}

/// Background loop that processes commands.
///
/// Creates a RespioClient once and reuses it across all API calls. If
/// client creation fails, sends a ClientError response and exits.
async fn backend_loop(
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    resp_tx: mpsc::UnboundedSender<BackendResponse>,
) {
    let client = match RespioClient::new() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            let _ = resp_tx.send(BackendResponse::ClientError(format!("{:#}", e)));
            return;
        }
    };

    while let Some(cmd) = cmd_rx.recv().await {
        let client = Arc::clone(&client);
        let resp_tx = resp_tx.clone();

        // Spawn each command as a separate task so we don't block the loop.
        tokio::spawn(async move {
            match cmd {
                BackendCommand::LoadListings { ticket } => {
                    let result = api::list_listings_data(&client).await;
                    let _ = resp_tx.send(BackendResponse::Listings { ticket, result });
                }
                BackendCommand::SearchListings { query, ticket } => {
                    let result = api::search_listings_data(&client, &query).await;
                    let _ = resp_tx.send(BackendResponse::SearchResults { ticket, result });
                }
                BackendCommand::CreateListing { draft } => {
                    let result = api::create_listing_data(&client, &draft).await;
                    let _ = resp_tx.send(BackendResponse::ListingCreated(result));
                }
                BackendCommand::SendMessage { chat_id, draft } => {
                    let result = api::send_message_data(&client, chat_id, &draft).await;
                    let _ = resp_tx.send(BackendResponse::MessageSent { chat_id, result });
                }
            }
        });
    }
}
