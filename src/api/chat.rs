//! Chat messaging endpoint
//!
//! One-shot sends over the shared HTTP client. There is no session object,
//! no retry, and no local queueing of unsent messages -- a failed send is
//! reported and the draft stays with the caller for resubmission.

use anyhow::Result;

use super::client::RespioClient;
use super::error::TransportError;
use crate::models::{Message, MessageDraft};

/// Post a message draft to a chat's message endpoint.
///
/// Returns the persisted message with server-assigned id and timestamp.
/// Empty-content enforcement is the caller's responsibility; the client
/// forwards the draft verbatim. On success the caller appends the returned
/// message to the matching chat and recomputes its summary.
pub async fn send_message_data(
    client: &RespioClient,
    chat_id: i64,
    draft: &MessageDraft,
) -> Result<Message, TransportError> {
    client
        .post_json(&format!("/chats/{}/messages", chat_id), draft)
        .await
}

/// Send a message to a chat and confirm (CLI entry point).
pub async fn send_message(chat_id: i64, draft: &MessageDraft) -> Result<()> {
    let client = RespioClient::new()?;
    let message = send_message_data(&client, chat_id, draft).await?;

    println!("Message sent (id {}, {}).", message.id, message.timestamp);
    Ok(())
}
