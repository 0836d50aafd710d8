//! Message-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat utterance, as persisted by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A not-yet-persisted message, submitted as the
/// `POST /chats/{chatId}/messages` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub content: String,
    pub sender_id: i64,
    pub receiver_id: i64,
}
