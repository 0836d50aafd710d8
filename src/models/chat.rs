//! Chat-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;

/// A chat participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub name: String,
}

/// A conversation between two or more agents.
///
/// `last_message` and `timestamp` denormalize the most recent message and
/// are recomputed locally on every append; the participant set is fixed at
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: i64,
    pub participants: Vec<Participant>,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Chat {
    /// Append a persisted message and recompute the denormalized summary.
    ///
    /// The single mutation point for a chat; callers invoke it only after
    /// the send call resolved successfully.
    pub fn push_message(&mut self, message: Message) {
        self.last_message = message.content.clone();
        self.timestamp = message.timestamp;
        self.messages.push(message);
    }

    /// The first participant other than the given agent (the counterparty
    /// in a 1:1 chat).
    pub fn other_participant(&self, agent_id: i64) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id != agent_id)
    }
}
