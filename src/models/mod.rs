//! Data models for Respio entities

mod chat;
mod listing;
mod message;

pub use chat::*;
pub use listing::*;
pub use message::*;
