//! API client module for the Respio listing service

mod chat;
pub mod client;
mod error;
mod listings;
#[cfg(test)]
mod testutil;

use anyhow::Result;

pub use chat::send_message_data;
pub use error::TransportError;
pub use listings::{create_listing_data, list_listings_data, search_listings_data};

use crate::models::{ListingDraft, MessageDraft};

/// Fetch and print all listings
pub async fn list_listings() -> Result<()> {
    listings::list_listings().await
}

/// Search listings by MLS number and print the matches
pub async fn search_listings(query: &str) -> Result<()> {
    listings::search_listings(query).await
}

/// Create a listing from a draft and print the stored record
pub async fn create_listing(draft: ListingDraft) -> Result<()> {
    listings::create_listing(draft).await
}

/// Send a message to a chat
pub async fn send_message(chat_id: i64, draft: &MessageDraft) -> Result<()> {
    chat::send_message(chat_id, draft).await
}
