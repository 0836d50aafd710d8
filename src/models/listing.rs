//! Listing-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder document reference for listings created without an upload.
pub const NO_DOCUMENT: &str = "No document";

/// A property listing as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub mls_number: String,
    pub address: String,
    pub price: f64,
    /// Buyer's-agent compensation, free text (percentage or flat fee).
    pub compensation: String,
    /// Opaque reference to an uploaded file: a filename or [`NO_DOCUMENT`].
    pub document: String,
    pub agent_name: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A not-yet-persisted listing, submitted as the `POST /listings` body.
///
/// The server assigns `id`, `agentName`/`companyName`, and the timestamps;
/// a listing is read back through the same shape it was created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub mls_number: String,
    pub address: String,
    pub price: f64,
    pub compensation: String,
    pub document: String,
}
