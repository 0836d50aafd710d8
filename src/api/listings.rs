//! Listing endpoints: list, search, create
//!
//! Thin passthrough calls -- the client forwards payloads verbatim,
//! performs no local filtering or validation, and surfaces failures
//! unchanged to the caller.

use anyhow::Result;

use super::client::RespioClient;
use super::error::TransportError;
use crate::models::{Listing, ListingDraft};

/// Fetch the full ordered set of listings known to the server.
pub async fn list_listings_data(client: &RespioClient) -> Result<Vec<Listing>, TransportError> {
    client.get_json("/listings").await
}

/// Search listings by MLS number.
///
/// The raw query string is forwarded as the `mlsNumber` parameter; matching
/// semantics (exact or substring) belong to the server, and an empty query
/// is forwarded as-is.
pub async fn search_listings_data(
    client: &RespioClient,
    query: &str,
) -> Result<Vec<Listing>, TransportError> {
    client
        .get_query_json("/listings/search", &[("mlsNumber", query)])
        .await
}

/// Create a listing from a draft.
///
/// Returns the stored record with server-assigned id and timestamps. No
/// idempotency key is attached, so a resubmitted draft creates a second
/// listing.
pub async fn create_listing_data(
    client: &RespioClient,
    draft: &ListingDraft,
) -> Result<Listing, TransportError> {
    client.post_json("/listings", draft).await
}

/// Fetch all listings and print them (CLI entry point).
pub async fn list_listings() -> Result<()> {
    let client = RespioClient::new()?;
    let listings = list_listings_data(&client).await?;

    println!("\nActive Listings:");
    println!("{:-<60}", "");

    if listings.is_empty() {
        println!("  (no listings)");
        return Ok(());
    }

    println!("You have {} active listings.\n", listings.len());
    for listing in &listings {
        print_listing(listing);
    }

    Ok(())
}

/// Search listings and print the matches (CLI entry point).
pub async fn search_listings(query: &str) -> Result<()> {
    let client = RespioClient::new()?;
    let results = search_listings_data(&client, query).await?;

    println!("\nSearch Results for MLS# {:?}:", query);
    println!("{:-<60}", "");

    if results.is_empty() {
        println!("  (no matches)");
        return Ok(());
    }

    for listing in &results {
        print_listing(listing);
    }

    Ok(())
}

/// Create a listing and print the stored record (CLI entry point).
pub async fn create_listing(draft: ListingDraft) -> Result<()> {
    let client = RespioClient::new()?;
    let listing = create_listing_data(&client, &draft).await?;

    println!("New listing created.");
    print_listing(&listing);

    Ok(())
}

fn print_listing(listing: &Listing) {
    println!("{} -- {}", listing.agent_name, listing.company_name);
    println!("  {}", listing.address);
    println!("  MLS# {}  Price: ${}", listing.mls_number, listing.price);
    if !listing.compensation.is_empty() {
        println!("  Compensation: {}", listing.compensation);
    }
    println!("  Document: {}", listing.document);
    println!(
        "  Created: {}  Updated: {}",
        listing.created_at, listing.updated_at
    );
    println!();
}
