//! Loopback fixture server for API client tests
//!
//! Implements the four listing-service routes over an in-memory store with
//! sequential ids. Stands in for any conforming backend; substring MLS
//! matching is a fixture choice, not a client contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::models::{Listing, ListingDraft, Message, MessageDraft};

/// Shared fixture state, inspectable and tunable from tests.
pub struct Fixture {
    listings: Mutex<Vec<Listing>>,
    next_id: AtomicI64,
    delay_ms: AtomicU64,
    fail: AtomicBool,
}

impl Fixture {
    fn new() -> Self {
        Self {
            listings: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            delay_ms: AtomicU64::new(0),
            fail: AtomicBool::new(false),
        }
    }

    fn assign_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Delay every subsequent response by the given duration.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Make every subsequent request answer 500.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    async fn gate(&self) -> Result<(), StatusCode> {
        let ms = self.delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Ok(())
    }
}

/// Spawn the fixture server on a loopback port.
///
/// Returns the base URL (including the `/api` prefix) and the shared state.
pub async fn spawn() -> (String, Arc<Fixture>) {
    let fixture = Arc::new(Fixture::new());

    let app = Router::new()
        .route("/api/listings", get(list_listings).post(create_listing))
        .route("/api/listings/search", get(search_listings))
        .route("/api/chats/:chat_id/messages", post(create_message))
        .with_state(fixture.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), fixture)
}

async fn list_listings(
    State(fixture): State<Arc<Fixture>>,
) -> Result<Json<Vec<Listing>>, StatusCode> {
    fixture.gate().await?;
    Ok(Json(fixture.listings.lock().await.clone()))
}

async fn search_listings(
    State(fixture): State<Arc<Fixture>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Listing>>, StatusCode> {
    fixture.gate().await?;

    // Substring match; the empty query therefore matches everything.
    let query = params.get("mlsNumber").cloned().unwrap_or_default();
    let listings = fixture.listings.lock().await;
    let matches = listings
        .iter()
        .filter(|l| l.mls_number.contains(&query))
        .cloned()
        .collect();
    Ok(Json(matches))
}

async fn create_listing(
    State(fixture): State<Arc<Fixture>>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<Listing>, StatusCode> {
    fixture.gate().await?;

    let now = Utc::now();
    let listing = Listing {
        id: fixture.assign_id(),
        mls_number: draft.mls_number,
        address: draft.address,
        price: draft.price,
        compensation: draft.compensation,
        document: draft.document,
        agent_name: "John Doe".to_string(),
        company_name: "Respio Realty".to_string(),
        created_at: now,
        updated_at: now,
    };
    fixture.listings.lock().await.push(listing.clone());
    Ok(Json(listing))
}

async fn create_message(
    State(fixture): State<Arc<Fixture>>,
    Path(_chat_id): Path<i64>,
    Json(draft): Json<MessageDraft>,
) -> Result<Json<Message>, StatusCode> {
    fixture.gate().await?;

    Ok(Json(Message {
        id: fixture.assign_id(),
        sender_id: draft.sender_id,
        receiver_id: draft.receiver_id,
        content: draft.content,
        timestamp: Utc::now(),
    }))
}
