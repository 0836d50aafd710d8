//! Respio CLI - Lightweight client for the Respio listing service
//!
//! A terminal-based dashboard for browsing, creating, and searching
//! property listings, and for messaging other agents.

mod api;
mod config;
mod models;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use models::{ListingDraft, MessageDraft, NO_DOCUMENT};

#[derive(Parser)]
#[command(name = "respio-cli")]
#[command(about = "Lightweight CLI client for the Respio listing service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List active listings
    Listings,

    /// Search listings by MLS number
    Search {
        /// MLS number query (matching is server-defined)
        mls_number: String,
    },

    /// Create a new listing
    Create {
        /// MLS number for the external registry
        #[arg(long)]
        mls_number: String,

        /// Property address
        #[arg(long)]
        address: String,

        /// Asking price
        #[arg(long)]
        price: f64,

        /// Buyer's agent compensation (e.g., "2.5%" or "$5000")
        #[arg(long, default_value = "")]
        compensation: String,

        /// Name of an uploaded document
        #[arg(long)]
        document: Option<String>,
    },

    /// Send a message to a chat
    Send {
        /// Chat id
        #[arg(short, long)]
        to: i64,

        /// Receiving agent id
        #[arg(short, long)]
        receiver: i64,

        /// Message content
        message: String,
    },

    /// Launch the terminal user interface
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Listings => {
            tracing::info!("Fetching listings...");
            api::list_listings().await?;
        }
        Commands::Search { mls_number } => {
            api::search_listings(&mls_number).await?;
        }
        Commands::Create {
            mls_number,
            address,
            price,
            compensation,
            document,
        } => {
            tracing::info!("Creating listing...");
            let draft = ListingDraft {
                mls_number,
                address,
                price,
                compensation,
                document: document.unwrap_or_else(|| NO_DOCUMENT.to_string()),
            };
            api::create_listing(draft).await?;
        }
        Commands::Send {
            to,
            receiver,
            message,
        } => {
            tracing::info!("Sending message...");
            let sender = config::Config::load()?.agent_id;
            let draft = MessageDraft {
                content: message,
                sender_id: sender,
                receiver_id: receiver,
            };
            api::send_message(to, &draft).await?;
        }
        Commands::Tui => {
            tui::run().await?;
        }
    }

    Ok(())
}
