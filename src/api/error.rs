//! Transport failure taxonomy for the listing service API

use thiserror::Error;

/// Any failure arising from a network call: timeout, connection failure,
/// non-success status, or an undecodable body.
///
/// Operations surface this unchanged to their caller; nothing retries and
/// nothing is treated as fatal to the process.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The fixed per-request budget elapsed before a response arrived.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection-level failure (DNS, refused, reset).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Classify a reqwest send failure.
    pub(super) fn from_send(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source,
            }
        }
    }
}
