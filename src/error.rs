//! Error types for remedy

use thiserror::Error;

/// Errors produced by the bulk pipeline and its transports
#[derive(Debug, Error)]
pub enum Error {
    /// Opaque failure reported by an injected transport
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP client failure (connect, timeout, body decode)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The mandatory first batch failed, so no usable plan exists
    #[error("remediation plan could not be created: {0}")]
    CompleteFailure(String),

    /// Some non-mandatory batches failed; the plan exists but is incomplete
    #[error("{failed} of {total} batches failed")]
    PartialBatchFailure {
        /// Number of failed batches
        failed: usize,
        /// Number of batches attempted
        total: usize,
    },

    /// A page request failed while aggregating a paginated collection
    #[error("failed to fetch page at offset {offset}: {source}")]
    AggregateFetch {
        /// Offset of the page that failed
        offset: u64,
        /// Underlying transport failure
        #[source]
        source: Box<Error>,
    },

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed input
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
