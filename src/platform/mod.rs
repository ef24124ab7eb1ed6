//! Transport seams for the bulk pipeline
//!
//! The submission and fetch engines reach the backend only through these
//! traits, so the same logic runs against HTTP, mocks, or anything else.

mod http;
mod source;

pub use http::HttpRemediationService;
pub use source::FnPageSource;

use crate::error::Result;
use crate::types::{CreatedRemediation, Page, RemediationPayload};
use async_trait::async_trait;

/// Remediation plan mutations
#[async_trait]
pub trait RemediationService: Send + Sync {
    /// Create a new plan; the response carries its id
    async fn create_remediation(&self, payload: &RemediationPayload) -> Result<CreatedRemediation>;

    /// Add content to an existing plan
    async fn update_remediation(&self, id: &str, payload: &RemediationPayload) -> Result<()>;
}

/// A paginated collection
///
/// Filters or other request parameters are captured by the implementor.
#[async_trait]
pub trait PageSource<T: Send + 'static>: Send + Sync {
    /// Fetch `limit` rows starting at `offset`
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<T>>;
}
