//! HTTP remediation service implementation

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::platform::{PageSource, RemediationService};
use crate::types::{CreatedRemediation, Page, RemediationPayload, RemediationSummary};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;
use url::Url;

/// Remediations REST client using reqwest
pub struct HttpRemediationService {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpRemediationService {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Base URL extended by `segments`, each percent-encoded as one segment
    ///
    /// Plan ids come from the user; `/`, `?` or `..` in an id must not
    /// change which resource is addressed.
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::Config(format!("base URL cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turn a non-success response into [`Error::Api`]
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemediationService for HttpRemediationService {
    async fn create_remediation(&self, payload: &RemediationPayload) -> Result<CreatedRemediation> {
        let url = self.api_url(&["remediations"])?;
        debug!("POST {url} ({} issues)", payload.add.issues.len());

        let response = self
            .authorized(self.client.post(url))
            .json(payload)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn update_remediation(&self, id: &str, payload: &RemediationPayload) -> Result<()> {
        let url = self.api_url(&["remediations", id])?;
        debug!("PATCH {url} ({} issues)", payload.add.issues.len());

        let response = self
            .authorized(self.client.patch(url))
            .json(payload)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PageSource<RemediationSummary> for HttpRemediationService {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<RemediationSummary>> {
        let url = self.api_url(&["remediations"])?;
        debug!("GET {url} offset={offset} limit={limit}");

        let response = self
            .authorized(self.client.get(url))
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }
}
