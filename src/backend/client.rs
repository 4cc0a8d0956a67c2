//! HTTP client for the document store's REST interface

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, trace};

use crate::backend::error::{BackendError, BackendResult, ErrorCause};
use crate::types::SimulationConfig;

const NDJSON: &str = "application/x-ndjson";

/// Client for the index administration and bulk endpoints
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct IndexClient {
    http: Client,
    base_url: String,
}

impl IndexClient {
    /// Create a client for `base_url` with a fixed per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::ClientBuild)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Create a client for the backend and timeout of a run configuration
    pub fn from_config(config: &SimulationConfig) -> BackendResult<Self> {
        Self::new(config.backend_url(), Duration::from_millis(config.request_timeout_ms))
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Delete an index
    #[instrument(skip(self))]
    pub async fn delete_index(&self, index: &str) -> BackendResult<()> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|source| transport("delete index", &url, source))?;

        check("delete index", &url, response).await?;
        debug!("Deleted index {}", index);
        Ok(())
    }

    /// Create an index with default settings
    #[instrument(skip(self))]
    pub async fn create_index(&self, index: &str) -> BackendResult<()> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self
            .http
            .put(&url)
            .send()
            .await
            .map_err(|source| transport("create index", &url, source))?;

        check("create index", &url, response).await?;
        debug!("Created index {}", index);
        Ok(())
    }

    /// Put field mappings on an index
    ///
    /// `mapping` is the `{"properties": {...}}` document.
    #[instrument(skip(self, mapping))]
    pub async fn put_mapping(&self, index: &str, mapping: &Value) -> BackendResult<()> {
        let url = format!("{}/{}/_mapping", self.base_url, index);
        let response = self
            .http
            .put(&url)
            .json(mapping)
            .send()
            .await
            .map_err(|source| transport("put mapping", &url, source))?;

        check("put mapping", &url, response).await?;
        debug!("Updated mapping of index {}", index);
        Ok(())
    }

    /// Send one NDJSON bulk request
    ///
    /// A non-success status is an error. Per-document failures are reported in
    /// the returned [`BulkResponse`] and left to the caller.
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub async fn bulk(&self, index: &str, body: String) -> BackendResult<BulkResponse> {
        let url = format!("{}/{}/_bulk", self.base_url, index);
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, NDJSON)
            .body(body)
            .send()
            .await
            .map_err(|source| transport("bulk", &url, source))?;

        let response = check("bulk", &url, response).await?;
        let text = response
            .text()
            .await
            .map_err(|source| transport("bulk", &url, source))?;

        let parsed: BulkResponse = serde_json::from_str(&text)
            .map_err(|source| BackendError::Decode { operation: "bulk", source })?;
        trace!(took = parsed.took, errors = parsed.errors, "Bulk response");
        Ok(parsed)
    }
}

fn transport(operation: &'static str, url: &str, source: reqwest::Error) -> BackendError {
    BackendError::Transport { operation, url: url.to_string(), source }
}

async fn check(operation: &'static str, url: &str, response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .map_err(|source| transport(operation, url, source))?;
    Err(BackendError::rejected(operation, status.as_u16(), &body))
}

/// Decoded bulk response
#[derive(Debug, Clone, Deserialize)]
pub struct BulkResponse {
    /// Milliseconds the backend spent on the request
    #[serde(default)]
    pub took: u64,
    /// Whether any document failed
    pub errors: bool,
    /// Per-document results, keyed by action name
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItemResult>>,
}

/// Result of one document within a bulk request
#[derive(Debug, Clone, Deserialize)]
pub struct BulkItemResult {
    /// Document identifier
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Per-document HTTP status
    pub status: u16,
    /// Failure cause, when the document was rejected
    #[serde(default)]
    pub error: Option<ErrorCause>,
}

impl BulkResponse {
    /// Results of the documents that failed
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemResult> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .filter(|result| result.error.is_some() || result.status >= 300)
    }

    /// Convert a response that reports failures into an error
    pub fn into_result(self, time_step: i64, total: usize) -> BackendResult<Self> {
        if !self.errors {
            return Ok(self);
        }

        let failures: Vec<&BulkItemResult> = self.failures().collect();
        let first_reason = failures
            .first()
            .and_then(|result| result.error.as_ref())
            .map(|cause| match &cause.reason {
                Some(reason) => format!("{}: {}", cause.error_type, reason),
                None => cause.error_type.clone(),
            })
            .unwrap_or_else(|| "unknown failure".to_string());

        Err(BackendError::BulkItemsFailed {
            time_step,
            failed: failures.len().max(1),
            total,
            first_reason,
        })
    }
}
