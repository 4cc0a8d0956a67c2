//! Error types for the document store backend

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Result type for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Classified backend error type
///
/// Only the kinds the run reacts to get their own variant; everything else is
/// kept verbatim in [`BackendErrorKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// The named index does not exist
    IndexNotFound,
    /// The named index already exists
    IndexAlreadyExists,
    /// Any other error type reported by the backend
    Other(String),
}

impl BackendErrorKind {
    /// Classify an error type string as reported in the `error.type` field
    pub fn from_error_type(error_type: &str) -> Self {
        match error_type {
            "index_not_found_exception" => BackendErrorKind::IndexNotFound,
            // Older releases report the second spelling
            "resource_already_exists_exception" | "index_already_exists_exception" => {
                BackendErrorKind::IndexAlreadyExists
            }
            other => BackendErrorKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendErrorKind::IndexNotFound => write!(f, "index_not_found_exception"),
            BackendErrorKind::IndexAlreadyExists => write!(f, "resource_already_exists_exception"),
            BackendErrorKind::Other(error_type) => write!(f, "{}", error_type),
        }
    }
}

/// Error cause as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorCause {
    /// Error type, e.g. `index_not_found_exception`
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable reason
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Structured(ErrorCause),
    Message(String),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorField,
}

/// Errors raised while talking to the document store
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Request could not be sent or its response could not be read
    #[error("{operation} request to {url} failed: {source}")]
    Transport {
        /// Operation being performed
        operation: &'static str,
        /// Target URL
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-success status
    #[error("Backend rejected {operation} with status {status}: {kind} ({reason})")]
    Rejected {
        /// Operation being performed
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Classified error type
        kind: BackendErrorKind,
        /// Reason reported by the backend
        reason: String,
    },

    /// Bulk response reported per-document failures
    #[error("Bulk write for time step {time_step} failed for {failed} of {total} documents: {first_reason}")]
    BulkItemsFailed {
        /// Time step the batch was created at
        time_step: i64,
        /// Number of failed documents
        failed: usize,
        /// Number of documents in the batch
        total: usize,
        /// Reason of the first failure
        first_reason: String,
    },

    /// Request body could not be encoded
    #[error("Failed to encode bulk request: {0}")]
    Encode(#[from] serde_json::Error),

    /// Response body could not be decoded
    #[error("Failed to decode {operation} response: {source}")]
    Decode {
        /// Operation being performed
        operation: &'static str,
        /// Underlying decoding error
        #[source]
        source: serde_json::Error,
    },

    /// Spawned bulk submission panicked or was cancelled
    #[error("Bulk submission task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BackendError {
    /// Build a rejection from a non-success status and its raw response body
    pub fn rejected(operation: &'static str, status: u16, body: &str) -> Self {
        let (kind, reason) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error: ErrorField::Structured(cause) }) => {
                let reason = cause.reason.unwrap_or_default();
                (BackendErrorKind::from_error_type(&cause.error_type), reason)
            }
            Ok(ErrorEnvelope { error: ErrorField::Message(message) }) => {
                (BackendErrorKind::Other(String::new()), message)
            }
            Err(_) => (BackendErrorKind::Other(String::new()), body.trim().to_string()),
        };

        BackendError::Rejected { operation, status, kind, reason }
    }

    /// Classified error type, if the backend reported one
    pub fn kind(&self) -> Option<&BackendErrorKind> {
        match self {
            BackendError::Rejected { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Whether this is an "index not found" rejection
    pub fn is_index_not_found(&self) -> bool {
        matches!(self.kind(), Some(BackendErrorKind::IndexNotFound))
    }

    /// Whether this is an "index already exists" rejection
    pub fn is_index_already_exists(&self) -> bool {
        matches!(self.kind(), Some(BackendErrorKind::IndexAlreadyExists))
    }
}
