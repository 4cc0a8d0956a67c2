//! Document store backend
//!
//! This module talks to an Elasticsearch-compatible REST endpoint: index
//! administration, field mappings per record schema, NDJSON bulk encoding, and
//! the asynchronous [`BatchLoader`] that writes each time step's new items.

pub mod bulk;
pub mod client;
pub mod error;
pub mod loader;
pub mod mapping;

pub use bulk::encode_batch;
pub use client::{BulkItemResult, BulkResponse, IndexClient};
pub use error::{BackendError, BackendErrorKind, BackendResult, ErrorCause};
pub use loader::{BatchLoader, BulkReceipt, LoadSummary};
pub use mapping::item_mapping;
