//! Asynchronous batch loader
//!
//! Each time step's new items are encoded immediately and written by a spawned
//! bulk request. The loader keeps every pending request in a [`JoinSet`] and
//! only joins them once the simulation has finished producing batches, so
//! simulated time never waits on the network.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use crate::backend::bulk::encode_batch;
use crate::backend::client::IndexClient;
use crate::backend::error::{BackendError, BackendResult};
use crate::trajectory::TrackedItem;
use crate::types::{RecordSchema, SimulationConfig};

/// Outcome of one completed bulk request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkReceipt {
    /// Time step the batch was created at
    pub time_step: i64,
    /// Documents written
    pub documents: usize,
    /// Milliseconds the backend reported for the request
    pub took_ms: u64,
}

/// Totals of all completed bulk requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Bulk requests that completed
    pub batches: usize,
    /// Documents written across all batches
    pub documents: usize,
    /// Largest single batch
    pub largest_batch: usize,
    /// Sum of backend-reported request times
    pub backend_time_ms: u64,
}

impl LoadSummary {
    fn record(&mut self, receipt: &BulkReceipt) {
        self.batches += 1;
        self.documents += receipt.documents;
        self.largest_batch = self.largest_batch.max(receipt.documents);
        self.backend_time_ms += receipt.took_ms;
    }
}

/// Writes batches of new items to one index without blocking the caller
#[derive(Debug)]
pub struct BatchLoader {
    client: IndexClient,
    index: String,
    schema: RecordSchema,
    pending: JoinSet<BackendResult<BulkReceipt>>,
    in_flight: HashMap<i64, usize>,
}

impl BatchLoader {
    /// Create a loader for the index and schema of a run configuration
    pub fn new(client: IndexClient, config: &SimulationConfig) -> Self {
        Self {
            client,
            index: config.index.clone(),
            schema: config.schema,
            pending: JoinSet::new(),
            in_flight: HashMap::new(),
        }
    }

    /// Start writing the items created at `time_step`
    ///
    /// Returns as soon as the request is encoded and spawned. Empty batches are
    /// ignored. Must be called from within a tokio runtime.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub fn submit(&mut self, time_step: i64, items: &[Arc<TrackedItem>]) -> BackendResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let documents = items.len();
        let body = encode_batch(time_step, items, self.schema, Utc::now().timestamp())?;
        let client = self.client.clone();
        let index = self.index.clone();

        self.pending.spawn(async move {
            let response = client.bulk(&index, body).await?;
            let response = response.into_result(time_step, documents)?;
            Ok(BulkReceipt { time_step, documents, took_ms: response.took })
        });
        self.in_flight.insert(time_step, documents);

        debug!(pending = self.pending.len(), "Submitted batch for time step {}", time_step);
        Ok(())
    }

    /// Number of bulk requests not yet joined
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Time steps whose batches have not completed yet
    pub fn in_flight(&self) -> impl Iterator<Item = i64> + '_ {
        self.in_flight.keys().copied()
    }

    /// Wait for every submitted batch
    ///
    /// The first failure aborts the remaining requests and is returned.
    #[instrument(skip(self), fields(pending = self.pending.len()))]
    pub async fn wait_all(&mut self) -> BackendResult<LoadSummary> {
        let mut summary = LoadSummary::default();

        while let Some(joined) = self.pending.join_next().await {
            let outcome = match joined {
                Ok(result) => result,
                Err(join_error) => Err(BackendError::from(join_error)),
            };

            match outcome {
                Ok(receipt) => {
                    self.in_flight.remove(&receipt.time_step);
                    summary.record(&receipt);
                    info!("{} items created ({})", receipt.documents, receipt.time_step);
                }
                Err(err) => {
                    error!(
                        in_flight = self.in_flight.len(),
                        "Bulk write failed, aborting remaining requests: {}", err
                    );
                    self.pending.abort_all();
                    return Err(err);
                }
            }
        }

        Ok(summary)
    }
}
