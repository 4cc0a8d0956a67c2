//! Main run orchestrator
//!
//! This module contains the SimulationOrchestrator, which prepares the index,
//! steps simulated time over the configured window, and hands each step's new
//! items to the batch loader.

use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::backend::{item_mapping, BatchLoader, IndexClient};
use crate::simulation::{RunStatistics, SimulationError, SimulationResult, TrajectorySimulator};
use crate::types::SimulationConfig;

/// Coordinates index preparation, simulation, and loading for one run
#[derive(Debug)]
pub struct SimulationOrchestrator {
    config: SimulationConfig,
    client: IndexClient,
}

impl SimulationOrchestrator {
    /// Create an orchestrator for a validated configuration
    #[instrument(skip(config), fields(index = %config.index, items = config.items_concurrent))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        let client = IndexClient::from_config(&config).map_err(SimulationError::index_setup)?;

        info!("Loader targets {} at {}", config.index, client.base_url());
        Ok(Self { config, client })
    }

    /// Create an orchestrator around an existing client
    pub fn with_client(config: SimulationConfig, client: IndexClient) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self { config, client })
    }

    /// Configuration of this run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Make sure the index exists with the schema's mapping
    ///
    /// With `clean` set the index is deleted first; a missing index is not an
    /// error. An index that already exists is reused. Any other rejection is
    /// fatal.
    #[instrument(skip(self), fields(index = %self.config.index, clean = self.config.clean))]
    pub async fn prepare_index(&self) -> SimulationResult<()> {
        let index = &self.config.index;

        if self.config.clean {
            match self.client.delete_index(index).await {
                Ok(()) => info!("Removed existing index {}", index),
                Err(err) if err.is_index_not_found() => debug!("Index {} did not exist", index),
                Err(err) => return Err(SimulationError::index_setup(err)),
            }
        }

        match self.client.create_index(index).await {
            Ok(()) => info!("Created index {}", index),
            Err(err) if err.is_index_already_exists() => debug!("Index {} already exists", index),
            Err(err) => return Err(SimulationError::index_setup(err)),
        }

        self.client
            .put_mapping(index, &item_mapping(self.config.schema))
            .await
            .map_err(SimulationError::index_setup)?;
        info!("Mapping for {} schema is in place", self.config.schema);
        Ok(())
    }

    /// Run the whole window and wait for every batch to be written
    ///
    /// Time steps are not held back by pending writes; the loader is only
    /// drained after the last step. The first failed write ends the run.
    #[instrument(skip(self), fields(start = self.config.start_time, end = self.config.end_time))]
    pub async fn run(&self) -> SimulationResult<RunStatistics> {
        let started = Instant::now();
        let mut statistics = RunStatistics::new(&self.config);

        self.prepare_index().await?;

        let mut simulator = TrajectorySimulator::new(&self.config);
        let mut loader = BatchLoader::new(self.client.clone(), &self.config);

        info!(
            "Simulating {} time steps with {} concurrent items",
            self.config.time_steps(),
            self.config.items_concurrent
        );

        for time in self.config.start_time..=self.config.end_time {
            let created = simulator.advance(time);
            statistics.record_step(&created);

            if !created.is_empty() {
                loader.submit(time, &created).map_err(SimulationError::load)?;
                // Let the spawned request start while time keeps moving
                tokio::task::yield_now().await;
            }
        }

        debug!(pending = loader.pending(), "All time steps simulated, waiting for batches");
        let summary = loader.wait_all().await.map_err(SimulationError::load)?;
        statistics.record_load(&summary);
        statistics.set_run_duration(started.elapsed());

        info!("DONE");
        Ok(statistics)
    }
}
