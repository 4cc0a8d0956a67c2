//! Statistics collection and reporting
//!
//! This module contains the counters collected over one loader run and their
//! end-of-run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::LoadSummary;
use crate::trajectory::{SourceTag, TrackedItem};
use crate::types::{ItemType, RecordSchema, SimulationConfig};

/// Counters for one run, from the first time step to the last completed batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    // Run metadata
    /// Index written to
    pub index: String,
    /// Record schema of the run
    pub schema: RecordSchema,
    /// First simulated second
    pub start_time: i64,
    /// Last simulated second
    pub end_time: i64,
    /// Target size of the live set
    pub items_concurrent: usize,

    // Simulation counters
    /// Time steps simulated
    pub time_steps: u64,
    /// Items created
    pub items_created: usize,
    /// Items created with type T
    pub type_t_items: usize,
    /// Items created with type R
    pub type_r_items: usize,
    /// Single-source items created without a source
    pub unsourced_items: usize,
    /// Waypoints across all created items
    pub waypoints_generated: usize,
    /// Batches handed to the loader
    pub batches_submitted: usize,

    // Load counters
    /// Bulk requests that completed
    pub batches_completed: usize,
    /// Documents written
    pub documents_written: usize,
    /// Largest batch written
    pub largest_batch: usize,
    /// Sum of backend-reported request times in milliseconds
    pub backend_time_ms: u64,

    /// Wall-clock time the run started at
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run
    pub run_duration: Duration,
}

impl RunStatistics {
    /// Create empty statistics for a run configuration
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            index: config.index.clone(),
            schema: config.schema,
            start_time: config.start_time,
            end_time: config.end_time,
            items_concurrent: config.items_concurrent,
            time_steps: 0,
            items_created: 0,
            type_t_items: 0,
            type_r_items: 0,
            unsourced_items: 0,
            waypoints_generated: 0,
            batches_submitted: 0,
            batches_completed: 0,
            documents_written: 0,
            largest_batch: 0,
            backend_time_ms: 0,
            started_at: Utc::now(),
            run_duration: Duration::ZERO,
        }
    }

    /// Record one simulated time step and the items it created
    pub fn record_step(&mut self, created: &[Arc<TrackedItem>]) {
        self.time_steps += 1;
        if created.is_empty() {
            return;
        }

        self.batches_submitted += 1;
        for item in created {
            self.items_created += 1;
            self.waypoints_generated += item.path().len();
            match item.item_type() {
                Some(ItemType::T) => self.type_t_items += 1,
                Some(ItemType::R) => self.type_r_items += 1,
                None => {}
            }
            if let Some(SourceTag::Single(None)) = item.sources() {
                self.unsourced_items += 1;
            }
        }
    }

    /// Record the loader's totals once all batches completed
    pub fn record_load(&mut self, summary: &LoadSummary) {
        self.batches_completed = summary.batches;
        self.documents_written = summary.documents;
        self.largest_batch = summary.largest_batch;
        self.backend_time_ms = summary.backend_time_ms;
    }

    /// Set the wall-clock duration of the run
    pub fn set_run_duration(&mut self, duration: Duration) {
        self.run_duration = duration;
    }

    /// Average items created per time step
    pub fn average_items_per_step(&self) -> f64 {
        if self.time_steps == 0 {
            0.0
        } else {
            self.items_created as f64 / self.time_steps as f64
        }
    }

    /// Average waypoints per created item
    pub fn average_waypoints_per_item(&self) -> f64 {
        if self.items_created == 0 {
            0.0
        } else {
            self.waypoints_generated as f64 / self.items_created as f64
        }
    }

    /// Percentage of tagged items with type T
    pub fn type_t_percentage(&self) -> f64 {
        let tagged = self.type_t_items + self.type_r_items;
        if tagged == 0 {
            0.0
        } else {
            (self.type_t_items as f64 / tagged as f64) * 100.0
        }
    }

    /// Documents written per wall-clock second
    pub fn documents_per_second(&self) -> f64 {
        let seconds = self.run_duration.as_secs_f64();
        if seconds > 0.0 {
            self.documents_written as f64 / seconds
        } else {
            0.0
        }
    }

    /// Whether every created item was written
    pub fn is_complete(&self) -> bool {
        self.documents_written == self.items_created && self.batches_completed == self.batches_submitted
    }

    /// Multi-line summary printed at the end of a run
    pub fn generate_summary_output(&self) -> String {
        let mut output = String::new();

        output.push_str("Trajectory Load Complete\n");
        output.push_str("========================\n\n");

        output.push_str("Run Summary:\n");
        output.push_str(&format!("   Index: {} ({} schema)\n", self.index, self.schema));
        output.push_str(&format!(
            "   Window: {} .. {} ({} time steps)\n",
            self.start_time, self.end_time, self.time_steps
        ));
        output.push_str(&format!(
            "   Duration: {:.2} seconds\n\n",
            self.run_duration.as_secs_f64()
        ));

        output.push_str("Items:\n");
        output.push_str(&format!(
            "   Created: {} ({} concurrent, {:.2} per step)\n",
            self.items_created,
            self.items_concurrent,
            self.average_items_per_step()
        ));
        if self.schema.has_type() {
            output.push_str(&format!(
                "   Types: {} T ({:.1}%), {} R\n",
                self.type_t_items,
                self.type_t_percentage(),
                self.type_r_items
            ));
        }
        if self.schema == RecordSchema::SingleSource {
            output.push_str(&format!("   Without source: {}\n", self.unsourced_items));
        }
        output.push_str(&format!(
            "   Waypoints: {} ({:.1} per item)\n\n",
            self.waypoints_generated,
            self.average_waypoints_per_item()
        ));

        output.push_str("Bulk Load:\n");
        output.push_str(&format!(
            "   Batches: {} submitted, {} completed (largest {})\n",
            self.batches_submitted, self.batches_completed, self.largest_batch
        ));
        output.push_str(&format!(
            "   Documents: {} written ({:.1}/s)\n",
            self.documents_written,
            self.documents_per_second()
        ));
        output.push_str(&format!("   Backend time: {} ms\n", self.backend_time_ms));

        output
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items in {} batches over {} steps, {} documents written",
            self.items_created, self.batches_submitted, self.time_steps, self.documents_written
        )
    }
}
