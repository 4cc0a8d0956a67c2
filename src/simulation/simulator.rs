//! Live-set maintenance over simulated time
//!
//! The simulator keeps exactly `items_concurrent` items alive. At every time
//! step expired items are dropped and replaced by new ones; only the new items
//! are handed to the loader.

use std::sync::Arc;
use tracing::trace;

use crate::trajectory::{ItemGenerator, TrackedItem};
use crate::types::SimulationConfig;

/// Maintains the live set of items across time steps
#[derive(Debug)]
pub struct TrajectorySimulator {
    items_concurrent: usize,
    generator: ItemGenerator,
    live: Vec<Arc<TrackedItem>>,
    created_total: usize,
    expired_total: usize,
}

impl TrajectorySimulator {
    /// Create a simulator for a run configuration
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_generator(config.items_concurrent, ItemGenerator::new(config))
    }

    /// Create a simulator around an existing generator
    pub fn with_generator(items_concurrent: usize, generator: ItemGenerator) -> Self {
        Self {
            items_concurrent,
            generator,
            live: Vec::with_capacity(items_concurrent),
            created_total: 0,
            expired_total: 0,
        }
    }

    /// Advance to time step `time`
    ///
    /// Removes every item whose end time is before `time`, then creates items
    /// at `time` until the live set is back at its target size. Returns the
    /// newly created items in creation order.
    pub fn advance(&mut self, time: i64) -> Vec<Arc<TrackedItem>> {
        let before = self.live.len();
        self.live.retain(|item| !item.is_expired_at(time));
        let expired = before - self.live.len();
        self.expired_total += expired;

        let deficit = self.items_concurrent.saturating_sub(self.live.len());
        let created: Vec<Arc<TrackedItem>> = (0..deficit)
            .map(|_| Arc::new(self.generator.generate_item(time)))
            .collect();

        self.live.extend(created.iter().cloned());
        self.created_total += created.len();

        if expired > 0 || !created.is_empty() {
            trace!(time, expired, created = created.len(), live = self.live.len(), "Advanced live set");
        }
        created
    }

    /// Create a single item at `time` without touching the live set
    pub fn generate_item(&mut self, time: i64) -> TrackedItem {
        self.generator.generate_item(time)
    }

    /// Items currently alive
    pub fn live_items(&self) -> &[Arc<TrackedItem>] {
        &self.live
    }

    /// Number of items currently alive
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Target size of the live set
    pub fn items_concurrent(&self) -> usize {
        self.items_concurrent
    }

    /// Items created so far
    pub fn created_total(&self) -> usize {
        self.created_total
    }

    /// Items expired so far
    pub fn expired_total(&self) -> usize {
        self.expired_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator(items: usize, min_time: i64, max_time: i64, seed: u64) -> TrajectorySimulator {
        let config = SimulationConfig {
            items_concurrent: items,
            item_min_time: min_time,
            item_max_time: max_time,
            seed: Some(seed),
            ..SimulationConfig::default()
        };
        TrajectorySimulator::new(&config)
    }

    #[test]
    fn test_first_step_fills_live_set() {
        let mut simulator = simulator(5, 60, 600, 1);
        let created = simulator.advance(100);

        assert_eq!(created.len(), 5);
        assert_eq!(simulator.live_count(), 5);
        assert!(created.iter().all(|item| item.start_time() == 100));
    }

    #[test]
    fn test_live_set_stays_at_target() {
        let mut simulator = simulator(8, 5, 40, 2);
        let mut total_created = 0;

        for time in 0..500 {
            let created = simulator.advance(time);
            total_created += created.len();
            assert_eq!(simulator.live_count(), 8, "time {}", time);
            assert!(simulator.live_items().iter().all(|item| item.end_time() >= time));
        }

        assert_eq!(total_created, simulator.created_total());
        assert_eq!(simulator.created_total() - simulator.expired_total(), 8);
    }

    #[test]
    fn test_item_is_live_through_end_time() {
        let mut simulator = simulator(1, 10, 10, 3);

        assert_eq!(simulator.advance(0).len(), 1);
        for time in 1..=10 {
            assert!(simulator.advance(time).is_empty(), "replaced early at {}", time);
        }

        let replacement = simulator.advance(11);
        assert_eq!(replacement.len(), 1);
        assert_eq!(replacement[0].start_time(), 11);
        assert_eq!(simulator.expired_total(), 1);
    }

    #[test]
    fn test_zero_concurrency_creates_nothing() {
        let mut simulator = simulator(0, 60, 600, 4);
        for time in 0..100 {
            assert!(simulator.advance(time).is_empty());
        }
        assert_eq!(simulator.live_count(), 0);
    }

    #[test]
    fn test_single_step_single_item() {
        let mut simulator = simulator(1, 60, 60, 5);
        let created = simulator.advance(0);

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].start_time(), 0);
        assert_eq!(created[0].end_time(), 60);
        assert_eq!(created[0].path().len(), 7);
    }

    #[test]
    fn test_generate_item_does_not_join_live_set() {
        let mut simulator = simulator(3, 60, 60, 6);
        let item = simulator.generate_item(42);
        assert_eq!(item.start_time(), 42);
        assert_eq!(simulator.live_count(), 0);
    }
}
