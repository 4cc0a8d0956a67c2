//! Simulation orchestration and control
//!
//! This module contains the run orchestrator, the live-set simulator,
//! statistics collection, logging setup, and error handling.
//!
//! # Overview
//!
//! - **SimulationOrchestrator**: Prepares the index and drives one run end to end
//! - **TrajectorySimulator**: Keeps the live set at its target size, one second at a time
//! - **RunStatistics**: Collects and reports run counters
//! - **LoggingConfig**: Installs the tracing subscriber
//! - **SimulationError**: Run-level error handling
//!
//! # Usage Example
//!
//! ```rust
//! use trajectory_loader::simulation::*;
//! use trajectory_loader::types::*;
//!
//! let config = SimulationConfig {
//!     start_time: 0,
//!     end_time: 0,
//!     items_concurrent: 1,
//!     item_min_time: 60,
//!     item_max_time: 60,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut simulator = TrajectorySimulator::new(&config);
//! let created = simulator.advance(0);
//! assert_eq!(created.len(), 1);
//! assert_eq!(created[0].end_time(), 60);
//! ```

pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod simulator;
pub mod statistics;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use orchestrator::*;
pub use simulator::*;
pub use statistics::*;
