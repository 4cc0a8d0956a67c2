//! Trajectory Loader
//!
//! A synthetic moving-object generator that bulk loads item trajectories into
//! an Elasticsearch-compatible search index.
//!
//! # Overview
//!
//! A run simulates a fixed number of concurrently live items over a window of
//! epoch seconds, one step per second. Whenever items expire they are replaced
//! by new ones, each with a lifetime, a speed, tags, and a complete path of
//! timestamped waypoints. Every step's new items are written as one bulk
//! request; requests run concurrently with the simulation and are joined once
//! the window has been simulated.
//!
//! ## Key Features
//!
//! - **Great-circle paths**: Constant-speed tracks with periodic heading changes
//! - **Record schemas**: Tagged, single-source, and untagged document layouts
//! - **Idempotent index setup**: Optional clean, create, and mapping per schema
//! - **Non-blocking loading**: One bulk request per time step, awaited at the end
//! - **Configurable runs**: CLI flags over an optional JSON configuration file
//!
//! ## Quick Start
//!
//! ```rust
//! use trajectory_loader::*;
//!
//! let config = SimulationConfig {
//!     items_concurrent: 3,
//!     seed: Some(1),
//!     ..Default::default()
//! };
//! config.validate()?;
//!
//! let mut simulator = TrajectorySimulator::new(&config);
//! let created = simulator.advance(config.start_time);
//! assert_eq!(created.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Tags, record schemas, identifiers, and configuration
//! - [`trajectory`]: Items, paths, and their generator
//! - [`backend`]: Index administration, bulk encoding, and the batch loader
//! - [`simulation`]: Run orchestration, statistics, and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │ Trajectory  │    │ Simulation  │
//! │             │    │             │    │             │
//! │ Enums       │◄───┤ Items       │◄───┤ Simulator   │
//! │ Identifiers │    │ Paths       │    │ Orchestrator│
//! │ Config      │    │ Generator   │    │ Statistics  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   │
//!        │                   │                   ▼
//!        │           ┌─────────────┐             │
//!        │           │  Backend    │             │
//!        └───────────┤             │◄────────────┘
//!                    │ Client      │
//!                    │ Bulk/Loader │
//!                    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod backend;
pub mod simulation;
pub mod trajectory;
pub mod types;

// Core types and configuration
pub use types::{
    CliArgs, ConfigError, ConfigValidationError, DocumentId, IdPolicy, ItemType, RecordSchema,
    SimulationConfig, Source, TimeFieldFormat,
};

// Items and paths
pub use trajectory::{ItemGenerator, Path, SourceTag, TrackedItem, Waypoint};

// Backend access
pub use backend::{
    BackendError, BackendErrorKind, BatchLoader, BulkResponse, IndexClient, LoadSummary,
};

// Run control
pub use simulation::{
    LoggingConfig, LoggingGuard, RunStatistics, SimulationError, SimulationOrchestrator,
    SimulationResult, TrajectorySimulator,
};
