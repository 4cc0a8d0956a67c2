//! Core types and configuration for the trajectory loader
//!
//! This module contains the categorical tags, record schema variants, document
//! identifiers, and the run configuration shared by the simulator and the loader.
//!
//! # Usage Example
//!
//! ```rust
//! use trajectory_loader::types::*;
//!
//! let config = SimulationConfig {
//!     items_concurrent: 5,
//!     schema: RecordSchema::SingleSource,
//!     ..Default::default()
//! };
//!
//! assert_eq!(config.schema.id_policy(), IdPolicy::Composed);
//! assert_eq!(DocumentId::composed(60, 2).to_string(), "60_2");
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
