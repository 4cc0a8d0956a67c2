//! Trajectory generation
//!
//! This module contains the procedural path generator and the tracked items built
//! on top of it.
//!
//! - **Path**: great-circle polyline with per-waypoint timestamps
//! - **TrackedItem**: an item's lifetime, tags and path, fixed at creation
//! - **ItemGenerator**: creates items within the configured bounds
//!
//! # Usage Example
//!
//! ```rust
//! use trajectory_loader::trajectory::ItemGenerator;
//! use trajectory_loader::types::SimulationConfig;
//!
//! let config = SimulationConfig {
//!     item_min_time: 60,
//!     item_max_time: 60,
//!     path_resolution: 10,
//!     ..Default::default()
//! };
//!
//! let mut generator = ItemGenerator::with_seed(&config, 42);
//! let item = generator.generate_item(0);
//! assert_eq!(item.end_time(), 60);
//! assert_eq!(item.path().len(), 7);
//! ```

pub mod item;
pub mod path;

pub use item::*;
pub use path::{Path, Waypoint};
