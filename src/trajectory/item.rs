//! Tracked items and their generator
//!
//! An item is created once at a time step with a fixed lifetime, a full path
//! covering that lifetime, and the tags required by the active record schema.

use rand::seq::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use std::fmt;

use crate::trajectory::path::{generate_path, Path};
use crate::types::{ItemType, RecordSchema, SimulationConfig, Source};

/// Source tagging of an item, shaped by the record schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SourceTag {
    /// One or more distinct sources (`tagged` schema)
    Many(Vec<Source>),
    /// A single source that may be null (`single-source` schema)
    Single(Option<Source>),
}

impl SourceTag {
    /// Number of sources carried
    pub fn count(&self) -> usize {
        match self {
            SourceTag::Many(sources) => sources.len(),
            SourceTag::Single(source) => usize::from(source.is_some()),
        }
    }
}

/// A synthetic moving item
///
/// All fields are fixed at creation. The item is live while the simulated time
/// is not past `end_time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedItem {
    start_time: i64,
    end_time: i64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    item_type: Option<ItemType>,
    #[serde(rename = "src", skip_serializing_if = "Option::is_none")]
    sources: Option<SourceTag>,
    path: Path,
}

impl TrackedItem {
    /// Second the item was created at
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Last second the item is live
    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Lifetime in seconds
    pub fn lifetime(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Type tag, if the schema carries one
    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }

    /// Source tag, if the schema carries one
    pub fn sources(&self) -> Option<&SourceTag> {
        self.sources.as_ref()
    }

    /// The item's path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the item has expired at simulated time `time`
    pub fn is_expired_at(&self, time: i64) -> bool {
        self.end_time < time
    }
}

/// Generator for tracked items within the configured bounds
pub struct ItemGenerator {
    rng: Box<dyn RngCore + Send>,
    schema: RecordSchema,
    lifetime: (i64, i64),
    speed: (f64, f64),
    path_resolution: i64,
}

impl fmt::Debug for ItemGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemGenerator")
            .field("schema", &self.schema)
            .field("lifetime", &self.lifetime)
            .field("speed", &self.speed)
            .field("path_resolution", &self.path_resolution)
            .finish()
    }
}

impl ItemGenerator {
    /// Create a generator using the configured seed, or OS entropy when unseeded
    pub fn new(config: &SimulationConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(config, seed),
            None => Self::with_rng(config, Box::new(StdRng::from_entropy())),
        }
    }

    /// Create a generator with a specific seed for reproducible results
    pub fn with_seed(config: &SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, Box::new(StdRng::seed_from_u64(seed)))
    }

    fn with_rng(config: &SimulationConfig, rng: Box<dyn RngCore + Send>) -> Self {
        debug_assert!(config.item_min_time <= config.item_max_time);
        debug_assert!(config.item_min_speed <= config.item_max_speed);
        debug_assert!(config.path_resolution > 0);

        Self {
            rng,
            schema: config.schema,
            lifetime: config.item_lifetime(),
            speed: config.item_speed(),
            path_resolution: config.path_resolution,
        }
    }

    /// Record schema items are tagged for
    pub fn schema(&self) -> RecordSchema {
        self.schema
    }

    /// Create one item at time step `time`
    pub fn generate_item(&mut self, time: i64) -> TrackedItem {
        let rng = &mut *self.rng;

        let end_time = time + rng.gen_range(self.lifetime.0..=self.lifetime.1);
        let speed = rng.gen_range(self.speed.0..=self.speed.1);
        let path = generate_path(rng, time, end_time, speed, self.path_resolution);

        let (item_type, sources) = match self.schema {
            RecordSchema::Tagged => {
                let (item_type, sources) = tag_with_sources(rng);
                (Some(item_type), Some(SourceTag::Many(sources)))
            }
            RecordSchema::SingleSource => (None, Some(SourceTag::Single(single_source(rng)))),
            RecordSchema::Untagged => (None, None),
        };

        TrackedItem { start_time: time, end_time, item_type, sources, path }
    }
}

// T items are seen by 1 to 4 distinct sources, R items by exactly one
fn tag_with_sources<R: Rng + ?Sized>(rng: &mut R) -> (ItemType, Vec<Source>) {
    let item_type = if rng.gen_bool(ItemType::T_PROBABILITY) { ItemType::T } else { ItemType::R };
    let count = match item_type {
        ItemType::T => rng.gen_range(1..=ItemType::MAX_T_SOURCES),
        ItemType::R => 1,
    };
    let sources = Source::ALL.choose_multiple(rng, count).copied().collect();
    (item_type, sources)
}

/// Probability that a single-source item carries no source at all
const NULL_SOURCE_PROBABILITY: f64 = 0.3;

fn single_source<R: Rng + ?Sized>(rng: &mut R) -> Option<Source> {
    if rng.gen_bool(NULL_SOURCE_PROBABILITY) {
        None
    } else {
        Source::ALL.choose(rng).copied()
    }
}
