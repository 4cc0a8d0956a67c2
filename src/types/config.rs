//! Configuration structures for the trajectory loader
//!
//! This module contains the run configuration, its command line surface, the
//! optional JSON configuration file overlay, and validation logic.

use super::RecordSchema;
use chrono::Utc;
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default values shared by the CLI help text and `SimulationConfig::default`
pub mod defaults {
    /// Length of the default time window ending now (24 hours)
    pub const WINDOW_SECONDS: i64 = 24 * 60 * 60;

    /// Number of concurrently live items
    pub const ITEMS_CONCURRENT: usize = 10;

    /// Minimum item lifetime in seconds (1 minute)
    pub const ITEM_MIN_TIME: i64 = 60;

    /// Maximum item lifetime in seconds (2 hours)
    pub const ITEM_MAX_TIME: i64 = 2 * 60 * 60;

    /// Minimum item speed in meters per second
    pub const ITEM_MIN_SPEED: f64 = 400.0;

    /// Maximum item speed in meters per second
    pub const ITEM_MAX_SPEED: f64 = 700.0;

    /// Seconds between two consecutive waypoints
    pub const PATH_RESOLUTION: i64 = 10;

    /// Backend address
    pub const ELASTIC: &str = "localhost:9200";

    /// Target index name
    pub const INDEX: &str = "items";

    /// Timeout applied to every backend request, in milliseconds
    pub const REQUEST_TIMEOUT_MS: u64 = 200_000;

    /// Largest number of steps a single path may take
    pub const MAX_PATH_STEPS: i64 = 1_000_000;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "trajectory-loader",
    version,
    disable_help_flag = true,
    about = "Trajectory Loader - Generates synthetic moving-object trajectories and bulk loads them into a search index",
    long_about = "Simulates a fixed number of concurrently moving items over a time window, one step per second, and writes every newly created item with its full path into an Elasticsearch-compatible index using one bulk request per time step.

EXAMPLES:
    # Load the last 24 hours with 10 concurrent items into localhost:9200
    trajectory-loader

    # Recreate the index and load a one hour window
    trajectory-loader --clean --start 1700000000000 --end 1700003600000

    # Use a configuration file
    trajectory-loader --config loader.json

    # Generate configuration template
    trajectory-loader --print-config > loader.json

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag, JSON)
    3. Default values (lowest priority)

    --start and --end take epoch milliseconds; the configuration file stores
    start_time and end_time in epoch seconds."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Start of the time window in epoch milliseconds
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "The starting time in milliseconds (default to 24 hours ago)"
    )]
    pub start: Option<i64>,

    /// End of the time window in epoch milliseconds
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "The ending time in milliseconds (default to now)"
    )]
    pub end: Option<i64>,

    /// Number of concurrently live items
    #[arg(long, help = "Number of concurrent items (default to 10)")]
    pub items: Option<usize>,

    /// Minimum item lifetime in seconds
    #[arg(
        long,
        alias = "itemMinTime",
        help = "Minimum number of seconds for an item to exist (default to 1 minute)"
    )]
    pub item_min_time: Option<i64>,

    /// Maximum item lifetime in seconds
    #[arg(
        long,
        alias = "itemMaxTime",
        help = "Maximum number of seconds for an item to exist (default to 2 hours)"
    )]
    pub item_max_time: Option<i64>,

    /// Minimum item speed in m/s
    #[arg(long, alias = "itemMinSpeed", help = "Minimum speed for an item in m/s (default to 400)")]
    pub item_min_speed: Option<f64>,

    /// Maximum item speed in m/s
    #[arg(long, alias = "itemMaxSpeed", help = "Maximum speed for an item in m/s (default to 700)")]
    pub item_max_speed: Option<f64>,

    /// Path resolution in seconds
    #[arg(long, help = "Path resolution in seconds (default to 10)")]
    pub res: Option<i64>,

    /// Remove the existing index before loading
    #[arg(long, help = "Remove currently existing indices")]
    pub clean: bool,

    /// Backend address
    #[arg(long, help = "host:port for the elasticsearch instance (default to localhost:9200)")]
    pub elastic: Option<String>,

    /// Target index name
    #[arg(long, help = "Name of the index to load into (default to items)")]
    pub index: Option<String>,

    /// Record schema variant
    #[arg(
        long,
        help = "Record schema: tagged, single-source or untagged (default to tagged)",
        long_help = "Record schema variant. 'tagged' writes a type and a list of sources with backend-assigned ids, 'single-source' writes one nullable source with ids composed from the time step and batch position, 'untagged' writes paths only."
    )]
    pub schema: Option<RecordSchema>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Directory for daily rolling log files
    #[arg(long, help = "Also write logs to daily rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without touching the backend
    #[arg(long, help = "Validate configuration without running the loader")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,

    /// Print usage and exit with a failure status
    #[arg(short, long, action = ArgAction::SetTrue, help = "Print usage message and exit")]
    pub help: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Start of the time window in epoch seconds
    pub start_time: Option<i64>,

    /// End of the time window in epoch seconds
    pub end_time: Option<i64>,

    /// Number of concurrently live items
    pub items_concurrent: Option<usize>,

    /// Minimum item lifetime in seconds
    pub item_min_time: Option<i64>,

    /// Maximum item lifetime in seconds
    pub item_max_time: Option<i64>,

    /// Minimum item speed in m/s
    pub item_min_speed: Option<f64>,

    /// Maximum item speed in m/s
    pub item_max_speed: Option<f64>,

    /// Path resolution in seconds
    pub path_resolution: Option<i64>,

    /// Backend address
    pub elastic: Option<String>,

    /// Remove the existing index before loading
    pub clean: Option<bool>,

    /// Target index name
    pub index: Option<String>,

    /// Record schema variant
    pub schema: Option<RecordSchema>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Timeout applied to every backend request, in milliseconds
    pub request_timeout_ms: Option<u64>,
}

/// Configuration of a generate-and-load run
///
/// Built once at startup and passed by reference to the simulator and loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Start of the time window in epoch seconds
    pub start_time: i64,

    /// End of the time window in epoch seconds (inclusive)
    pub end_time: i64,

    /// Number of concurrently live items
    pub items_concurrent: usize,

    /// Minimum item lifetime in seconds
    pub item_min_time: i64,

    /// Maximum item lifetime in seconds
    pub item_max_time: i64,

    /// Minimum item speed in m/s
    pub item_min_speed: f64,

    /// Maximum item speed in m/s
    pub item_max_speed: f64,

    /// Seconds between two consecutive waypoints
    pub path_resolution: i64,

    /// Backend address, `host:port` or a full URL
    pub elastic: String,

    /// Remove the existing index before loading
    pub clean: bool,

    /// Target index name
    pub index: String,

    /// Record schema variant
    pub schema: RecordSchema,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Timeout applied to every backend request, in milliseconds
    pub request_timeout_ms: u64,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Item lifetime bounds are inverted or negative
    #[error("Invalid item lifetime range: min ({0}) must be >= 0 and <= max ({1})")]
    InvalidLifetimeRange(i64, i64),

    /// Item speed bounds are inverted, negative or not finite
    #[error("Invalid item speed range: min ({0}) must be >= 0 and <= max ({1})")]
    InvalidSpeedRange(f64, f64),

    /// Path resolution is not positive
    #[error("Path resolution must be greater than 0, got {0}")]
    InvalidPathResolution(i64),

    /// An item created at the end of the window would end past the last representable second
    #[error("Item max time {item_max_time} overflows when added to end time {end_time}")]
    LifetimeOverflow {
        /// Last second of the window
        end_time: i64,
        /// Longest item lifetime
        item_max_time: i64,
    },

    /// The longest lifetime needs more path steps than allowed at this resolution
    #[error("Item max time {item_max_time} at resolution {path_resolution} needs {steps} path steps, at most {max} allowed")]
    PathTooLong {
        /// Longest item lifetime
        item_max_time: i64,
        /// Seconds between waypoints
        path_resolution: i64,
        /// Steps the longest path would take
        steps: i64,
        /// Step limit
        max: i64,
    },

    /// Backend address is empty
    #[error("Backend address must not be empty")]
    EmptyBackendAddress,

    /// Index name is empty or not allowed by the backend
    #[error("Invalid index name: {0:?}")]
    InvalidIndexName(String),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let now = Utc::now().timestamp();
        Self {
            start_time: now - defaults::WINDOW_SECONDS,
            end_time: now,
            items_concurrent: defaults::ITEMS_CONCURRENT,
            item_min_time: defaults::ITEM_MIN_TIME,
            item_max_time: defaults::ITEM_MAX_TIME,
            item_min_speed: defaults::ITEM_MIN_SPEED,
            item_max_speed: defaults::ITEM_MAX_SPEED,
            path_resolution: defaults::PATH_RESOLUTION,
            elastic: defaults::ELASTIC.to_string(),
            clean: false,
            index: defaults::INDEX.to_string(),
            schema: RecordSchema::default(),
            seed: None,
            request_timeout_ms: defaults::REQUEST_TIMEOUT_MS,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            start_time: config_file.start_time.unwrap_or(defaults.start_time),
            end_time: config_file.end_time.unwrap_or(defaults.end_time),
            items_concurrent: config_file.items_concurrent.unwrap_or(defaults.items_concurrent),
            item_min_time: config_file.item_min_time.unwrap_or(defaults.item_min_time),
            item_max_time: config_file.item_max_time.unwrap_or(defaults.item_max_time),
            item_min_speed: config_file.item_min_speed.unwrap_or(defaults.item_min_speed),
            item_max_speed: config_file.item_max_speed.unwrap_or(defaults.item_max_speed),
            path_resolution: config_file.path_resolution.unwrap_or(defaults.path_resolution),
            elastic: config_file.elastic.unwrap_or(defaults.elastic),
            clean: config_file.clean.unwrap_or(defaults.clean),
            index: config_file.index.unwrap_or(defaults.index),
            schema: config_file.schema.unwrap_or(defaults.schema),
            seed: config_file.seed.or(defaults.seed),
            request_timeout_ms: config_file
                .request_timeout_ms
                .unwrap_or(defaults.request_timeout_ms),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.start {
            config.start_time = millis_to_seconds(value);
        }
        if let Some(value) = args.end {
            config.end_time = millis_to_seconds(value);
        }
        if let Some(value) = args.items {
            config.items_concurrent = value;
        }
        if let Some(value) = args.item_min_time {
            config.item_min_time = value;
        }
        if let Some(value) = args.item_max_time {
            config.item_max_time = value;
        }
        if let Some(value) = args.item_min_speed {
            config.item_min_speed = value;
        }
        if let Some(value) = args.item_max_speed {
            config.item_max_speed = value;
        }
        if let Some(value) = args.res {
            config.path_resolution = value;
        }
        if let Some(value) = args.elastic {
            config.elastic = value;
        }
        if let Some(value) = args.index {
            config.index = value;
        }
        if let Some(value) = args.schema {
            config.schema = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }

        // A flag can only switch cleanup on
        if args.clean {
            config.clean = true;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.item_min_time < 0 || self.item_min_time > self.item_max_time {
            return Err(ConfigValidationError::InvalidLifetimeRange(
                self.item_min_time,
                self.item_max_time,
            ));
        }

        let speeds_finite = self.item_min_speed.is_finite() && self.item_max_speed.is_finite();
        if !speeds_finite || self.item_min_speed < 0.0 || self.item_min_speed > self.item_max_speed
        {
            return Err(ConfigValidationError::InvalidSpeedRange(
                self.item_min_speed,
                self.item_max_speed,
            ));
        }

        if self.path_resolution <= 0 {
            return Err(ConfigValidationError::InvalidPathResolution(self.path_resolution));
        }

        if self.end_time.checked_add(self.item_max_time).is_none() {
            return Err(ConfigValidationError::LifetimeOverflow {
                end_time: self.end_time,
                item_max_time: self.item_max_time,
            });
        }

        let steps = self.item_max_time / self.path_resolution;
        if steps > defaults::MAX_PATH_STEPS {
            return Err(ConfigValidationError::PathTooLong {
                item_max_time: self.item_max_time,
                path_resolution: self.path_resolution,
                steps,
                max: defaults::MAX_PATH_STEPS,
            });
        }

        if self.elastic.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBackendAddress);
        }

        let index_ok = !self.index.is_empty()
            && !self.index.starts_with(&['_', '-', '+'][..])
            && self.index.chars().all(|c| !c.is_whitespace() && !"/\\*?\"<>|,#".contains(c));
        if !index_ok {
            return Err(ConfigValidationError::InvalidIndexName(self.index.clone()));
        }

        Ok(())
    }

    /// Lifetime bounds as a tuple
    pub fn item_lifetime(&self) -> (i64, i64) {
        (self.item_min_time, self.item_max_time)
    }

    /// Speed bounds as a tuple
    pub fn item_speed(&self) -> (f64, f64) {
        (self.item_min_speed, self.item_max_speed)
    }

    /// Number of simulated time steps, `start_time..=end_time`
    pub fn time_steps(&self) -> u64 {
        if self.end_time < self.start_time {
            0
        } else {
            self.end_time.abs_diff(self.start_time).saturating_add(1)
        }
    }

    /// Base URL of the backend, with a scheme and without a trailing slash
    pub fn backend_url(&self) -> String {
        let address = self.elastic.trim().trim_end_matches('/');
        if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        }
    }
}

/// Floor epoch milliseconds to epoch seconds
fn millis_to_seconds(millis: i64) -> i64 {
    millis.div_euclid(1000)
}
