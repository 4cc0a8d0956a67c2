//! Error types and handling
//!
//! This module contains the run-level error type. Every variant is fatal: the
//! run stops at the first error and reports it.

use thiserror::Error;

use crate::backend::BackendError;
use crate::types::{ConfigError, ConfigValidationError};

/// Errors that can end a run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(#[from] ConfigValidationError),

    /// Configuration could not be loaded
    #[error("Configuration loading failed: {0}")]
    ConfigLoadError(#[from] ConfigError),

    /// Index preparation failed
    #[error("Index setup failed: {0}")]
    IndexSetupError(#[source] BackendError),

    /// A batch could not be encoded or written
    #[error("Bulk load failed: {0}")]
    LoadError(#[source] BackendError),
}

impl SimulationError {
    /// Wrap a backend error raised while preparing the index
    pub fn index_setup(error: BackendError) -> Self {
        Self::IndexSetupError(error)
    }

    /// Wrap a backend error raised while loading batches
    pub fn load(error: BackendError) -> Self {
        Self::LoadError(error)
    }

    /// Underlying backend error, if any
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            SimulationError::IndexSetupError(error) | SimulationError::LoadError(error) => {
                Some(error)
            }
            _ => None,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::ConfigLoadError(_) => "Configuration",
            SimulationError::IndexSetupError(_) => "Index Setup",
            SimulationError::LoadError(_) => "Bulk Load",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
