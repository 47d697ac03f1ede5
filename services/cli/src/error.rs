//! services/cli/src/error.rs
//!
//! Defines the primary error type for the entire CLI service.

use crate::config::ConfigError;
use library_core::{LibraryError, PortError};

/// The primary error type for the `cli` service.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a rejected library operation. These are recoverable:
    /// the menu reports them and keeps running.
    #[error("{0}")]
    Library(#[from] LibraryError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., reading the terminal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
