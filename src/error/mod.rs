//! Error types for the history subsystem.
//!
//! The taxonomy separates what must propagate from what is recovered locally:
//!
//! - [`FormatError`] - unparsable snowflake or timestamp, propagated to the caller
//! - [`TransportError`] - a single request failed, returned by the transport
//! - [`TransportAnomaly`] - a page response unusable as a list, recovered as end of data
//! - [`RecordShapeError`] - one message lacks a key, recovered by skipping that message
//! - [`ConfigError`] - startup misconfiguration, the only fatal category
//!
//! `AppError` aggregates the propagating kinds for the command line entry point.

pub mod config;
pub mod format;
pub mod record;
pub mod transport;

use thiserror::Error;

pub use config::ConfigError;
pub use format::FormatError;
pub use record::RecordShapeError;
pub use transport::{TransportAnomaly, TransportError};

/// Top-level application error type.
///
/// Aggregates the error kinds that are allowed to abort the command line tool.
/// Per-channel and per-message failures never reach this type; they are logged
/// where they occur and the walk continues with what could be gathered.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Single-shot lookup (current user, guild list) failed.
    #[error(transparent)]
    TransportErr(#[from] TransportError),

    /// Identifier or timestamp given on the command line is malformed.
    #[error(transparent)]
    FormatErr(#[from] FormatError),

    /// HTTP client could not be constructed.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Output could not be serialized.
    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// Logger could not be installed.
    #[error("Failed to initialize logger: {0}")]
    LoggerErr(String),

    /// Output file could not be written.
    #[error("{0}")]
    OutputErr(String),
}
