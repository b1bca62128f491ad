//! Centralized error handling for mdconvert
//!
//! This module provides the application-level error type used by the
//! binary and the configuration layer. Export operations report through
//! [`ExportError`](crate::export::ExportError) and the notification manager
//! instead, since a failed export is an outcome rather than a fatal error.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to read the markdown input
    InputRead { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }

            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InputRead { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
