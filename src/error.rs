//! Error handling for balance reading operations.
//!
//! A reading that does not match the readout grammar is an ordinary outcome
//! and is reported as `None` by the parser. The variants here cover the
//! surrounding concerns: input files, configuration, and output rendering.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to read input {source_name} at line {line}: {reason}")]
    ReadFailed {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("Not a balance reading: '{input}'")]
    NoMatch { input: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("{failed} of {total} readings could not be parsed")]
    UnparsedReadings { failed: usize, total: usize },
}

impl ReadingError {
    /// Create a no-match error for the given raw input
    pub fn no_match(input: impl Into<String>) -> Self {
        Self::NoMatch {
            input: input.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadingError>;
