//! Configuration management and validation.
//!
//! Controls how input lines are fed to the parser and how results are
//! rendered. Defaults match the sample capture files: blank lines and
//! `#` comments are skipped, output is human readable text.

use crate::constants::DEFAULT_COMMENT_PREFIX;
use crate::error::{ReadingError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Output format for processed readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per reading plus a colored summary
    #[default]
    Text,
    /// A single JSON document with all outcomes and statistics
    Json,
    /// One JSON object per reading
    Jsonl,
}

/// Settings for batch processing of readout lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Do not hand empty lines to the parser
    pub skip_blank_lines: bool,

    /// Do not hand comment lines to the parser
    pub skip_comments: bool,

    /// Prefix that marks a comment line
    pub comment_prefix: String,

    /// How results are rendered
    pub output_format: OutputFormat,

    /// Treat any unparsed reading as a failure of the run
    pub fail_on_unparsed: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            skip_blank_lines: true,
            skip_comments: true,
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
            output_format: OutputFormat::Text,
            fail_on_unparsed: false,
        }
    }
}

impl ProcessorConfig {
    /// Report blank lines as failed readings instead of skipping them
    pub fn with_blank_lines(mut self) -> Self {
        self.skip_blank_lines = false;
        self
    }

    /// Parse comment lines like any other line
    pub fn with_comments(mut self) -> Self {
        self.skip_comments = false;
        self
    }

    /// Use a custom comment prefix
    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Fail the run when any reading is unparsed
    pub fn with_fail_on_unparsed(mut self) -> Self {
        self.fail_on_unparsed = true;
        self
    }

    /// Check settings for consistency
    pub fn validate(&self) -> Result<()> {
        if self.skip_comments && self.comment_prefix.trim().is_empty() {
            return Err(ReadingError::configuration(
                "comment_prefix must not be empty while comments are skipped",
            ));
        }

        debug!("Processor configuration validated: {:?}", self);
        Ok(())
    }

    /// Whether a raw line should bypass the parser
    pub fn should_skip(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if self.skip_blank_lines && trimmed.is_empty() {
            return true;
        }
        self.skip_comments && !trimmed.is_empty() && trimmed.starts_with(&self.comment_prefix)
    }
}
