//! Batch processing of balance readout captures.
//!
//! Feeds every line of a capture (file or stdin) through the parser,
//! keeping the per-line outcome together with running statistics.

use crate::config::ProcessorConfig;
use crate::constants::STDIN_SOURCE_NAME;
use crate::error::{ReadingError, Result};
use crate::models::{ProcessingStats, ReadingOutcome};
use crate::parser::MeasurementParser;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcomes of one or more processed sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingBatch {
    pub outcomes: Vec<ReadingOutcome>,
    pub stats: ProcessingStats,
}

impl ReadingBatch {
    /// Append another batch, merging its statistics
    pub fn extend(&mut self, other: ReadingBatch) {
        self.stats.merge(&other.stats);
        self.outcomes.extend(other.outcomes);
    }

    /// Outcomes whose line did not parse
    pub fn failures(&self) -> impl Iterator<Item = &ReadingOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_parsed())
    }
}

/// Applies [`MeasurementParser`] line by line
#[derive(Debug, Clone, Default)]
pub struct ReadingProcessor {
    config: ProcessorConfig,
}

impl ReadingProcessor {
    /// Create a processor, rejecting invalid configuration
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process every line of `reader`, labelling outcomes with `source_name`
    pub fn process_reader<R: BufRead>(
        &self,
        reader: R,
        source_name: &str,
    ) -> Result<ReadingBatch> {
        let mut batch = ReadingBatch::default();
        batch.stats.sources_processed = 1;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|e| ReadingError::ReadFailed {
                source_name: source_name.to_string(),
                line: line_number,
                reason: e.to_string(),
            })?;
            batch.stats.lines_read += 1;

            if self.config.should_skip(&line) {
                batch.stats.lines_skipped += 1;
                continue;
            }

            let parsed = MeasurementParser::parse(&line);
            if parsed.is_none() {
                debug!("{}:{}: failed to parse {:?}", source_name, line_number, line);
            }

            let outcome = ReadingOutcome {
                source: source_name.to_string(),
                line_number,
                original: line,
                parsed,
            };
            batch.stats.record(&outcome);
            batch.outcomes.push(outcome);
        }

        info!(
            "Processed {}: {} parsed, {} failed, {} skipped",
            source_name,
            batch.stats.readings_parsed,
            batch.stats.readings_failed,
            batch.stats.lines_skipped
        );

        Ok(batch)
    }

    /// Process a capture file
    pub fn process_file(&self, path: &Path) -> Result<ReadingBatch> {
        if !path.exists() {
            return Err(ReadingError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        self.process_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Process lines piped on stdin
    pub fn process_stdin(&self) -> Result<ReadingBatch> {
        let stdin = io::stdin();
        self.process_reader(stdin.lock(), STDIN_SOURCE_NAME)
    }

    /// Process several files into one batch, in order
    pub fn process_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ReadingBatch> {
        let mut batch = ReadingBatch::default();
        for path in paths {
            batch.extend(self.process_file(path.as_ref())?);
        }
        Ok(batch)
    }

    /// Apply `fail_on_unparsed` to a finished batch
    pub fn check_batch(&self, batch: &ReadingBatch) -> Result<()> {
        let failed = batch.stats.readings_failed;
        if self.config.fail_on_unparsed && failed > 0 {
            warn!("{} readings could not be parsed", failed);
            return Err(ReadingError::UnparsedReadings {
                failed,
                total: batch.stats.total_readings(),
            });
        }
        Ok(())
    }
}
