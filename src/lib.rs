//! Balance Reading Library
//!
//! Parses readout strings from precision balances, such as `- 37.022gnM`,
//! into their sign, numeric value, unit code and settling marker.
//!
//! This library provides:
//! - [`MeasurementParser`], a stateless parser for single readouts
//! - [`ReadingProcessor`], which applies the parser to capture files line by line
//! - Serializable result and statistics types for reporting
//!
//! ```
//! use balance_reading::{MeasurementParser, Sign, Unit};
//!
//! let reading = MeasurementParser::parse("+ 24.475ctM").unwrap();
//! assert_eq!(reading.sign, Sign::Plus);
//! assert_eq!(reading.numeric_part, 24.475);
//! assert_eq!(reading.alpha_part, Unit::Carat);
//! assert!(reading.value_changing);
//!
//! assert!(MeasurementParser::parse("invalid_string_123").is_none());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;

// Re-export commonly used types
pub use config::{OutputFormat, ProcessorConfig};
pub use error::{ReadingError, Result};
pub use models::{ParsedMeasurement, ProcessingStats, ReadingOutcome, Sign, Unit};
pub use parser::{MeasurementParser, parse_measurement};
pub use processor::{ReadingBatch, ReadingProcessor};
