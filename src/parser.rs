//! Balance readout parsing.
//!
//! Splits a readout such as `- 37.022gnM` into sign, value, unit code and
//! the settling marker. Input that does not match the readout grammar is
//! reported as `None`, never as a panic.

use crate::constants::READING_PATTERN;
use crate::models::{ParsedMeasurement, Sign, Unit};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{error, trace, warn};

lazy_static! {
    /// Compiled readout pattern
    /// Matches: [sign] [whitespace] [-]digits[.digits] unit [M]
    /// Examples: "+ 0.000gn", "- 37.022gnM", "+ 0.17259oz", "12g"
    static ref READING_REGEX: Regex =
        Regex::new(READING_PATTERN).expect("readout pattern is a valid regex");
}

/// Stateless parser for balance readouts
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementParser;

impl MeasurementParser {
    /// Parse one readout. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<ParsedMeasurement> {
        let trimmed = input.trim();

        let Some(captures) = READING_REGEX.captures(trimmed) else {
            trace!("No match for readout: {:?}", trimmed);
            return None;
        };

        let reading = Self::build(&captures, trimmed)?;
        trace!("Parsed {:?} as {:?}", trimmed, reading);
        Some(reading)
    }

    /// Cheap check without building the result
    pub fn is_reading(input: &str) -> bool {
        Self::parse(input).is_some()
    }

    fn build(captures: &Captures<'_>, trimmed: &str) -> Option<ParsedMeasurement> {
        let sign = captures
            .name("sign")
            .and_then(|m| m.as_str().chars().next())
            .map(Sign::from_char)
            .unwrap_or_default();

        let numeric_str = captures.name("numeric")?.as_str();
        let numeric_part = Self::convert_numeric(numeric_str, sign, trimmed)?;

        // The pattern only admits known codes; a miss here means the two disagree.
        let unit_str = captures.name("unit")?.as_str();
        let Some(alpha_part) = Unit::from_code(unit_str) else {
            error!(
                "Readout pattern matched unknown unit {:?} in {:?}",
                unit_str, trimmed
            );
            return None;
        };

        let value_changing = captures
            .name("marker")
            .is_some_and(|m| !m.as_str().is_empty());

        Some(ParsedMeasurement {
            sign,
            numeric_part,
            alpha_part,
            value_changing,
        })
    }

    /// Convert the numeric token and apply the sign character.
    ///
    /// A '-' sign character negates an unsigned token; a token that already
    /// carries '-' keeps its value whatever the sign character says.
    fn convert_numeric(numeric_str: &str, sign: Sign, trimmed: &str) -> Option<f64> {
        // Grammar guarantees [-]digits[.digits], which f64 always accepts.
        let value = match numeric_str.parse::<f64>() {
            Ok(value) => value,
            Err(e) => {
                error!(
                    "Matched numeric token {:?} in {:?} failed to convert: {}",
                    numeric_str, trimmed, e
                );
                return None;
            }
        };

        if !value.is_finite() {
            warn!(
                "Numeric token {:?} in {:?} overflows f64, rejecting",
                numeric_str, trimmed
            );
            return None;
        }

        if sign.is_negative() && !numeric_str.starts_with('-') {
            Some(-value)
        } else {
            Some(value)
        }
    }
}

/// Shorthand for [`MeasurementParser::parse`]
pub fn parse_measurement(input: &str) -> Option<ParsedMeasurement> {
    MeasurementParser::parse(input)
}
