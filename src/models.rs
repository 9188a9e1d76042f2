//! Core data structures for balance readings.
//!
//! Defines the parsed reading, its sign and unit enums, per-line outcomes,
//! and the statistics accumulated while processing a batch of lines.

use crate::constants::{UNIT_CARAT, UNIT_GRAIN, UNIT_GRAM, UNIT_OUNCE, VALUE_CHANGING_MARKER};
use crate::error::ReadingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Polarity reported by the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sign {
    #[default]
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Sign {
    /// Map a sign character; anything other than '-' reads as '+'
    pub fn from_char(c: char) -> Self {
        match c {
            '-' => Sign::Minus,
            _ => Sign::Plus,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Sign::Minus)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Unit abbreviation as printed by the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "gn")]
    Grain,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "ct")]
    Carat,
    #[serde(rename = "oz")]
    Ounce,
}

impl Unit {
    /// All units, in the order the parser tries them
    pub const ALL: [Unit; 4] = [Unit::Grain, Unit::Gram, Unit::Carat, Unit::Ounce];

    /// Look up a unit by its exact code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            UNIT_GRAIN => Some(Unit::Grain),
            UNIT_GRAM => Some(Unit::Gram),
            UNIT_CARAT => Some(Unit::Carat),
            UNIT_OUNCE => Some(Unit::Ounce),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Unit::Grain => UNIT_GRAIN,
            Unit::Gram => UNIT_GRAM,
            Unit::Carat => UNIT_CARAT,
            Unit::Ounce => UNIT_OUNCE,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A successfully parsed balance reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedMeasurement {
    /// Sign character from the readout, '+' when absent
    pub sign: Sign,
    /// Value converted from the numeric token
    pub numeric_part: f64,
    /// Unit code
    pub alpha_part: Unit,
    /// Reading had not settled (trailing 'M')
    pub value_changing: bool,
}

impl ParsedMeasurement {
    /// Canonical readout text, e.g. `- 37.022gnM`
    ///
    /// With a '-' sign only the magnitude is printed, since the parser
    /// applies the sign character to an unsigned token.
    pub fn canonical(&self) -> String {
        let number = if self.sign.is_negative() {
            self.numeric_part.abs()
        } else {
            self.numeric_part
        };
        let marker = if self.value_changing {
            VALUE_CHANGING_MARKER.to_string()
        } else {
            String::new()
        };
        format!("{} {}{}{}", self.sign, number, self.alpha_part, marker)
    }
}

impl fmt::Display for ParsedMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for ParsedMeasurement {
    type Err = ReadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::MeasurementParser::parse(s).ok_or_else(|| ReadingError::no_match(s))
    }
}

/// Result of feeding one input line to the parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingOutcome {
    /// Where the line came from (file path or `<stdin>`)
    pub source: String,
    /// 1-based line number within the source
    pub line_number: usize,
    /// Line as read, without the line terminator
    pub original: String,
    /// Parsed reading, `None` when the line did not match
    pub parsed: Option<ParsedMeasurement>,
}

impl ReadingOutcome {
    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }
}

/// Processing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub sources_processed: usize,
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub readings_parsed: usize,
    pub readings_failed: usize,
    pub readings_changing: usize,
    pub unit_counts: BTreeMap<Unit, usize>,
}

impl ProcessingStats {
    /// Account for one outcome
    pub fn record(&mut self, outcome: &ReadingOutcome) {
        match &outcome.parsed {
            Some(reading) => {
                self.readings_parsed += 1;
                if reading.value_changing {
                    self.readings_changing += 1;
                }
                *self.unit_counts.entry(reading.alpha_part).or_insert(0) += 1;
            }
            None => self.readings_failed += 1,
        }
    }

    /// Readings handed to the parser
    pub fn total_readings(&self) -> usize {
        self.readings_parsed + self.readings_failed
    }

    /// Parsed readings whose value had settled
    pub fn readings_settled(&self) -> usize {
        self.readings_parsed - self.readings_changing
    }

    /// Fold another batch's statistics into this one
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.sources_processed += other.sources_processed;
        self.lines_read += other.lines_read;
        self.lines_skipped += other.lines_skipped;
        self.readings_parsed += other.readings_parsed;
        self.readings_failed += other.readings_failed;
        self.readings_changing += other.readings_changing;
        for (unit, count) in &other.unit_counts {
            *self.unit_counts.entry(*unit).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_codes_round_trip() {
        for unit in Unit::ALL {
            assert_eq!(Unit::from_code(unit.code()), Some(unit));
        }
        let codes: Vec<&str> = Unit::ALL.iter().map(|unit| unit.code()).collect();
        assert_eq!(codes, crate::constants::UNIT_CODES);
        assert_eq!(Unit::from_code("G"), None);
        assert_eq!(Unit::from_code("kg"), None);
    }

    #[test]
    fn test_sign_defaults_to_plus() {
        assert_eq!(Sign::default(), Sign::Plus);
        assert_eq!(Sign::from_char('-'), Sign::Minus);
        assert_eq!(Sign::from_char('+'), Sign::Plus);
    }

    #[test]
    fn test_canonical_form() {
        let reading = ParsedMeasurement {
            sign: Sign::Minus,
            numeric_part: -37.022,
            alpha_part: Unit::Grain,
            value_changing: true,
        };
        assert_eq!(reading.to_string(), "- 37.022gnM");

        let reading = ParsedMeasurement {
            sign: Sign::Plus,
            numeric_part: -2.5,
            alpha_part: Unit::Gram,
            value_changing: false,
        };
        assert_eq!(reading.to_string(), "+ -2.5g");
    }

    #[test]
    fn test_serialization_uses_unit_codes() {
        let reading = ParsedMeasurement {
            sign: Sign::Plus,
            numeric_part: 24.475,
            alpha_part: Unit::Carat,
            value_changing: true,
        };
        let json = serde_json::to_string(&reading).unwrap();
        assert_eq!(
            json,
            r#"{"sign":"+","numeric_part":24.475,"alpha_part":"ct","value_changing":true}"#
        );

        let back: ParsedMeasurement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn test_stats_record_and_merge() {
        let parsed = ReadingOutcome {
            source: "a".to_string(),
            line_number: 1,
            original: "+ 1.0gM".to_string(),
            parsed: Some(ParsedMeasurement {
                sign: Sign::Plus,
                numeric_part: 1.0,
                alpha_part: Unit::Gram,
                value_changing: true,
            }),
        };
        let failed = ReadingOutcome {
            source: "a".to_string(),
            line_number: 2,
            original: "junk".to_string(),
            parsed: None,
        };

        let mut first = ProcessingStats::default();
        first.record(&parsed);
        first.record(&failed);
        assert_eq!(first.total_readings(), 2);
        assert_eq!(first.readings_changing, 1);
        assert_eq!(first.readings_settled(), 0);

        let mut total = ProcessingStats::default();
        total.merge(&first);
        total.merge(&first);
        assert_eq!(total.readings_parsed, 2);
        assert_eq!(total.readings_failed, 2);
        assert_eq!(total.unit_counts.get(&Unit::Gram), Some(&2));
    }
}
