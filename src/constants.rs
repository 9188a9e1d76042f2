//! Readout grammar constants
//!
//! Unit codes, the settling marker, and the pattern the parser compiles.

// =============================================================================
// Unit Codes
// =============================================================================

/// Unit codes in matching order. "gn" must precede "g".
pub const UNIT_CODES: &[&str] = &["gn", "g", "ct", "oz"];

/// Grain
pub const UNIT_GRAIN: &str = "gn";

/// Gram
pub const UNIT_GRAM: &str = "g";

/// Carat
pub const UNIT_CARAT: &str = "ct";

/// Ounce
pub const UNIT_OUNCE: &str = "oz";

// =============================================================================
// Markers
// =============================================================================

/// Suffix the balance appends while the reading has not settled
pub const VALUE_CHANGING_MARKER: char = 'M';

// =============================================================================
// Pattern
// =============================================================================

/// Full readout pattern, applied to the trimmed input.
///
/// Groups:
/// - `sign`: optional leading '+' or '-'
/// - `numeric`: optional embedded '-', ASCII digits, optional fraction
/// - `unit`: one of [`UNIT_CODES`], alternatives in declared order
/// - `marker`: optional trailing 'M'
///
/// Whitespace is only allowed between the sign and the number.
pub const READING_PATTERN: &str =
    r"^(?P<sign>[+-]?)\s*(?P<numeric>-?[0-9]+(?:\.[0-9]*)?)(?P<unit>gn|g|ct|oz)(?P<marker>M?)$";

// =============================================================================
// Input Handling
// =============================================================================

/// Lines starting with this prefix are skipped by default
pub const DEFAULT_COMMENT_PREFIX: &str = "#";

/// Name used for stdin in logs and reports
pub const STDIN_SOURCE_NAME: &str = "<stdin>";
