//! Amount parsing for currency normalization
//!
//! Turns a numeric literal such as `5,000K` or `1.5M` into a whole number.
//! Both `,` and `.` are treated as grouping separators, never as decimal
//! points, so `1.5M` parses as 15 million.
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// First digit run (with grouping separators) and an optional trailing unit
    static ref AMOUNT_REGEX: Regex = Regex::new(
        r"(\d[\d,.]*)\s*([KkMmBb])?"
    ).unwrap();
}

/// Magnitude suffix scaling an amount by a power of a thousand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeSuffix {
    Thousand,
    Million,
    Billion,
}

impl MagnitudeSuffix {
    /// Map a unit letter (case-insensitive) to its suffix
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'K' => Some(Self::Thousand),
            'M' => Some(Self::Million),
            'B' => Some(Self::Billion),
            _ => None,
        }
    }

    /// Parse the first character of a captured unit group
    pub fn from_str_opt(unit: Option<&str>) -> Option<Self> {
        unit.and_then(|u| u.chars().next()).and_then(Self::from_letter)
    }

    pub fn multiplier(self) -> u64 {
        match self {
            Self::Thousand => 1_000,
            Self::Million => 1_000_000,
            Self::Billion => 1_000_000_000,
        }
    }
}

/// Why an amount could not be reduced to a number
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The token contains no digits at all
    NoDigits,
    /// The digits (or the scaled value) do not fit in a `u64`
    Overflow(String),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::NoDigits => write!(f, "no digits in amount"),
            ParseFailure::Overflow(digits) => write!(f, "amount out of range: {}", digits),
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Remove grouping separators from a numeric literal
pub fn strip_separators(digits: &str) -> String {
    digits.chars().filter(|c| *c != ',' && *c != '.').collect()
}

/// Parse a token such as `"5,000K"` into its integer value
///
/// The first digit run is used; a `K`/`M`/`B` letter following it scales the
/// result.
///
/// ```
/// use fintext::text_processing::amount::parse;
///
/// assert_eq!(parse("5,000K"), Ok(5_000_000));
/// assert_eq!(parse("1.5M"), Ok(15_000_000));
/// ```
pub fn parse(token: &str) -> Result<u64, ParseFailure> {
    let caps = AMOUNT_REGEX
        .captures(token)
        .ok_or(ParseFailure::NoDigits)?;

    let unit = MagnitudeSuffix::from_str_opt(caps.get(2).map(|m| m.as_str()));
    parse_with_unit(&caps[1], unit)
}

/// Parse a bare digit run, scaling it by an explicitly supplied unit
pub fn parse_with_unit(digits: &str, unit: Option<MagnitudeSuffix>) -> Result<u64, ParseFailure> {
    let stripped = strip_separators(digits);

    if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseFailure::NoDigits);
    }

    let value: u64 = stripped
        .parse()
        .map_err(|_| ParseFailure::Overflow(stripped.clone()))?;

    match unit {
        Some(unit) => value
            .checked_mul(unit.multiplier())
            .ok_or(ParseFailure::Overflow(stripped)),
        None => Ok(value),
    }
}
