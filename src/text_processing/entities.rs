//! Pattern-based financial entity extraction
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an extracted entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Currency,
    Instrument,
    RetirementAccount,
    FinancialTerm,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Currency => "CURRENCY",
            EntityKind::Instrument => "INSTRUMENT",
            EntityKind::RetirementAccount => "RETIREMENT_ACCOUNT",
            EntityKind::FinancialTerm => "FINANCIAL_TERM",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched span and its category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialEntity {
    pub text: String,
    pub kind: EntityKind,
}

fn pattern(expr: &str, kind: EntityKind) -> (Regex, EntityKind) {
    (Regex::new(expr).unwrap(), kind)
}

lazy_static! {
    /// Patterns in reporting order; matching is case-sensitive
    static ref ENTITY_PATTERNS: Vec<(Regex, EntityKind)> = {
        use EntityKind::*;
        vec![
            // Currency amounts
            pattern(r"\$\s*\d+[\d,.]*(?:\s*[KkMmBb])?\b", Currency),
            pattern(r"\d+[\d,.]*\s*[KkMmBb]?\s*(?:USD|EUR|GBP|CAD|AUD|JPY)\b", Currency),
            pattern(r"€\s*\d+[\d,.]*(?:\s*[KkMmBb])?\b", Currency),
            pattern(r"£\s*\d+[\d,.]*(?:\s*[KkMmBb])?\b", Currency),
            // Instruments
            pattern(r"\b(?:stock|stocks|equity|equities)\b", Instrument),
            pattern(r"\b(?:bond|bonds|treasury|municipal)\b", Instrument),
            pattern(r"\b(?:option|options|put|call|derivative)\b", Instrument),
            pattern(r"\b(?:ETF|etf|mutual fund|index fund)\b", Instrument),
            pattern(r"\b(?:IRA|ira|401k|roth|traditional)\b", RetirementAccount),
            // Terms
            pattern(r"\b(?:dividend|dividends)\b", FinancialTerm),
            pattern(r"\b(?:interest|rate|APR|APY)\b", FinancialTerm),
            pattern(r"\b(?:tax|taxes|deduction|credit)\b", FinancialTerm),
            pattern(r"\b(?:invest|investment|portfolio)\b", FinancialTerm),
            pattern(r"\b(?:loan|mortgage|refinance)\b", FinancialTerm),
        ]
    };
}

/// Every pattern match in `text`, grouped by pattern order then position
///
/// Overlapping matches from different patterns are all reported.
pub fn extract_entities(text: &str) -> Vec<FinancialEntity> {
    ENTITY_PATTERNS
        .iter()
        .flat_map(|(regex, kind)| {
            regex.find_iter(text).map(move |m| FinancialEntity {
                text: m.as_str().to_string(),
                kind: *kind,
            })
        })
        .collect()
}
