//! Currency rewriting
//!
//! Rewrites currency expressions into `"{integer} {CODE}"` form through an
//! ordered list of passes. Each pass is a global find-and-replace over the
//! output of the previous pass:
//!
//! 1. Ranges sharing a unit: `2-5K` → `2000–5000`
//! 2. Symbol amounts without a unit: `$1,000` → `1000 USD`
//! 3. Symbol amounts with a unit: `€5K` → `5000 EUR`
//! 4. ISO-suffixed amounts (opt-in): `5K USD` → `5000 USD`, `50kish EUR` → `50000 EUR approx.`
//!
//! Narrow patterns run first so that broader ones never split a span that an
//! earlier pass already rewrote. Every canonical form is a fixed point of all
//! passes, so rewriting twice gives the same text as rewriting once.
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;

use super::amount::{self, MagnitudeSuffix};
use super::currency::{self, CurrencyCode};

lazy_static! {
    /// `<num>[unit]?[-–]<num><unit>`; the trailing unit is shared by both numbers.
    /// Units are attached to their digits, so a bare `m` after a range stays a word.
    static ref RANGE_WITH_UNIT_REGEX: Regex = Regex::new(
        r"(\d+(?:[,.]\d+)*)([KkMmBb])?\s*[-–]\s*(\d+(?:[,.]\d+)*)([KkMmBb])\b"
    ).unwrap();

    /// `<symbol><num>` plus whatever word characters directly follow the digits.
    /// Attached word characters mean the span belongs to another pass (or none).
    static ref SYMBOL_AMOUNT_REGEX: Regex = Regex::new(
        r"([$€£])\s*(\d+(?:[,.]\d+)*)(\w+)?"
    ).unwrap();

    /// `<symbol><num><unit>`
    static ref SYMBOL_AMOUNT_WITH_UNIT_REGEX: Regex = Regex::new(
        r"([$€£])\s*(\d+(?:[,.]\d+)*)([KkMmBb])\b"
    ).unwrap();

    /// `<num>[unit][-ish] <CODE> [approx]`
    static ref ISO_SUFFIXED_REGEX: Regex = Regex::new(
        r"(\d+(?:[,.]\d+)*)([KkMmBb])?\s*(-?(?i:ish))?\s*(USD|EUR|GBP)\b(\s+approx\b\.?)?"
    ).unwrap();
}

/// A fully resolved amount, rendered as canonical text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalAmount {
    pub value: u64,
    pub currency: CurrencyCode,
    pub approx: bool,
}

impl fmt::Display for CanonicalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)?;
        if self.approx {
            write!(f, " approx.")?;
        }
        Ok(())
    }
}

/// Options controlling which passes run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriterOptions {
    /// Also rewrite amounts followed by an ISO code (`5K USD`)
    pub iso_suffix_pass: bool,
}

/// One rewrite pass: a pattern paired with its handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteRule {
    RangeWithUnit,
    SymbolAmount,
    SymbolAmountWithUnit,
    IsoSuffixed,
}

/// Pass order used by the cleaner
pub const DEFAULT_PASSES: &[RewriteRule] = &[
    RewriteRule::RangeWithUnit,
    RewriteRule::SymbolAmount,
    RewriteRule::SymbolAmountWithUnit,
];

/// Default passes followed by the ISO-suffixed pass
pub const EXTENDED_PASSES: &[RewriteRule] = &[
    RewriteRule::RangeWithUnit,
    RewriteRule::SymbolAmount,
    RewriteRule::SymbolAmountWithUnit,
    RewriteRule::IsoSuffixed,
];

impl RewriteRule {
    pub fn name(self) -> &'static str {
        match self {
            RewriteRule::RangeWithUnit => "range_with_unit",
            RewriteRule::SymbolAmount => "symbol_amount",
            RewriteRule::SymbolAmountWithUnit => "symbol_amount_with_unit",
            RewriteRule::IsoSuffixed => "iso_suffixed",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            RewriteRule::RangeWithUnit => &RANGE_WITH_UNIT_REGEX,
            RewriteRule::SymbolAmount => &SYMBOL_AMOUNT_REGEX,
            RewriteRule::SymbolAmountWithUnit => &SYMBOL_AMOUNT_WITH_UNIT_REGEX,
            RewriteRule::IsoSuffixed => &ISO_SUFFIXED_REGEX,
        }
    }

    fn replace(self, caps: &Captures) -> String {
        match self {
            RewriteRule::RangeWithUnit => RangeCaptures::from_captures(caps).render(),
            RewriteRule::SymbolAmount => SymbolCaptures::from_captures(caps).render(),
            RewriteRule::SymbolAmountWithUnit => SymbolUnitCaptures::from_captures(caps).render(),
            RewriteRule::IsoSuffixed => IsoCaptures::from_captures(caps).render(),
        }
    }

    /// Run this pass over the whole text
    pub fn apply(self, text: &str) -> String {
        self.pattern()
            .replace_all(text, |caps: &Captures| self.replace(caps))
            .into_owned()
    }
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> Option<&'t str> {
    caps.get(index).map(|m| m.as_str())
}

/// Captures of the range pass
struct RangeCaptures<'t> {
    full: &'t str,
    start: &'t str,
    start_unit: Option<MagnitudeSuffix>,
    end: &'t str,
    unit: Option<MagnitudeSuffix>,
}

impl<'t> RangeCaptures<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        Self {
            full: group(caps, 0).unwrap_or_default(),
            start: group(caps, 1).unwrap_or_default(),
            start_unit: MagnitudeSuffix::from_str_opt(group(caps, 2)),
            end: group(caps, 3).unwrap_or_default(),
            unit: MagnitudeSuffix::from_str_opt(group(caps, 4)),
        }
    }

    fn render(&self) -> String {
        let start = amount::parse_with_unit(self.start, self.start_unit.or(self.unit));
        let end = amount::parse_with_unit(self.end, self.unit);

        match (start, end) {
            (Ok(start), Ok(end)) => format!("{}–{}", start, end),
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!(text = self.full, error = %e, "Leaving range unchanged");
                self.full.to_string()
            }
        }
    }
}

/// Captures of the unit-less symbol pass
struct SymbolCaptures<'t> {
    full: &'t str,
    symbol: &'t str,
    digits: &'t str,
    trailing: Option<&'t str>,
}

impl<'t> SymbolCaptures<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        Self {
            full: group(caps, 0).unwrap_or_default(),
            symbol: group(caps, 1).unwrap_or_default(),
            digits: group(caps, 2).unwrap_or_default(),
            trailing: group(caps, 3),
        }
    }

    fn render(&self) -> String {
        // An attached unit is handled by the next pass; digits glued to other
        // word characters are not amounts at all.
        if self.trailing.is_some() {
            return self.full.to_string();
        }

        let code = currency::resolve(Some(self.symbol), self.full);
        format!("{} {}", amount::strip_separators(self.digits), code)
    }
}

/// Captures of the symbol-with-unit pass
struct SymbolUnitCaptures<'t> {
    full: &'t str,
    symbol: &'t str,
    digits: &'t str,
    unit: Option<MagnitudeSuffix>,
}

impl<'t> SymbolUnitCaptures<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        Self {
            full: group(caps, 0).unwrap_or_default(),
            symbol: group(caps, 1).unwrap_or_default(),
            digits: group(caps, 2).unwrap_or_default(),
            unit: MagnitudeSuffix::from_str_opt(group(caps, 3)),
        }
    }

    fn render(&self) -> String {
        match amount::parse_with_unit(self.digits, self.unit) {
            Ok(value) => CanonicalAmount {
                value,
                currency: currency::resolve(Some(self.symbol), self.full),
                approx: false,
            }
            .to_string(),
            Err(e) => {
                tracing::debug!(text = self.full, error = %e, "Leaving amount unchanged");
                self.full.to_string()
            }
        }
    }
}

/// Captures of the ISO-suffixed pass
struct IsoCaptures<'t> {
    full: &'t str,
    digits: &'t str,
    unit: Option<MagnitudeSuffix>,
    approx: bool,
}

impl<'t> IsoCaptures<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        Self {
            full: group(caps, 0).unwrap_or_default(),
            digits: group(caps, 1).unwrap_or_default(),
            unit: MagnitudeSuffix::from_str_opt(group(caps, 2)),
            approx: caps.get(3).is_some() || caps.get(5).is_some(),
        }
    }

    fn render(&self) -> String {
        match amount::parse_with_unit(self.digits, self.unit) {
            Ok(value) => CanonicalAmount {
                value,
                currency: currency::resolve(None, self.full),
                approx: self.approx,
            }
            .to_string(),
            Err(e) => {
                tracing::debug!(text = self.full, error = %e, "Leaving amount unchanged");
                self.full.to_string()
            }
        }
    }
}

/// Ordered pipeline of rewrite passes
#[derive(Debug, Clone, Copy)]
pub struct CurrencyRewriter {
    passes: &'static [RewriteRule],
}

impl Default for CurrencyRewriter {
    fn default() -> Self {
        Self::new(RewriterOptions::default())
    }
}

impl CurrencyRewriter {
    pub fn new(options: RewriterOptions) -> Self {
        let passes = if options.iso_suffix_pass {
            EXTENDED_PASSES
        } else {
            DEFAULT_PASSES
        };
        Self { passes }
    }

    pub fn passes(&self) -> &'static [RewriteRule] {
        self.passes
    }

    /// Apply every pass in order, each over the previous pass's output
    pub fn rewrite(&self, text: &str) -> String {
        let mut result = text.to_string();

        for pass in self.passes {
            let rewritten = pass.apply(&result);
            if rewritten != result {
                tracing::trace!(pass = pass.name(), "Rewrite pass changed text");
            }
            result = rewritten;
        }

        result
    }
}

/// Rewrite with the default passes
pub fn rewrite(text: &str) -> String {
    CurrencyRewriter::default().rewrite(text)
}
