//! Noise removal for financial text
//!
//! Strips markup, URLs, stock phrases and decorative punctuation before the
//! currency rewriter runs. Hyphens inside amount ranges (`2K-5K`) are turned
//! into en-dashes first so that removing decorative hyphens cannot fuse the
//! two amounts together.
use lazy_static::lazy_static;
use regex::Regex;

/// Characters removed outright
pub const DECORATIVE_CHARS: &[char] = &['|', 'ǀ', '│', '\'', '"', '(', ')', '.', '-', ':'];

/// Stock phrases dropped from scraped articles
const BOILERPLATE_PATTERNS: &[&str] = &[r"(?i)see,? for starters at least,?"];

lazy_static! {
    /// HTML-like tags, shortest match
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<.*?>").unwrap();

    /// Bare URLs up to the next whitespace
    static ref URL_REGEX: Regex = Regex::new(r"http\S+|www\S+").unwrap();

    static ref BOILERPLATE_REGEXES: Vec<Regex> = BOILERPLATE_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect();

    static ref US_ABBREVIATION_REGEX: Regex = Regex::new(r"\bU\.S\.").unwrap();

    static ref CHECK_CASHING_REGEX: Regex = Regex::new(r"(?i)check[- ]cashing").unwrap();

    /// Hyphen between an amount and a unit-bearing amount: `2K-5K`, `10 - 20M`
    static ref AMOUNT_RANGE_HYPHEN_REGEX: Regex = Regex::new(
        r"(\d[KkMmBb]?)\s*-\s*(\d[\d,.]*[KkMmBb])\b"
    ).unwrap();
}

/// Remove tags, URLs, boilerplate and decorative characters, then collapse whitespace
pub fn sanitize(text: &str) -> String {
    let mut result = HTML_TAG_REGEX.replace_all(text, "").into_owned();
    result = URL_REGEX.replace_all(&result, " ").into_owned();

    for regex in BOILERPLATE_REGEXES.iter() {
        result = regex.replace_all(&result, "").into_owned();
    }

    result = normalize_abbreviations(&result);
    result = protect_amount_ranges(&result);
    result = strip_decorative_chars(&result);

    collapse_whitespace(&result)
}

/// `U.S.` → `US`, `check-cashing` → `check cashing`
pub fn normalize_abbreviations(text: &str) -> String {
    let result = US_ABBREVIATION_REGEX.replace_all(text, "US");
    CHECK_CASHING_REGEX
        .replace_all(&result, "check cashing")
        .into_owned()
}

/// Swap the hyphen of an amount range for an en-dash
pub fn protect_amount_ranges(text: &str) -> String {
    AMOUNT_RANGE_HYPHEN_REGEX
        .replace_all(text, "${1}–${2}")
        .into_owned()
}

pub fn strip_decorative_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !DECORATIVE_CHARS.contains(c))
        .collect()
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_html_tags() {
        assert_eq!(sanitize("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_strips_urls() {
        assert_eq!(
            sanitize("See http://example.com/a?b=c for more"),
            "See for more"
        );
        assert_eq!(sanitize("visit www.bank.com today"), "visit today");
    }

    #[test]
    fn test_removes_boilerplate_phrase() {
        assert_eq!(
            sanitize("Rates are high, see, for starters at least, the Fed"),
            "Rates are high, the Fed"
        );
        assert_eq!(sanitize("SEE FOR STARTERS AT LEAST the data"), "the data");
    }

    #[test]
    fn test_us_abbreviation() {
        assert_eq!(sanitize("the U.S. economy"), "the US economy");
        assert_eq!(normalize_abbreviations("U.S.-based"), "US-based");
    }

    #[test]
    fn test_check_cashing_variants() {
        assert_eq!(sanitize("a check-cashing store"), "a check cashing store");
        assert_eq!(sanitize("Check Cashing fees"), "check cashing fees");
    }

    #[test]
    fn test_removes_decorative_chars() {
        assert_eq!(
            sanitize("He said \"buy\" (now) | it's ǀ│ time."),
            "He said buy now its time"
        );
    }

    #[test]
    fn test_removes_colon() {
        assert_eq!(sanitize("Price: $5K"), "Price $5K");
    }

    #[test]
    fn test_plain_hyphen_removed() {
        assert_eq!(sanitize("long-term"), "longterm");
    }

    #[test]
    fn test_amount_range_hyphen_becomes_en_dash() {
        assert_eq!(sanitize("2K-5K"), "2K–5K");
        assert_eq!(sanitize("10 - 20M"), "10–20M");
    }

    #[test]
    fn test_range_without_unit_loses_hyphen() {
        assert_eq!(sanitize("2019-2020"), "20192020");
        // A separate letter is a word, not a unit
        assert_eq!(sanitize("2019-2020 B"), "20192020 B");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize("  too \t many\n\nspaces  "), "too many spaces");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = "<i>U.S.</i> check-cashing: $1,000 (see www.x.com) 2K-5K";
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
    }
}
