//! Currency resolution from symbols and embedded ISO codes
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies recognized by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
}

impl CurrencyCode {
    /// Scan order for ISO codes embedded in text
    pub const ALL: [CurrencyCode; 3] = [CurrencyCode::Usd, CurrencyCode::Eur, CurrencyCode::Gbp];

    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
        }
    }

    /// Map a currency symbol to its code
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "$" => Some(CurrencyCode::Usd),
            "€" => Some(CurrencyCode::Eur),
            "£" => Some(CurrencyCode::Gbp),
            _ => None,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::Usd
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the currency of a matched amount
///
/// An explicit symbol wins. Otherwise the matched span is searched
/// case-insensitively for `USD`, `EUR` and `GBP`, in that order. Anything
/// else defaults to USD.
pub fn resolve(symbol: Option<&str>, full_match: &str) -> CurrencyCode {
    if let Some(code) = symbol.and_then(CurrencyCode::from_symbol) {
        return code;
    }

    let upper = full_match.to_uppercase();
    CurrencyCode::ALL
        .into_iter()
        .find(|code| upper.contains(code.as_str()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dollar_symbol() {
        assert_eq!(resolve(Some("$"), "$100"), CurrencyCode::Usd);
    }

    #[test]
    fn test_resolve_euro_and_pound_symbols() {
        assert_eq!(resolve(Some("€"), "€50"), CurrencyCode::Eur);
        assert_eq!(resolve(Some("£"), "£7"), CurrencyCode::Gbp);
    }

    #[test]
    fn test_resolve_embedded_iso_code() {
        assert_eq!(resolve(None, "50 EUR"), CurrencyCode::Eur);
        assert_eq!(resolve(None, "12 gbp"), CurrencyCode::Gbp);
    }

    #[test]
    fn test_resolve_defaults_to_usd() {
        assert_eq!(resolve(None, "50 dollars"), CurrencyCode::Usd);
        assert_eq!(resolve(None, ""), CurrencyCode::Usd);
    }

    #[test]
    fn test_symbol_takes_priority_over_embedded_code() {
        assert_eq!(resolve(Some("£"), "£5 USD"), CurrencyCode::Gbp);
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_scan() {
        assert_eq!(resolve(Some("¥"), "¥5 EUR"), CurrencyCode::Eur);
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(CurrencyCode::Gbp.to_string(), "GBP");
        let json = serde_json::to_string(&CurrencyCode::Eur).unwrap();
        assert_eq!(json, "\"EUR\"");
    }
}
