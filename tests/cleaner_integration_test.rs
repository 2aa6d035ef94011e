/// Integration tests for the cleaning pipeline through the public API
///
/// These cover sanitize → rewrite → collapse end to end, the batch
/// table variant, and the analysis helpers that consume cleaned text.
use fintext::analysis::{compare, WordFrequencies};
use fintext::text_processing::amount::{self, ParseFailure};
use fintext::text_processing::currency::{resolve, CurrencyCode};
use fintext::text_processing::entities::{extract_entities, EntityKind};
use fintext::text_processing::preprocessing::{preprocess, PreprocessOptions};
use fintext::{clean, FinancialTextCleaner, RewriterOptions, Table};
use serde_json::json;

#[test]
fn test_price_with_colon_and_suffix() {
    assert_eq!(
        clean("Price: $5K for the item"),
        "Price 5000 USD for the item"
    );
}

#[test]
fn test_range_keeps_en_dash_without_code() {
    let result = clean("Cost is 2K-5K");
    assert_eq!(result, "Cost is 2000–5000");
    assert!(!result.contains("USD"));
}

#[test]
fn test_url_removed_and_amount_rewritten() {
    let result = clean("See http://example.com for $1,000 details");
    assert!(!result.contains("example.com"));
    assert!(!result.contains("http"));
    assert!(result.contains("1000 USD"));
    assert_eq!(result, "See for 1000 USD details");
}

#[test]
fn test_amount_parser_contract() {
    assert_eq!(amount::parse("5,000K"), Ok(5_000_000));
    // The dot is a grouping separator, not a decimal point
    assert_eq!(amount::parse("1.5M"), Ok(15_000_000));
    assert_eq!(amount::parse("K"), Err(ParseFailure::NoDigits));
}

#[test]
fn test_currency_resolver_contract() {
    assert_eq!(resolve(Some("$"), "$100"), CurrencyCode::Usd);
    assert_eq!(resolve(None, "50 EUR"), CurrencyCode::Eur);
    assert_eq!(resolve(None, "50 dollars"), CurrencyCode::Usd);
}

#[test]
fn test_clean_is_idempotent_over_mixed_text() {
    let corpus = [
        "<div>Raised $2.5M from U.S. investors</div>",
        "Fees: €1,200 | £300 | ¥400",
        "Loans between 5K-10K, see www.lender.com",
        "Cash-out of $5 Kansas dollars",
        "\"Quoted\" (parenthetical) | check-cashing",
        "",
    ];

    for input in corpus {
        let once = clean(input);
        assert_eq!(clean(&once), once, "not idempotent for {:?}", input);
    }
}

#[test]
fn test_clean_output_has_no_extra_whitespace() {
    let result = clean("  lots\tof \n\n spacing   and $10 ");
    assert_eq!(result, "lots of spacing and 10 USD");
}

#[test]
fn test_batch_cleans_only_named_columns() {
    let table = Table::new()
        .with_column("title", vec![json!("  Price: $5K "), json!(null)])
        .with_column("body", vec![json!("Cost is 2K-5K"), json!(3)])
        .with_column("url", vec![json!("http://example.com"), json!("x")]);

    let cleaner = FinancialTextCleaner::default();
    let cleaned = cleaner.clean_columns(table, &["title", "body", "missing"]);

    assert_eq!(
        cleaned.column("title").unwrap().values,
        vec![json!("Price 5000 USD"), json!(null)]
    );
    assert_eq!(
        cleaned.column("body").unwrap().values,
        vec![json!("Cost is 2000–5000"), json!("3")]
    );
    // Untouched column
    assert_eq!(
        cleaned.column("url").unwrap().values,
        vec![json!("http://example.com"), json!("x")]
    );
    assert!(!cleaned.has_column("missing"));
}

#[test]
fn test_table_json_shape() {
    let table: Table = serde_json::from_value(json!({
        "columns": [
            { "name": "text", "values": ["$1,000 fee"] }
        ]
    }))
    .unwrap();

    let cleaned = FinancialTextCleaner::default().clean_columns(table, &["text"]);
    let value = serde_json::to_value(&cleaned).unwrap();

    assert_eq!(value["columns"][0]["name"], "text");
    assert_eq!(value["columns"][0]["values"][0], "1000 USD fee");
}

#[test]
fn test_iso_suffix_pass_is_opt_in() {
    let extended = FinancialTextCleaner::new(RewriterOptions {
        iso_suffix_pass: true,
    });

    assert_eq!(clean("budget of 5K USD"), "budget of 5K USD");
    assert_eq!(extended.clean("budget of 5K USD"), "budget of 5000 USD");
}

#[test]
fn test_entities_after_cleaning() {
    let text = "Fund raised 5M USD for ETF and IRA products";
    let entities = extract_entities(text);

    let kinds: Vec<EntityKind> = entities.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&EntityKind::Currency));
    assert!(kinds.contains(&EntityKind::Instrument));
    assert!(kinds.contains(&EntityKind::RetirementAccount));
}

#[test]
fn test_preprocess_cleaned_text() {
    let cleaned = clean("The companies are paying dividends: $5K!");
    let processed = preprocess(&cleaned, &PreprocessOptions::default());

    assert!(processed.contains("company"));
    assert!(processed.contains("pay"));
    assert!(processed.contains("dividend"));
    assert!(!processed.contains("the "));
}

#[test]
fn test_frequencies_over_cleaned_corpus() {
    let texts: Vec<String> = ["loan of $5K", "another loan of $5K", "the loan"]
        .iter()
        .map(|t| clean(t))
        .collect();

    let freq = WordFrequencies::from_texts(&texts, true);
    assert_eq!(freq.most_common(1), vec![("loan".to_string(), 3)]);
    assert_eq!(freq.get("USD"), 2);

    let rows = compare(&texts, &["loan approved".to_string()], 3);
    assert_eq!(rows[0].word, "loan");
    assert_eq!(rows[0].count2, 1);
}
