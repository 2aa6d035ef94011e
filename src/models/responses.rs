use serde::Serialize;

use crate::analysis::charts::{BarChart, Histogram, TagCloud};
use crate::analysis::ComparisonRow;
use crate::text_processing::entities::FinancialEntity;
use crate::text_processing::Table;

#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub cleaned: String,
}

#[derive(Debug, Serialize)]
pub struct BatchCleanResponse {
    pub table: Table,
}

#[derive(Debug, Serialize)]
pub struct PreprocessResponse {
    pub tokens: Vec<String>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EntitiesResponse {
    pub entities: Vec<FinancialEntity>,
}

#[derive(Debug, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct FrequenciesResponse {
    pub words: Vec<WordCount>,
    pub bar_chart: BarChart,
    pub tag_cloud: TagCloud,
    pub histogram: Histogram,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_processing::entities::EntityKind;

    #[test]
    fn test_clean_response_serialization() {
        let response = CleanResponse {
            cleaned: "5000 USD".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"cleaned":"5000 USD"}"#);
    }

    #[test]
    fn test_entities_response_serialization() {
        let response = EntitiesResponse {
            entities: vec![FinancialEntity {
                text: "$5K".to_string(),
                kind: EntityKind::Currency,
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["entities"][0]["text"], "$5K");
        assert_eq!(json["entities"][0]["kind"], "CURRENCY");
    }

    #[test]
    fn test_health_response_ok() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"0.1.0\""));
    }

    #[test]
    fn test_batch_response_keeps_table_shape() {
        let response = BatchCleanResponse {
            table: Table::new().with_column("body", vec![serde_json::json!("x")]),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["table"]["columns"][0]["name"], "body");
        assert_eq!(json["table"]["columns"][0]["values"][0], "x");
    }
}
