use serde::Deserialize;

use crate::analysis::charts::DEFAULT_BAR_CHART_TOP_N;
use crate::text_processing::preprocessing::PreprocessOptions;
use crate::text_processing::Table;

#[derive(Debug, Deserialize)]
pub struct CleanRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchCleanRequest {
    pub table: Table,
    pub columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreprocessRequest {
    pub text: String,
    #[serde(default)]
    pub options: PreprocessOptions,
}

#[derive(Debug, Deserialize)]
pub struct EntitiesRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FrequenciesRequest {
    pub texts: Vec<String>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_remove_stopwords")]
    pub remove_stopwords: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub texts1: Vec<String>,
    pub texts2: Vec<String>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_BAR_CHART_TOP_N
}

fn default_remove_stopwords() -> bool {
    true
}
