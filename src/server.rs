use axum::{
    extract::{rejection::JsonRejection, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::analysis::charts::{
    BarChart, Histogram, TagCloud, DEFAULT_HISTOGRAM_BINS, DEFAULT_TAG_CLOUD_TOP_N,
};
use crate::analysis::{compare, WordFrequencies};
use crate::auth::ApiKeys;
use crate::config::constants::{MAX_BATCH_CELLS, MAX_TEXTS_PER_REQUEST, MAX_TEXT_LENGTH};
use crate::config::ServiceConfig;
use crate::error::{FintextError, Result};
use crate::logging::middleware::{access_log_middleware, request_id_middleware};
use crate::models::{
    BatchCleanRequest, BatchCleanResponse, CleanRequest, CleanResponse, CompareRequest,
    CompareResponse, EntitiesRequest, EntitiesResponse, FrequenciesRequest, FrequenciesResponse,
    HealthResponse, PreprocessRequest, PreprocessResponse, WordCount,
};
use crate::rate_limit::{rate_limit_middleware, RateLimiterMode};
use crate::text_processing::entities::extract_entities;
use crate::text_processing::preprocessing::preprocess_tokens;
use crate::text_processing::FinancialTextCleaner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cleaner: FinancialTextCleaner,
    pub api_keys: ApiKeys,
    pub rate_limiter: Option<RateLimiterMode>,
    /// Zero disables the timeout layer
    pub request_timeout: Duration,
    pub slow_request_threshold: Duration,
}

impl AppState {
    pub fn new(config: &ServiceConfig, api_keys: ApiKeys) -> Self {
        let rate_limiter = RateLimiterMode::select(
            config.rate_limit,
            &config.authenticated_limits,
            &config.unauthenticated_limits,
            api_keys.is_enabled(),
        );

        Self {
            cleaner: FinancialTextCleaner::new(config.rewriter),
            api_keys,
            rate_limiter,
            request_timeout: config.request_timeout,
            slow_request_threshold: Duration::from_secs(5),
        }
    }
}

/// Unwrap a JSON body, turning axum's rejection into our error shape
fn json_body<T: DeserializeOwned>(
    payload: std::result::Result<Json<T>, JsonRejection>,
) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| FintextError::InvalidRequest(rejection.body_text()))
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(FintextError::EmptyText);
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(FintextError::TextTooLong(len));
    }
    Ok(())
}

fn validate_texts(texts: &[String]) -> Result<()> {
    if texts.len() > MAX_TEXTS_PER_REQUEST {
        return Err(FintextError::InvalidRequest(format!(
            "Too many texts: {} (max {})",
            texts.len(),
            MAX_TEXTS_PER_REQUEST
        )));
    }
    if let Some(len) = texts
        .iter()
        .map(|t| t.chars().count())
        .find(|&len| len > MAX_TEXT_LENGTH)
    {
        return Err(FintextError::TextTooLong(len));
    }
    Ok(())
}

async fn clean_text(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CleanRequest>, JsonRejection>,
) -> Result<Json<CleanResponse>> {
    let req = json_body(payload)?;
    validate_text(&req.text)?;

    let cleaned = state.cleaner.clean(&req.text);
    tracing::debug!(input_len = req.text.len(), output_len = cleaned.len(), "Text cleaned");

    Ok(Json(CleanResponse { cleaned }))
}

async fn clean_batch(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchCleanRequest>, JsonRejection>,
) -> Result<Json<BatchCleanResponse>> {
    let req = json_body(payload)?;

    if req.columns.is_empty() {
        return Err(FintextError::InvalidRequest(
            "At least one column name is required".to_string(),
        ));
    }
    let cells = req.table.cell_count();
    if cells > MAX_BATCH_CELLS {
        return Err(FintextError::BatchTooLarge(cells));
    }

    tracing::info!(cells, columns = ?req.columns, "Cleaning batch");

    let cleaner = state.cleaner;
    let table =
        tokio::task::spawn_blocking(move || cleaner.clean_columns(req.table, &req.columns))
            .await?;

    Ok(Json(BatchCleanResponse { table }))
}

async fn preprocess_text(
    payload: std::result::Result<Json<PreprocessRequest>, JsonRejection>,
) -> Result<Json<PreprocessResponse>> {
    let req = json_body(payload)?;
    validate_text(&req.text)?;

    let tokens = preprocess_tokens(&req.text, &req.options);
    let text = tokens.join(" ");

    Ok(Json(PreprocessResponse { tokens, text }))
}

async fn entities(
    payload: std::result::Result<Json<EntitiesRequest>, JsonRejection>,
) -> Result<Json<EntitiesResponse>> {
    let req = json_body(payload)?;
    validate_text(&req.text)?;

    Ok(Json(EntitiesResponse {
        entities: extract_entities(&req.text),
    }))
}

async fn frequencies(
    payload: std::result::Result<Json<FrequenciesRequest>, JsonRejection>,
) -> Result<Json<FrequenciesResponse>> {
    let req = json_body(payload)?;
    validate_texts(&req.texts)?;

    let response = tokio::task::spawn_blocking(move || {
        let freq = WordFrequencies::from_texts(&req.texts, req.remove_stopwords);
        let words = freq
            .most_common(req.top_n)
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect();

        FrequenciesResponse {
            words,
            bar_chart: BarChart::from_frequencies(&freq, req.top_n, "Top Words Frequency"),
            tag_cloud: TagCloud::from_frequencies(&freq, DEFAULT_TAG_CLOUD_TOP_N),
            histogram: Histogram::of_token_counts(&req.texts, DEFAULT_HISTOGRAM_BINS),
        }
    })
    .await?;

    Ok(Json(response))
}

async fn compare_texts(
    payload: std::result::Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>> {
    let req = json_body(payload)?;
    validate_texts(&req.texts1)?;
    validate_texts(&req.texts2)?;

    let rows =
        tokio::task::spawn_blocking(move || compare(&req.texts1, &req.texts2, req.top_n)).await?;

    Ok(Json(CompareResponse { rows }))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn create_router(state: AppState) -> Router<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api = Router::new()
        .route("/clean", post(clean_text))
        .route("/clean/batch", post(clean_batch))
        .route("/preprocess", post(preprocess_text))
        .route("/entities", post(entities))
        .route("/frequencies", post(frequencies))
        .route("/compare", post(compare_texts))
        .layer(middleware::from_fn_with_state(
            state.api_keys.clone(),
            crate::auth::auth_middleware,
        ));

    // Rate limiting runs before authentication
    if let Some(limiter) = state.rate_limiter.clone() {
        api = api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .with_state(state.clone());

    if !state.request_timeout.is_zero() {
        router = router.layer(TimeoutLayer::new(state.request_timeout));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.slow_request_threshold,
            access_log_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}
