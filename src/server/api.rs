//! Chart data endpoints
//!
//! Every endpoint re-runs the pipeline from Filter onward against the
//! read-only session dataset. Invalid filter values answer 400 with a
//! validation message; a missing dataset answers 404, which is distinct from
//! a 200 whose filtered window happens to be empty.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_ANIMATION_BRANDS, DEFAULT_TOP_K, MAX_TOP_K};
use crate::error::AppError;
use crate::models::{FilterSelection, RankDirection, RankedBrands};
use crate::server::AppState;
use crate::services::analytics::{
    self, DatasetSummary, FluctuationPoint, HqLocation, MonthlyChange,
};

/// Common month/industry filter parameters ("all" or a concrete value)
#[derive(Debug, Clone, Deserialize)]
pub struct FilterQuery {
    pub month: Option<String>,
    pub industry: Option<String>,
}

/// Ranking parameters on top of the common filters
#[derive(Debug, Deserialize)]
pub struct RankingsQuery {
    pub month: Option<String>,
    pub industry: Option<String>,
    /// Number of companies to return (default 5, capped at 100)
    pub k: Option<usize>,
    /// "top" (default) or "bottom"
    pub direction: Option<String>,
}

/// Map parameters on top of the common filters
#[derive(Debug, Deserialize)]
pub struct LocationsQuery {
    pub month: Option<String>,
    pub industry: Option<String>,
    pub k: Option<usize>,
}

/// Animated-chart parameters on top of the common filters
#[derive(Debug, Deserialize)]
pub struct FluctuationsQuery {
    pub month: Option<String>,
    pub industry: Option<String>,
    /// Brands to include (can be repeated); defaults to the top brands by
    /// mean close over the filtered window
    #[serde(default)]
    pub brand: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// How many default brands to pick when none are given
    pub limit_brands: Option<usize>,
}

/// Envelope shared by the chart endpoints
#[derive(Debug, Serialize)]
pub struct ChartResponse<T> {
    pub month: String,
    pub industry: String,
    pub rows_analyzed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub data: T,
}

impl<T> ChartResponse<T> {
    fn new(selection: &FilterSelection, rows_analyzed: usize, data: T) -> Self {
        Self {
            month: selection.month_label(),
            industry: selection.industry_label(),
            rows_analyzed,
            warning: (rows_analyzed == 0)
                .then(|| "No rows match the current filters".to_string()),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub dataset_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub rows: usize,
    pub brands: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub months: Vec<u32>,
    pub industries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub k: usize,
    #[serde(flatten)]
    pub ranked: RankedBrands,
}

/// GET /health - liveness plus dataset status
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let guard = state.dataset.read().await;
    let response = match guard.as_ref() {
        Some(dataset) => HealthResponse {
            status: "ok".to_string(),
            dataset_loaded: true,
            source: Some(dataset.source.clone()),
            rows: dataset.row_count(),
            brands: dataset.brand_count(),
            loaded_at: Some(dataset.loaded_at.to_rfc3339()),
            uptime_secs: state.started_at.elapsed().as_secs(),
        },
        None => HealthResponse {
            status: "ok".to_string(),
            dataset_loaded: false,
            source: None,
            rows: 0,
            brands: 0,
            loaded_at: None,
            uptime_secs: state.started_at.elapsed().as_secs(),
        },
    };
    Json(response)
}

/// GET /filters - dropdown options for the month and industry selectors
pub async fn filters_handler(State(state): State<AppState>) -> Response {
    let guard = state.dataset.read().await;
    let Some(dataset) = guard.as_ref() else {
        return no_dataset_response();
    };

    Json(FilterOptions {
        months: dataset.months(),
        industries: dataset.industries(),
    })
    .into_response()
}

/// GET /summary - headline metrics for the filtered window
pub async fn summary_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Response {
    let selection = match parse_selection(&params.month, &params.industry) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    let guard = state.dataset.read().await;
    let Some(dataset) = guard.as_ref() else {
        return no_dataset_response();
    };

    let filtered = analytics::apply_filter(&dataset.records, &selection);
    let summary: DatasetSummary = analytics::summarize(&filtered);
    Json(ChartResponse::new(&selection, filtered.len(), summary)).into_response()
}

/// GET /monthly - mean open-to-close change per calendar month
pub async fn monthly_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Response {
    let selection = match parse_selection(&params.month, &params.industry) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    let guard = state.dataset.read().await;
    let Some(dataset) = guard.as_ref() else {
        return no_dataset_response();
    };

    let filtered = analytics::apply_filter(&dataset.records, &selection);
    let variation: Vec<MonthlyChange> = analytics::monthly_variation(&filtered);
    Json(ChartResponse::new(&selection, filtered.len(), variation)).into_response()
}

/// GET /rankings - top/bottom-K companies by mean close
pub async fn rankings_handler(
    State(state): State<AppState>,
    Query(params): Query<RankingsQuery>,
) -> Response {
    let selection = match parse_selection(&params.month, &params.industry) {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    let k = match validate_k(params.k) {
        Ok(k) => k,
        Err(response) => return response,
    };
    let direction = match params.direction.as_deref() {
        None => RankDirection::Top,
        Some(value) => match RankDirection::parse(value) {
            Some(direction) => direction,
            None => {
                return validation_error(&format!(
                    "Invalid direction: '{}' (expected 'top' or 'bottom')",
                    value
                ))
            }
        },
    };

    let guard = state.dataset.read().await;
    let Some(dataset) = guard.as_ref() else {
        return no_dataset_response();
    };

    let filtered = analytics::apply_filter(&dataset.records, &selection);
    let ranked = match analytics::rank_companies(&filtered, k, direction) {
        Ok(ranked) => ranked,
        Err(e) => return validation_error(&e.to_string()),
    };

    Json(ChartResponse::new(
        &selection,
        filtered.len(),
        RankingsResponse { k, ranked },
    ))
    .into_response()
}

/// GET /locations - headquarters of the top-K companies for the map
pub async fn locations_handler(
    State(state): State<AppState>,
    Query(params): Query<LocationsQuery>,
) -> Response {
    let selection = match parse_selection(&params.month, &params.industry) {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    let k = match validate_k(params.k) {
        Ok(k) => k,
        Err(response) => return response,
    };

    let guard = state.dataset.read().await;
    let Some(dataset) = guard.as_ref() else {
        return no_dataset_response();
    };

    let filtered = analytics::apply_filter(&dataset.records, &selection);
    let locations: Vec<HqLocation> = match analytics::rank_companies(&filtered, k, RankDirection::Top)
    {
        Ok(ranked) => analytics::locate_headquarters(&ranked, &filtered),
        Err(e) => return validation_error(&e.to_string()),
    };

    Json(ChartResponse::new(&selection, filtered.len(), locations)).into_response()
}

/// GET /fluctuations - date-ordered close series per brand for the animated
/// chart; the presentation layer replays each series frame by frame
pub async fn fluctuations_handler(
    State(state): State<AppState>,
    axum_extra::extract::Query(params): axum_extra::extract::Query<FluctuationsQuery>,
) -> Response {
    let selection = match parse_selection(&params.month, &params.industry) {
        Ok(selection) => selection,
        Err(response) => return response,
    };
    let start_date = match parse_query_date("start_date", params.start_date.as_deref()) {
        Ok(date) => date,
        Err(response) => return response,
    };
    let end_date = match parse_query_date("end_date", params.end_date.as_deref()) {
        Ok(date) => date,
        Err(response) => return response,
    };

    let guard = state.dataset.read().await;
    let Some(dataset) = guard.as_ref() else {
        return no_dataset_response();
    };

    let filtered = analytics::apply_filter(&dataset.records, &selection);
    let brands = if params.brand.is_empty() {
        let limit = params
            .limit_brands
            .unwrap_or(DEFAULT_ANIMATION_BRANDS)
            .clamp(1, MAX_TOP_K);
        analytics::top_brand_names(&filtered, limit)
    } else {
        params.brand.clone()
    };

    let series: BTreeMap<String, Vec<FluctuationPoint>> =
        analytics::daily_fluctuations(&filtered, &brands, start_date, end_date);
    Json(ChartResponse::new(&selection, filtered.len(), series)).into_response()
}

/// Parse the shared month/industry parameters into a validated selection
pub(super) fn parse_selection(
    month: &Option<String>,
    industry: &Option<String>,
) -> Result<FilterSelection, Response> {
    FilterSelection::parse(month.as_deref(), industry.as_deref())
        .map_err(|e| validation_error(&e.to_string()))
}

/// Validate the ranking size: positive, defaulted, capped
fn validate_k(k: Option<usize>) -> Result<usize, Response> {
    match k {
        None => Ok(DEFAULT_TOP_K),
        Some(0) => Err(validation_error("k must be a positive integer")),
        Some(k) => Ok(k.min(MAX_TOP_K)),
    }
}

fn parse_query_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, Response> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                validation_error(&format!("Invalid {}: '{}' (expected YYYY-MM-DD)", name, raw))
            }),
    }
}

/// 400 with a JSON validation message
pub(super) fn validation_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// 404 for the "no data loaded" state
pub(super) fn no_dataset_response() -> Response {
    let err = AppError::NotFound("no dataset loaded, upload a CSV via POST /upload".to_string());
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}
