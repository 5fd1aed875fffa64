//! CSV upload and download
//!
//! Upload replaces the session dataset wholesale; the previous dataset stays
//! in place when the new file fails validation. Download streams the rows
//! passing the current filters with the canonical column schema.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{info, warn};

use crate::server::api::{no_dataset_response, parse_selection, validation_error, FilterQuery};
use crate::server::AppState;
use crate::services::{analytics, csv_export, csv_loader, Dataset};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub rows: usize,
    pub brands: usize,
    /// Rows discarded during cleaning (bad date or close price)
    pub dropped_rows: usize,
}

/// POST /upload - replace the session dataset with an uploaded CSV
pub async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(filename) = field.file_name().map(|n| n.to_string()) else {
            continue;
        };
        match field.bytes().await {
            Ok(bytes) => {
                upload = Some((filename, bytes.to_vec()));
                break;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read uploaded file");
                return validation_error("Failed to read uploaded file");
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return validation_error("No file provided");
    };

    info!(filename = %filename, size = bytes.len(), "Processing CSV upload");

    let raw = match csv_loader::ingest_bytes(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(filename = %filename, error = %e, "Rejected upload");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "success": false, "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let total = raw.len();
    let records = csv_loader::clean(raw);
    let dropped_rows = total - records.len();
    let brands = analytics::distinct_brand_count(&records);
    let rows = records.len();

    // Replace the previous session dataset wholesale
    let source = format!("upload:{}", filename);
    *state.dataset.write().await = Some(Dataset::new(records, source.clone()));

    info!(source = %source, rows, brands, dropped_rows, "Dataset replaced");

    (
        StatusCode::OK,
        Json(UploadResponse {
            success: true,
            source: Some(source),
            rows,
            brands,
            dropped_rows,
        }),
    )
        .into_response()
}

/// GET /download - the filtered rows as a CSV attachment
pub async fn download_handler(
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
    let bytes = match csv_export::to_csv_bytes(&filtered) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "CSV export failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to build CSV export" })),
            )
                .into_response();
        }
    };

    let filename = format!(
        "stock_filtered_{}_{}.csv",
        sanitize_component(&selection.month_label()),
        sanitize_component(&selection.industry_label())
    );

    info!(rows = filtered.len(), filename = %filename, "Serving filtered CSV");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Keep download filenames shell- and header-safe
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("all"), "all");
        assert_eq!(sanitize_component("10"), "10");
        assert_eq!(sanitize_component("Food & Beverage"), "Food___Beverage");
        assert_eq!(sanitize_component("a/b\\c"), "a_b_c");
    }
}
