//! CSV ingest and cleaning
//!
//! Turns raw world-stock-price CSV bytes into a cleaned [`RecordSet`].
//! The header is validated up front: missing any required column is a parse
//! error. Individual rows that fail date or close-price parsing are dropped
//! and reported, never fatal. Same input bytes always produce the same rows
//! in the same order.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::constants::REQUIRED_COLUMNS;
use crate::error::{AppError, Result};
use crate::models::{RecordSet, StockRecord};

/// One undecoded CSV row. All fields arrive as text; numeric and date
/// conversion happens in [`clean`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date", alias = "date", alias = "datetime", alias = "Day", default)]
    pub date: String,

    #[serde(rename = "Open", alias = "open", default)]
    pub open: String,

    #[serde(rename = "High", alias = "high", default)]
    pub high: String,

    #[serde(rename = "Low", alias = "low", default)]
    pub low: String,

    #[serde(rename = "Close", alias = "close", default)]
    pub close: String,

    #[serde(rename = "Volume", alias = "volume", default)]
    pub volume: String,

    #[serde(rename = "Dividends", alias = "dividends", default)]
    pub dividends: String,

    #[serde(rename = "Stock_Splits", alias = "Stock Splits", alias = "stock_splits", default)]
    pub stock_splits: String,

    #[serde(rename = "Brand_Name", alias = "brand_name", default)]
    pub brand_name: String,

    #[serde(rename = "Ticker", alias = "ticker", default)]
    pub ticker: String,

    #[serde(rename = "Industry_Tag", alias = "industry_tag", default)]
    pub industry_tag: String,

    #[serde(rename = "Country", alias = "country", default)]
    pub country: String,

    #[serde(rename = "Latitude", alias = "latitude", alias = "lat", default)]
    pub latitude: String,

    #[serde(rename = "Longitude", alias = "longitude", alias = "lon", alias = "lng", default)]
    pub longitude: String,
}

/// Parse CSV bytes into raw rows, validating the header first
pub fn ingest_bytes(bytes: &[u8]) -> Result<Vec<RawRow>> {
    ingest_reader(bytes)
}

/// Parse a CSV file into raw rows, validating the header first
pub fn ingest_path(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path)
        .map_err(|e| AppError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    ingest_reader(file)
}

/// Convenience: ingest and clean in one step
pub fn load_bytes(bytes: &[u8]) -> Result<RecordSet> {
    Ok(clean(ingest_bytes(bytes)?))
}

/// Convenience: ingest and clean a CSV file in one step
pub fn load_path(path: &Path) -> Result<RecordSet> {
    Ok(clean(ingest_path(path)?))
}

fn ingest_reader<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Parse(format!("Failed to read CSV header: {}", e)))?
        .clone();

    validate_required_columns(&headers)?;

    let mut rows = Vec::new();
    let mut unreadable = 0;
    for (line, result) in reader.deserialize::<RawRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                unreadable += 1;
                tracing::warn!(line = line + 2, error = %e, "Skipping unreadable CSV row");
            }
        }
    }

    if unreadable > 0 {
        tracing::warn!(skipped = unreadable, read = rows.len(), "CSV contained unreadable rows");
    }

    Ok(rows)
}

/// Check that every required column is present in the header, accepting the
/// same aliases the row decoder accepts.
fn validate_required_columns(headers: &csv::StringRecord) -> Result<()> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut missing = Vec::new();
    for required in REQUIRED_COLUMNS {
        let aliases: &[&str] = match *required {
            "Date" => &["date", "datetime", "day"],
            "Close" => &["close"],
            "Brand_Name" => &["brand_name"],
            other => unreachable!("unknown required column {}", other),
        };
        if !aliases.iter().any(|a| normalized.iter().any(|h| h == a)) {
            missing.push(*required);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Parse(format!(
            "CSV is missing required columns: {}",
            missing.join(", ")
        )))
    }
}

/// Convert raw rows to stock records, dropping rows whose date fails to parse
/// or whose close price is non-numeric or missing.
pub fn clean(rows: Vec<RawRow>) -> RecordSet {
    let total = rows.len();
    let mut records = Vec::with_capacity(total);

    for row in rows {
        let Some(date) = parse_record_date(&row.date) else {
            tracing::warn!(date = %row.date, brand = %row.brand_name, "Dropping row with unparseable date");
            continue;
        };
        let Some(close) = parse_finite(&row.close) else {
            tracing::warn!(close = %row.close, brand = %row.brand_name, "Dropping row with invalid close price");
            continue;
        };

        records.push(StockRecord {
            date,
            month: date.month(),
            open: parse_finite(&row.open).unwrap_or(0.0),
            high: parse_finite(&row.high).unwrap_or(0.0),
            low: parse_finite(&row.low).unwrap_or(0.0),
            close,
            volume: parse_finite(&row.volume).unwrap_or(0.0).max(0.0) as u64,
            dividends: parse_finite(&row.dividends).unwrap_or(0.0),
            stock_splits: parse_finite(&row.stock_splits).unwrap_or(0.0),
            brand_name: row.brand_name,
            ticker: row.ticker,
            industry_tag: row.industry_tag,
            country: row.country,
            latitude: parse_finite(&row.latitude),
            longitude: parse_finite(&row.longitude),
        });
    }

    let dropped = total - records.len();
    if dropped > 0 {
        tracing::warn!(dropped, kept = records.len(), "Dropped rows during cleaning");
    }

    records
}

/// Parse a date cell. Accepts plain dates, naive datetimes, and
/// timezone-suffixed datetimes as produced by common market-data exports.
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    // Timezone-aware exports, e.g. "2024-05-24 00:00:00-04:00"
    for fmt in ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.date_naive());
        }
    }

    None
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Date,Open,High,Low,Close,Volume,Dividends,Stock_Splits,Brand_Name,Ticker,Industry_Tag,Country,Latitude,Longitude
2024-10-01,100.0,105.0,99.0,104.0,1000,0.0,0.0,Apple Inc.,AAPL,Technology,USA,37.3318,-122.0296
2024-10-02,104.0,106.0,101.0,102.0,1500,0.0,0.0,Apple Inc.,AAPL,Technology,USA,37.3318,-122.0296
";

    #[test]
    fn test_load_valid_csv() {
        let records = load_bytes(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].brand_name, "Apple Inc.");
        assert_eq!(records[0].month, 10);
        assert_eq!(records[0].close, 104.0);
        assert_eq!(records[0].latitude, Some(37.3318));
    }

    #[test]
    fn test_missing_required_column_is_parse_error() {
        let csv = "Open,High,Low,Volume\n1,2,3,4\n";
        let err = ingest_bytes(csv.as_bytes()).unwrap_err();
        match err {
            AppError::Parse(msg) => {
                assert!(msg.contains("Date"));
                assert!(msg.contains("Close"));
                assert!(msg.contains("Brand_Name"));
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_date_row_is_dropped() {
        let csv = "\
Date,Close,Brand_Name
2024-10-01,100.0,Apple Inc.
2024-13-40,100.0,Apple Inc.
2024-10-03,101.0,Apple Inc.
";
        let rows = ingest_bytes(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        let records = clean(rows);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_invalid_close_row_is_dropped() {
        let csv = "\
Date,Close,Brand_Name
2024-10-01,100.0,Apple Inc.
2024-10-02,,Apple Inc.
2024-10-03,n/a,Apple Inc.
";
        let records = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_header_aliases_accepted() {
        let csv = "\
date,close,Brand_Name,lat,lon,Stock Splits
2024-10-01,100.0,Apple Inc.,37.33,-122.03,0.0
";
        let records = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].has_coordinates());
    }

    #[test]
    fn test_missing_optional_columns_degrade() {
        let csv = "\
Date,Close,Brand_Name
2024-10-01,100.0,Apple Inc.
";
        let records = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].open, 0.0);
        assert_eq!(records[0].volume, 0);
        assert!(!records[0].has_coordinates());
    }

    #[test]
    fn test_parse_record_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 24).unwrap();
        assert_eq!(parse_record_date("2024-05-24"), Some(expected));
        assert_eq!(parse_record_date("2024-05-24 00:00:00"), Some(expected));
        assert_eq!(parse_record_date("2024-05-24 00:00:00-04:00"), Some(expected));
        assert_eq!(parse_record_date("2024-05-24T10:30:00"), Some(expected));
        assert_eq!(parse_record_date(""), None);
        assert_eq!(parse_record_date("yesterday"), None);
    }

    #[test]
    fn test_clean_is_deterministic() {
        let a = load_bytes(SAMPLE_CSV.as_bytes()).unwrap();
        let b = load_bytes(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(a, b);
    }
}
