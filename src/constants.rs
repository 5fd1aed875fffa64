//! CSV Schema Constants
//!
//! Defines the canonical column set for world stock price CSV files and the
//! defaults used by the rankings and the HTTP server.

/// Canonical column order for exported CSV files.
///
/// Uploads are accepted with a few well-known aliases (lat/lon, "Stock Splits")
/// and case variants; exports always use this exact header.
pub const CANONICAL_COLUMNS: &[&str] = &[
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock_Splits",
    "Brand_Name",
    "Ticker",
    "Industry_Tag",
    "Country",
    "Latitude",
    "Longitude",
];

/// Columns that must be present in an uploaded CSV header.
/// Missing any of these is a parse error; everything else degrades gracefully.
pub const REQUIRED_COLUMNS: &[&str] = &["Date", "Close", "Brand_Name"];

/// Default number of companies in a top/bottom ranking
pub const DEFAULT_TOP_K: usize = 5;

/// Upper bound on the ranking size accepted from clients
pub const MAX_TOP_K: usize = 100;

/// Default number of brands in the animated fluctuation chart
pub const DEFAULT_ANIMATION_BRANDS: usize = 5;

/// Default HTTP port when neither --port nor STOCKBOARD_PORT is set
pub const DEFAULT_PORT: u16 = 8686;

/// Maximum accepted upload size (50MB)
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Number of days covered by the generated sample dataset
pub const DEFAULT_SAMPLE_DAYS: u32 = 31;
