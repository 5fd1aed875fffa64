use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned row of daily stock price data
///
/// Records only exist in cleaned form: the date has already parsed to a valid
/// calendar date and the closing price is a real number. Rows that fail either
/// requirement are dropped during cleaning, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Trading day
    pub date: NaiveDate,

    /// Calendar month of the trading day (1-12), derived from `date`
    pub month: u32,

    /// Opening price
    pub open: f64,

    /// Highest price of the day
    pub high: f64,

    /// Lowest price of the day
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume (number of shares)
    pub volume: u64,

    /// Dividends paid on this day
    pub dividends: f64,

    /// Stock split factor applied on this day
    pub stock_splits: f64,

    /// Company display name, e.g. "Apple Inc."
    pub brand_name: String,

    /// Ticker symbol, e.g. "AAPL"
    pub ticker: String,

    /// Industry category, e.g. "Technology"
    pub industry_tag: String,

    /// Country of the listing
    pub country: String,

    /// Headquarters latitude, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Headquarters longitude, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl StockRecord {
    /// True when both headquarters coordinates are present
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Daily open-to-close price change
    pub fn daily_change(&self) -> f64 {
        self.close - self.open
    }
}
