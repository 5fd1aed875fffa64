//! Built-in sample dataset
//!
//! Generates a small, realistic world-stock-prices table for sessions that
//! start without an uploaded CSV. The generator is seeded so every run
//! produces the same rows.

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::DEFAULT_SAMPLE_DAYS;
use crate::models::{RecordSet, StockRecord};

const SAMPLE_SEED: u64 = 20241001;

/// First trading day of the generated window
const SAMPLE_START: (i32, u32, u32) = (2024, 10, 1);

/// (brand, ticker, industry, country, latitude, longitude)
const SAMPLE_COMPANIES: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("Apple Inc.", "AAPL", "Technology", "USA", 37.3318, -122.0296),
    ("Microsoft Corp.", "MSFT", "Technology", "USA", 47.6062, -122.3321),
    ("Amazon.com Inc.", "AMZN", "Retail", "USA", 47.6062, -122.3321),
    ("Alphabet Inc.", "GOOGL", "Technology", "USA", 37.4220, -122.0841),
    ("Tesla Inc.", "TSLA", "Automotive", "USA", 37.3947, -122.1498),
    ("NVIDIA Corp.", "NVDA", "Technology", "USA", 37.3708, -121.9959),
    ("Meta Platforms", "META", "Technology", "USA", 37.4850, -122.1473),
    ("JPMorgan Chase", "JPM", "Finance", "USA", 40.7128, -74.0060),
    ("Johnson & Johnson", "JNJ", "Healthcare", "USA", 40.4968, -74.4444),
    ("Walmart Inc.", "WMT", "Retail", "USA", 36.3729, -94.2088),
    ("ExxonMobil", "XOM", "Energy", "USA", 32.8893, -97.0362),
    ("Pfizer Inc.", "PFE", "Healthcare", "USA", 40.7128, -74.0060),
    ("Chevron Corp.", "CVX", "Energy", "USA", 37.9265, -122.5270),
    ("Home Depot", "HD", "Retail", "USA", 33.7490, -84.3880),
    ("Mastercard Inc.", "MA", "Finance", "USA", 41.0382, -73.5413),
];

/// Generate the default sample dataset (one month of daily rows)
pub fn sample_dataset() -> RecordSet {
    generate(DEFAULT_SAMPLE_DAYS)
}

/// Generate `days` consecutive daily rows for each sample company
pub fn generate(days: u32) -> RecordSet {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let (year, month, day) = SAMPLE_START;
    let start = NaiveDate::from_ymd_opt(year, month, day).expect("valid sample start date");

    let mut records = Vec::with_capacity(SAMPLE_COMPANIES.len() * days as usize);
    for (brand, ticker, industry, country, lat, lon) in SAMPLE_COMPANIES {
        let base: f64 = rng.gen_range(50.0..800.0);
        for offset in 0..days {
            let date = start + Duration::days(offset as i64);
            let open = base * (1.0 + rng.gen_range(-0.02..0.02)) + rng.gen_range(-3.0..3.0);
            let close = open + base * rng.gen_range(-0.01..0.01);
            let high = open.max(close) + rng.gen_range(0.0..5.0);
            let low = (open.min(close) - rng.gen_range(0.0..5.0)).max(0.01);
            let volume = rng.gen_range(100_000..50_000_000u64);

            records.push(StockRecord {
                date,
                month: date.month(),
                open: round2(open),
                high: round2(high),
                low: round2(low),
                close: round2(close),
                volume,
                dividends: 0.0,
                stock_splits: 0.0,
                brand_name: brand.to_string(),
                ticker: ticker.to_string(),
                industry_tag: industry.to_string(),
                country: country.to_string(),
                latitude: Some(*lat),
                longitude: Some(*lon),
            });
        }
    }
    records
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
