//! Filtering and aggregation for the dashboard charts
//!
//! Pure, stateless transforms over a cleaned [`RecordSet`]: every chart
//! interaction re-runs the relevant function against the read-only records.
//! An empty input or an empty filter result yields empty sequences, never an
//! error.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::{AppError, Result};
use crate::models::{BrandAggregate, FilterSelection, RankDirection, RankedBrands, StockRecord};

/// Aggregate price change for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyChange {
    /// Calendar month (1-12)
    pub month: u32,
    /// Mean open-to-close change across all rows in the month
    pub mean_change: f64,
    /// Number of rows contributing to the mean
    pub rows: usize,
}

/// Headquarters position for one ranked brand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HqLocation {
    pub brand_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One frame of the animated daily-fluctuation chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluctuationPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Headline metrics for the filtered window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub companies: usize,
    pub mean_close: f64,
    pub total_volume: u64,
    /// Percent change between the first and last daily mean close,
    /// when at least two trading days are present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_percent: Option<f64>,
}

/// Apply the month/industry filters conjunctively.
///
/// An unfiltered selection returns the records unchanged; an empty result is
/// valid and distinct from "no data loaded" (the caller holds that state).
pub fn apply_filter(records: &[StockRecord], selection: &FilterSelection) -> Vec<StockRecord> {
    if selection.is_unfiltered() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}

/// Mean open-to-close change per calendar month, ascending by month.
///
/// The metric is the mean of (close - open) over every row in the month, so a
/// positive value means the month's trading days gained intraday on average.
pub fn monthly_variation(records: &[StockRecord]) -> Vec<MonthlyChange> {
    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = buckets.entry(record.month).or_insert((0.0, 0));
        entry.0 += record.daily_change();
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(month, (sum, rows))| MonthlyChange {
            month,
            mean_change: sum / rows as f64,
            rows,
        })
        .collect()
}

/// Rank brands by mean closing price.
///
/// Ties are broken by ascending brand name so the ordering is deterministic.
/// Returns at most `k` entries; fewer when fewer distinct brands exist.
pub fn rank_companies(
    records: &[StockRecord],
    k: usize,
    direction: RankDirection,
) -> Result<RankedBrands> {
    if k == 0 {
        return Err(AppError::Config(
            "Ranking size k must be a positive integer".to_string(),
        ));
    }

    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for record in records {
        let entry = sums.entry(record.brand_name.as_str()).or_insert((0.0, 0));
        entry.0 += record.close;
        entry.1 += 1;
    }

    let mut means: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(brand, (sum, count))| (brand.to_string(), sum / count as f64))
        .collect();

    means.sort_by(|a, b| {
        let by_mean = match direction {
            RankDirection::Top => b.1.partial_cmp(&a.1),
            RankDirection::Bottom => a.1.partial_cmp(&b.1),
        }
        .unwrap_or(std::cmp::Ordering::Equal);
        by_mean.then_with(|| a.0.cmp(&b.0))
    });

    means.truncate(k);

    let brands = means
        .into_iter()
        .enumerate()
        .map(|(i, (brand_name, mean_close))| BrandAggregate {
            brand_name,
            mean_close,
            rank: i + 1,
        })
        .collect();

    Ok(RankedBrands { direction, brands })
}

/// Most recent known headquarters coordinates for each ranked brand.
///
/// Brands without coordinates anywhere in the records are omitted; the map
/// simply does not plot them.
pub fn locate_headquarters(ranked: &RankedBrands, records: &[StockRecord]) -> Vec<HqLocation> {
    ranked
        .brands
        .iter()
        .filter_map(|aggregate| {
            records
                .iter()
                .filter(|r| r.brand_name == aggregate.brand_name && r.has_coordinates())
                .max_by_key(|r| r.date)
                .map(|r| HqLocation {
                    brand_name: aggregate.brand_name.clone(),
                    latitude: r.latitude.unwrap_or_default(),
                    longitude: r.longitude.unwrap_or_default(),
                })
        })
        .collect()
}

/// Date-ordered close series per requested brand, restricted to an optional
/// date range. Brands with no matching rows map to an empty sequence.
pub fn daily_fluctuations(
    records: &[StockRecord],
    brands: &[String],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> BTreeMap<String, Vec<FluctuationPoint>> {
    let mut series = BTreeMap::new();
    for brand in brands {
        let mut points: Vec<FluctuationPoint> = records
            .iter()
            .filter(|r| &r.brand_name == brand)
            .filter(|r| start_date.map_or(true, |start| r.date >= start))
            .filter(|r| end_date.map_or(true, |end| r.date <= end))
            .map(|r| FluctuationPoint {
                date: r.date,
                close: r.close,
            })
            .collect();
        points.sort_by_key(|p| p.date);
        series.insert(brand.clone(), points);
    }
    series
}

/// Headline metrics for the filtered window
pub fn summarize(records: &[StockRecord]) -> DatasetSummary {
    if records.is_empty() {
        return DatasetSummary {
            rows: 0,
            companies: 0,
            mean_close: 0.0,
            total_volume: 0,
            trend_percent: None,
        };
    }

    let companies = distinct_brand_count(records);
    let close_sum: f64 = records.iter().map(|r| r.close).sum();
    let total_volume: u64 = records.iter().map(|r| r.volume).sum();

    DatasetSummary {
        rows: records.len(),
        companies,
        mean_close: close_sum / records.len() as f64,
        total_volume,
        trend_percent: trend_percent(records),
    }
}

/// Number of distinct brands in the records
pub fn distinct_brand_count(records: &[StockRecord]) -> usize {
    let mut brands: Vec<&str> = records.iter().map(|r| r.brand_name.as_str()).collect();
    brands.sort_unstable();
    brands.dedup();
    brands.len()
}

/// Names of the top `n` brands by mean close, used to pick default brands for
/// the animated chart
pub fn top_brand_names(records: &[StockRecord], n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    rank_companies(records, n, RankDirection::Top)
        .map(|ranked| ranked.brand_names())
        .unwrap_or_default()
}

/// Percent change between the first and last daily mean close
fn trend_percent(records: &[StockRecord]) -> Option<f64> {
    let mut daily: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = daily.entry(record.date).or_insert((0.0, 0));
        entry.0 += record.close;
        entry.1 += 1;
    }
    if daily.len() < 2 {
        return None;
    }

    let means: Vec<f64> = daily.values().map(|(sum, n)| sum / *n as f64).collect();
    let first = means.first()?;
    let last = means.last()?;
    if *first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn record(brand: &str, date: &str, open: f64, close: f64) -> StockRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        StockRecord {
            date,
            month: date.month(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1_000,
            dividends: 0.0,
            stock_splits: 0.0,
            brand_name: brand.to_string(),
            ticker: brand.chars().take(4).collect::<String>().to_uppercase(),
            industry_tag: "Technology".to_string(),
            country: "USA".to_string(),
            latitude: None,
            longitude: None,
        }
    }

    fn three_brand_records() -> Vec<StockRecord> {
        // A: mean close 100, B: mean close 50, C: mean close 75
        vec![
            record("A", "2024-06-03", 99.0, 98.0),
            record("A", "2024-06-04", 100.0, 102.0),
            record("B", "2024-06-03", 49.0, 48.0),
            record("B", "2024-06-04", 50.0, 52.0),
            record("C", "2024-06-03", 74.0, 73.0),
            record("C", "2024-06-04", 75.0, 77.0),
        ]
    }

    #[test]
    fn test_unfiltered_selection_is_identity() {
        let records = three_brand_records();
        let filtered = apply_filter(&records, &FilterSelection::all());
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let mut records = three_brand_records();
        records.push({
            let mut r = record("D", "2024-07-01", 10.0, 11.0);
            r.industry_tag = "Energy".to_string();
            r
        });

        let sel = FilterSelection::new(Some(7), Some("Energy".to_string())).unwrap();
        let filtered = apply_filter(&records, &sel);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].brand_name, "D");

        // Month matches but industry does not
        let sel = FilterSelection::new(Some(7), Some("Technology".to_string())).unwrap();
        assert!(apply_filter(&records, &sel).is_empty());
    }

    #[test]
    fn test_empty_filter_result_flows_to_empty_aggregates() {
        let records = three_brand_records();
        let sel = FilterSelection::new(Some(6), Some("Tech".to_string())).unwrap();
        let filtered = apply_filter(&records, &sel);
        assert!(filtered.is_empty());

        assert!(monthly_variation(&filtered).is_empty());
        let ranked = rank_companies(&filtered, 5, RankDirection::Top).unwrap();
        assert!(ranked.is_empty());
        assert!(locate_headquarters(&ranked, &filtered).is_empty());
        assert_eq!(summarize(&filtered).rows, 0);
    }

    #[test]
    fn test_rank_top_and_bottom_scenario() {
        let records = three_brand_records();

        let top = rank_companies(&records, 2, RankDirection::Top).unwrap();
        assert_eq!(top.brand_names(), vec!["A", "C"]);
        assert_eq!(top.brands[0].mean_close, 100.0);
        assert_eq!(top.brands[0].rank, 1);
        assert_eq!(top.brands[1].rank, 2);

        let bottom = rank_companies(&records, 2, RankDirection::Bottom).unwrap();
        assert_eq!(bottom.brand_names(), vec!["B", "C"]);
    }

    #[test]
    fn test_rank_len_is_min_of_k_and_brand_count() {
        let records = three_brand_records();
        for k in 1..=6 {
            let ranked = rank_companies(&records, k, RankDirection::Top).unwrap();
            assert_eq!(ranked.len(), k.min(3));
        }
    }

    #[test]
    fn test_rank_is_idempotent() {
        let records = three_brand_records();
        let first = rank_companies(&records, 3, RankDirection::Top).unwrap();
        let second = rank_companies(&records, 3, RankDirection::Top).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_tie_break_is_alphabetical() {
        let records = vec![
            record("Zeta", "2024-06-03", 10.0, 50.0),
            record("Alpha", "2024-06-03", 10.0, 50.0),
            record("Mid", "2024-06-03", 10.0, 50.0),
        ];
        let ranked = rank_companies(&records, 3, RankDirection::Top).unwrap();
        assert_eq!(ranked.brand_names(), vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_top_and_bottom_disjoint_with_enough_brands() {
        let mut records = Vec::new();
        for (i, brand) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            records.push(record(brand, "2024-06-03", 10.0, 10.0 * (i + 1) as f64));
        }
        let top = rank_companies(&records, 3, RankDirection::Top).unwrap();
        let bottom = rank_companies(&records, 3, RankDirection::Bottom).unwrap();
        for name in top.brand_names() {
            assert!(!bottom.brand_names().contains(&name));
        }
    }

    #[test]
    fn test_zero_k_is_config_error() {
        let records = three_brand_records();
        assert!(matches!(
            rank_companies(&records, 0, RankDirection::Top),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_monthly_variation_sorted_without_duplicates() {
        let records = vec![
            record("A", "2024-11-01", 100.0, 104.0),
            record("A", "2024-03-01", 50.0, 52.0),
            record("A", "2024-03-02", 52.0, 50.0),
            record("B", "2024-07-15", 10.0, 13.0),
        ];
        let variation = monthly_variation(&records);
        let months: Vec<u32> = variation.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![3, 7, 11]);

        // March: (+2 - 2) / 2 rows = 0
        assert_eq!(variation[0].mean_change, 0.0);
        assert_eq!(variation[0].rows, 2);
        assert_eq!(variation[1].mean_change, 3.0);
        assert_eq!(variation[2].mean_change, 4.0);
    }

    #[test]
    fn test_locate_headquarters_uses_most_recent_coordinates() {
        let mut early = record("A", "2024-06-03", 10.0, 10.0);
        early.latitude = Some(1.0);
        early.longitude = Some(1.0);
        let mut late = record("A", "2024-06-10", 10.0, 10.0);
        late.latitude = Some(2.0);
        late.longitude = Some(2.0);
        // B never reports coordinates
        let no_coords = record("B", "2024-06-03", 5.0, 5.0);

        let records = vec![early, late, no_coords];
        let ranked = rank_companies(&records, 2, RankDirection::Top).unwrap();
        let locations = locate_headquarters(&ranked, &records);

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].brand_name, "A");
        assert_eq!(locations[0].latitude, 2.0);
        assert_eq!(locations[0].longitude, 2.0);
    }

    #[test]
    fn test_daily_fluctuations_ordered_and_range_restricted() {
        let records = vec![
            record("A", "2024-06-05", 10.0, 12.0),
            record("A", "2024-06-03", 10.0, 11.0),
            record("A", "2024-06-10", 10.0, 13.0),
            record("B", "2024-06-04", 5.0, 6.0),
        ];
        let brands = vec!["A".to_string(), "Missing".to_string()];
        let start = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();

        let series = daily_fluctuations(&records, &brands, Some(start), Some(end));
        assert_eq!(series.len(), 2);
        let a = &series["A"];
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].close, 12.0);
        assert!(series["Missing"].is_empty());

        let unbounded = daily_fluctuations(&records, &brands, None, None);
        let dates: Vec<NaiveDate> = unbounded["A"].iter().map(|p| p.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_summarize_metrics() {
        let records = vec![
            record("A", "2024-06-03", 10.0, 100.0),
            record("B", "2024-06-03", 10.0, 100.0),
            record("A", "2024-06-04", 10.0, 110.0),
            record("B", "2024-06-04", 10.0, 110.0),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.companies, 2);
        assert_eq!(summary.mean_close, 105.0);
        assert_eq!(summary.total_volume, 4_000);
        // Daily mean close moves 100 -> 110
        assert_eq!(summary.trend_percent, Some(10.0));

        let single_day = vec![record("A", "2024-06-03", 10.0, 100.0)];
        assert_eq!(summarize(&single_day).trend_percent, None);
    }

    #[test]
    fn test_top_brand_names_for_animation_defaults() {
        let records = three_brand_records();
        assert_eq!(top_brand_names(&records, 2), vec!["A", "C"]);
        assert!(top_brand_names(&records, 0).is_empty());
        assert_eq!(top_brand_names(&records, 10).len(), 3);
    }
}
