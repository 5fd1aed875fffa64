//! Filtered CSV export
//!
//! Writes records back out with the canonical input column schema, so a
//! downloaded file re-ingests to exactly the rows that were exported.

use std::path::Path;

use crate::constants::CANONICAL_COLUMNS;
use crate::error::Result;
use crate::models::StockRecord;

/// Serialize records to CSV bytes with the canonical header
pub fn to_csv_bytes(records: &[StockRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CANONICAL_COLUMNS)?;

    for record in records {
        writer.write_record(&[
            record.date.format("%Y-%m-%d").to_string(),
            record.open.to_string(),
            record.high.to_string(),
            record.low.to_string(),
            record.close.to_string(),
            record.volume.to_string(),
            record.dividends.to_string(),
            record.stock_splits.to_string(),
            record.brand_name.clone(),
            record.ticker.clone(),
            record.industry_tag.clone(),
            record.country.clone(),
            record.latitude.map_or(String::new(), |v| v.to_string()),
            record.longitude.map_or(String::new(), |v| v.to_string()),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::error::AppError::Io(format!("Failed to flush CSV: {}", e)))
}

/// Write records to a CSV file, returning the number of rows written
pub fn write_path(records: &[StockRecord], path: &Path) -> Result<usize> {
    let bytes = to_csv_bytes(records)?;
    std::fs::write(path, bytes)
        .map_err(|e| crate::error::AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterSelection;
    use crate::services::{analytics, csv_loader, sample_data};

    #[test]
    fn test_export_reingests_to_same_rows() {
        let records = sample_data::generate(4);
        let bytes = to_csv_bytes(&records).unwrap();
        let reloaded = csv_loader::load_bytes(&bytes).unwrap();
        assert_eq!(reloaded, records);
    }

    #[test]
    fn test_filtered_export_round_trip() {
        let records = sample_data::generate(4);
        let sel = FilterSelection::new(Some(10), Some("Retail".to_string())).unwrap();
        let filtered = analytics::apply_filter(&records, &sel);
        assert!(!filtered.is_empty());

        let bytes = to_csv_bytes(&filtered).unwrap();
        let reloaded = csv_loader::load_bytes(&bytes).unwrap();
        assert_eq!(reloaded, filtered);
    }

    #[test]
    fn test_missing_coordinates_export_as_empty_cells() {
        let mut records = sample_data::generate(1);
        records[0].latitude = None;
        records[0].longitude = None;

        let bytes = to_csv_bytes(&records[..1]).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",,"));

        let reloaded = csv_loader::load_bytes(&bytes).unwrap();
        assert!(!reloaded[0].has_coordinates());
    }

    #[test]
    fn test_write_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered.csv");
        let records = sample_data::generate(2);

        let written = write_path(&records, &path).unwrap();
        assert_eq!(written, records.len());

        let reloaded = csv_loader::load_path(&path).unwrap();
        assert_eq!(reloaded.len(), records.len());
    }
}
