//! Session-scoped dataset store
//!
//! The cleaned record set for the current session, held read-only behind a
//! lock. `None` means "no data loaded" and is distinct from a dataset whose
//! filtered view happens to be empty. Uploading replaces the whole value;
//! nothing mutates records in place.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::RecordSet;
use crate::services::analytics;

/// Cleaned records plus provenance for the current session
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: RecordSet,
    /// Where the records came from: a file path, "upload", or "sample"
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(records: RecordSet, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn brand_count(&self) -> usize {
        analytics::distinct_brand_count(&self.records)
    }

    /// Distinct calendar months present, ascending
    pub fn months(&self) -> Vec<u32> {
        let months: BTreeSet<u32> = self.records.iter().map(|r| r.month).collect();
        months.into_iter().collect()
    }

    /// Distinct non-empty industry tags, ascending
    pub fn industries(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .records
            .iter()
            .filter(|r| !r.industry_tag.is_empty())
            .map(|r| r.industry_tag.clone())
            .collect();
        tags.into_iter().collect()
    }
}

/// Shared handle to the session dataset
pub type SharedDataset = Arc<RwLock<Option<Dataset>>>;

/// Wrap an initial dataset (or the no-data state) for sharing
pub fn shared_dataset(initial: Option<Dataset>) -> SharedDataset {
    Arc::new(RwLock::new(initial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sample_data;

    #[test]
    fn test_dataset_facets() {
        let dataset = Dataset::new(sample_data::generate(3), "sample");
        assert_eq!(dataset.row_count(), 45);
        assert_eq!(dataset.brand_count(), 15);
        assert_eq!(dataset.months(), vec![10]);
        assert!(dataset.industries().contains(&"Technology".to_string()));
    }

    #[test]
    fn test_empty_dataset_is_not_no_data() {
        let dataset = Dataset::new(Vec::new(), "upload");
        assert_eq!(dataset.row_count(), 0);
        assert!(dataset.months().is_empty());

        let shared = shared_dataset(Some(dataset));
        assert!(shared.try_read().unwrap().is_some());

        let unloaded = shared_dataset(None);
        assert!(unloaded.try_read().unwrap().is_none());
    }
}
