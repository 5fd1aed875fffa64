pub mod export;
pub mod report;
pub mod sample;
pub mod serve;

use std::path::PathBuf;

use crate::services::{csv_loader, sample_data, Dataset};
use crate::utils::get_default_csv_path;

/// Resolve and load the dataset for a command invocation.
///
/// Precedence: `--sample`, then the explicit `--csv` path, then
/// STOCKBOARD_DATA_CSV, then the built-in sample. A CSV that fails to parse
/// falls back to the sample dataset with a warning instead of aborting.
pub(crate) fn load_dataset(csv: Option<PathBuf>, use_sample: bool) -> Dataset {
    if use_sample {
        println!("📊 Using built-in sample dataset");
        return Dataset::new(sample_data::sample_dataset(), "sample");
    }

    let Some(path) = csv.or_else(get_default_csv_path) else {
        println!("📊 No CSV configured, using built-in sample dataset");
        return Dataset::new(sample_data::sample_dataset(), "sample");
    };

    match csv_loader::ingest_path(&path) {
        Ok(raw) => {
            let total = raw.len();
            let records = csv_loader::clean(raw);
            let dropped = total - records.len();
            println!("📁 Loaded {} rows from {}", records.len(), path.display());
            if dropped > 0 {
                println!("⚠️  Dropped {} rows with invalid dates or close prices", dropped);
            }
            Dataset::new(records, path.display().to_string())
        }
        Err(e) => {
            eprintln!("⚠️  Could not load {}: {}", path.display(), e);
            eprintln!("   Falling back to the built-in sample dataset.");
            Dataset::new(sample_data::sample_dataset(), "sample")
        }
    }
}
