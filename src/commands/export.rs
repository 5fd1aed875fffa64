use std::path::PathBuf;

use crate::models::FilterSelection;
use crate::services::{analytics, csv_export};

pub fn run(csv: Option<PathBuf>, month: Option<u32>, industry: Option<String>, output: PathBuf) {
    let selection = match FilterSelection::new(month, industry) {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let dataset = super::load_dataset(csv, false);
    let filtered = analytics::apply_filter(&dataset.records, &selection);

    if filtered.is_empty() {
        println!("⚠️  No rows match the current filters; writing an empty CSV.");
    }

    match csv_export::write_path(&filtered, &output) {
        Ok(rows) => {
            println!("✅ Wrote {} rows to {}", rows, output.display());
        }
        Err(e) => {
            eprintln!("❌ Export failed: {}", e);
            std::process::exit(1);
        }
    }
}
