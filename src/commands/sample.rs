use std::path::PathBuf;

use crate::services::{csv_export, sample_data};

pub fn run(output: PathBuf, days: u32) {
    if days == 0 {
        eprintln!("❌ days must be at least 1");
        std::process::exit(1);
    }

    let records = sample_data::generate(days);
    match csv_export::write_path(&records, &output) {
        Ok(rows) => {
            println!("✅ Wrote {} sample rows ({} days) to {}", rows, days, output.display());
        }
        Err(e) => {
            eprintln!("❌ Failed to write sample data: {}", e);
            std::process::exit(1);
        }
    }
}
