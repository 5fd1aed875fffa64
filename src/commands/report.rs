use std::path::PathBuf;

use crate::models::{FilterSelection, RankDirection};
use crate::services::analytics;
use crate::utils::format_number;

pub fn run(csv: Option<PathBuf>, month: Option<u32>, industry: Option<String>, k: usize) {
    println!("📊 Stockboard Report\n");

    let selection = match FilterSelection::new(month, industry) {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let dataset = super::load_dataset(csv, false);
    let filtered = analytics::apply_filter(&dataset.records, &selection);

    println!(
        "\n🔎 Filters: month={} industry={}",
        selection.month_label(),
        selection.industry_label()
    );

    if filtered.is_empty() {
        println!("\n⚠️  No rows match the current filters. Try a different month or industry.");
        return;
    }

    match report(&filtered, k) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn report(filtered: &[crate::models::StockRecord], k: usize) -> crate::error::Result<()> {
    let summary = analytics::summarize(filtered);

    println!("\n═══════════════════════════════════════════════════════════\n");
    println!("🔹 Summary");
    println!("   Rows:         {:>12}", format_number(summary.rows as u64));
    println!("   Companies:    {:>12}", format_number(summary.companies as u64));
    println!("   Mean close:   {:>12.2}", summary.mean_close);
    println!("   Total volume: {:>12}", format_number(summary.total_volume));
    match summary.trend_percent {
        Some(trend) => println!("   Trend:        {:>+11.2}%", trend),
        None => println!("   Trend:                 N/A"),
    }

    println!("\n═══════════════════════════════════════════════════════════\n");
    println!("🔹 Monthly price variation (mean close - open)");
    for entry in analytics::monthly_variation(filtered) {
        println!(
            "   Month {:>2}: {:>+10.4}  ({} rows)",
            entry.month,
            entry.mean_change,
            format_number(entry.rows as u64)
        );
    }

    let top = analytics::rank_companies(filtered, k, RankDirection::Top)?;
    let bottom = analytics::rank_companies(filtered, k, RankDirection::Bottom)?;

    println!("\n═══════════════════════════════════════════════════════════\n");
    println!("🏆 Top {} companies by mean close", top.len());
    for brand in &top.brands {
        println!("   {:>2}. {:<24} {:>10.2}", brand.rank, brand.brand_name, brand.mean_close);
    }

    println!("\n📉 Bottom {} companies by mean close", bottom.len());
    for brand in &bottom.brands {
        println!("   {:>2}. {:<24} {:>10.2}", brand.rank, brand.brand_name, brand.mean_close);
    }

    println!("\n═══════════════════════════════════════════════════════════\n");
    println!("🌐 Headquarters of top companies");
    let locations = analytics::locate_headquarters(&top, filtered);
    if locations.is_empty() {
        println!("   (no coordinates in this dataset)");
    }
    for location in locations {
        println!(
            "   {:<24} {:>9.4}, {:>9.4}",
            location.brand_name, location.latitude, location.longitude
        );
    }

    Ok(())
}
