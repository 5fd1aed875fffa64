use std::path::PathBuf;

use crate::server;
use crate::services::shared_dataset;
use crate::utils::get_default_port;

pub fn run(port: Option<u16>, csv: Option<PathBuf>, use_sample: bool) {
    let port = port.unwrap_or_else(get_default_port);
    println!("🚀 Starting stockboard server on port {}", port);

    let dataset = super::load_dataset(csv, use_sample);
    println!("   📈 Companies: {}", dataset.brand_count());
    println!("   📅 Months:    {:?}", dataset.months());
    println!("   🏷️  Source:    {}", dataset.source);

    let shared = shared_dataset(Some(dataset));

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    if let Err(e) = rt.block_on(server::serve(shared, port)) {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
