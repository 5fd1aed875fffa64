pub mod analytics;
pub mod csv_export;
pub mod csv_loader;
mod dataset;
pub mod sample_data;

pub use dataset::{shared_dataset, Dataset, SharedDataset};
