use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::{DEFAULT_SAMPLE_DAYS, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(name = "stockboard")]
#[command(about = "Stock dashboard data backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dashboard data server
    Serve {
        /// Port to listen on (default: STOCKBOARD_PORT or 8686)
        #[arg(short, long)]
        port: Option<u16>,

        /// CSV file to load (default: STOCKBOARD_DATA_CSV or the sample data)
        #[arg(short, long)]
        csv: Option<PathBuf>,

        /// Use the built-in sample dataset even when a CSV is configured
        #[arg(long)]
        sample: bool,
    },
    /// Print summary, monthly variation and rankings for a dataset
    Report {
        /// CSV file to load (default: STOCKBOARD_DATA_CSV or the sample data)
        #[arg(short, long)]
        csv: Option<PathBuf>,

        /// Restrict to one calendar month (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Restrict to one industry tag
        #[arg(short, long)]
        industry: Option<String>,

        /// Ranking size for the top/bottom company lists
        #[arg(short = 'k', long = "top-k", default_value_t = DEFAULT_TOP_K)]
        k: usize,
    },
    /// Write the rows passing the filters to a CSV file
    Export {
        /// CSV file to load (default: STOCKBOARD_DATA_CSV or the sample data)
        #[arg(short, long)]
        csv: Option<PathBuf>,

        /// Restrict to one calendar month (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Restrict to one industry tag
        #[arg(short, long)]
        industry: Option<String>,

        /// Destination CSV path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write the built-in sample dataset to a CSV file
    Sample {
        /// Destination CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of consecutive days to generate
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_DAYS)]
        days: u32,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, csv, sample } => {
            commands::serve::run(port, csv, sample);
        }
        Commands::Report {
            csv,
            month,
            industry,
            k,
        } => {
            commands::report::run(csv, month, industry, k);
        }
        Commands::Export {
            csv,
            month,
            industry,
            output,
        } => {
            commands::export::run(csv, month, industry, output);
        }
        Commands::Sample { output, days } => {
            commands::sample::run(output, days);
        }
    }
}
