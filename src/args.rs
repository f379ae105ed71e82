use clap::Parser;
use std::path::PathBuf;

use sift_page::config::ScrapeConfig;

#[derive(Parser, Debug)]
#[command(name = "sift-page")]
#[command(about = "Scraper that sifts keyword-matching pages into per-category JSON files")]
#[command(version)]
pub struct Args {
    /// Category to scrape (all configured categories when omitted)
    pub category: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of concurrent page requests
    #[arg(short = 'n', long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Directory the category JSON files are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Mirror discovered downloadable files to disk
    #[arg(long)]
    pub download: bool,
}

/// Fold command-line overrides into the loaded configuration
pub fn apply_overrides(args: &Args, config: &mut ScrapeConfig) {
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if args.download {
        config.download_files = true;
    }
}
