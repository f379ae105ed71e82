use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;

use sift_page::Batch;
use sift_page::config::ScrapeConfig;
use sift_page::fetch::HttpFetcher;
use sift_page::results::PageRecord;
use sift_page::sources;
use sift_page::store::ResultStore;
use sift_page::utils::sanitize_filename;

mod args;
use args::{Args, apply_overrides};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments and fold them into the configuration
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => match ScrapeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {:?}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => ScrapeConfig::default(),
    };
    apply_overrides(&args, &mut config);

    // A missing or unreadable keyword list is the one fatal input error
    let keywords = match sources::read_list(&config.keywords_path()) {
        Ok(keywords) => keywords,
        Err(e) => {
            ::log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if keywords.is_empty() {
        ::log::warn!(
            "Keyword list {:?} is empty, no page will match",
            config.keywords_path()
        );
    }

    let store = match ResultStore::open(&config.output_dir) {
        Ok(store) => store,
        Err(e) => {
            ::log::error!("Failed to open result store {}: {}", config.output_dir, e);
            return ExitCode::FAILURE;
        }
    };

    let categories = match &args.category {
        Some(category) => vec![category.clone()],
        None => config.categories.clone(),
    };

    // Stop launching new fetches on ctrl-c; completed work is kept
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ::log::warn!("Interrupt received, finishing in-flight pages only");
                shutdown.store(true, Ordering::Relaxed);
            }
        });
    }

    let start_time = std::time::Instant::now();
    ::log::info!("Starting scrape of {} categories", categories.len());

    let mut categories_failed = 0;
    for category in &categories {
        if let Err(e) = run_category(category, &keywords, &config, &store, &shutdown).await {
            ::log::error!("Category {} failed: {}", category, e);
            categories_failed += 1;
        }
    }

    ::log::info!(
        "Run complete - {} of {} categories succeeded in {:.2} seconds",
        categories.len() - categories_failed,
        categories.len(),
        start_time.elapsed().as_secs_f64()
    );

    // Per-URL failures never affect the exit code; a category that could
    // not be set up or persisted does
    if categories_failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Scrape one category's URL list and merge the results into its store file
async fn run_category(
    category: &str,
    keywords: &[String],
    config: &ScrapeConfig,
    store: &ResultStore,
    shutdown: &Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let urls = sources::read_list(&config.category_path(category))?;
    ::log::info!("Scraping {} URLs for category {}", urls.len(), category);

    let output = Batch::new(urls, keywords.to_vec())
        .with_config(config)
        .with_shutdown(Arc::clone(shutdown))
        .collect()
        .await?;

    if config.download_files {
        download_record_files(&output.records, category, config).await;
    }

    let total = store.merge(category, output.records)?;
    println!("{category}: {} ({} records stored)", output.summary, total);
    Ok(())
}

/// Mirror each record's discovered files under `<output_dir>/<category>/<title>/`
async fn download_record_files(records: &[PageRecord], category: &str, config: &ScrapeConfig) {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let fetcher = match HttpFetcher::new(timeout, &config.user_agent) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            ::log::error!("Skipping downloads, could not build client: {}", e);
            return;
        }
    };

    for record in records {
        if record.files.is_empty() {
            continue;
        }
        let dir = Path::new(&config.output_dir)
            .join(category)
            .join(sanitize_filename(&record.title));

        for file_url in &record.files {
            let name = file_url.rsplit('/').next().unwrap_or("download");
            let dest = dir.join(sanitize_filename(name));
            match fetcher.download(file_url, &dest).await {
                Ok(()) => ::log::info!("Downloaded {} to {:?}", file_url, dest),
                Err(e) => ::log::warn!("Failed to download {}: {}", file_url, e),
            }
        }
    }
}
