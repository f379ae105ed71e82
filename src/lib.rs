// Re-export modules
pub mod config;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod results;
pub mod scrape;
pub mod sources;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use results::{PageRecord, RunSummary};
pub use scrape::BatchOutput;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use thiserror::Error;

use crate::extract::Extractor;
use crate::fetch::{FetchError, HttpFetcher};
use crate::filter::{FileLinkConfig, FileLinkFilter};

/// Failure to assemble a batch before any URL is attempted
#[derive(Debug, Error)]
pub enum BatchError {
    /// A configured downloadable extension produced an invalid pattern
    #[error("invalid downloadable-extension pattern: {0}")]
    Filter(#[from] regex::Error),

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Fetcher(#[from] FetchError),
}

/// Builder for one category's fetch, extract, and collect pass
pub struct Batch {
    urls: Vec<String>,
    keywords: Vec<String>,
    max_concurrency: usize,
    request_timeout: Duration,
    file_extensions: Vec<String>,
    user_agent: String,
    shutdown: Arc<AtomicBool>,
}

impl Batch {
    /// Create a new batch over `urls`, matching against `keywords`
    pub fn new(urls: Vec<String>, keywords: Vec<String>) -> Self {
        Self {
            urls,
            keywords,
            max_concurrency: 10, // Default concurrency
            request_timeout: Duration::from_secs(30),
            file_extensions: filter::default_extensions(),
            user_agent: config::default_user_agent(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the maximum number of concurrent page requests
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the path extensions recognized as downloadable files
    pub fn with_file_extensions(mut self, extensions: Vec<String>) -> Self {
        self.file_extensions = extensions;
        self
    }

    /// Set the User-Agent header sent with every request
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Share a flag that, once set, stops fetches that have not yet started
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Apply the run-level settings from a configuration
    pub fn with_config(self, config: &config::ScrapeConfig) -> Self {
        self.with_max_concurrency(config.max_concurrency)
            .with_request_timeout(Duration::from_secs(config.request_timeout_secs))
            .with_file_extensions(config.file_extensions.clone())
            .with_user_agent(config.user_agent.clone())
    }

    /// Run the batch to completion.
    ///
    /// Individual URL failures are absorbed into the summary; this only
    /// fails if the batch cannot be assembled at all.
    pub async fn collect(self) -> Result<BatchOutput, BatchError> {
        let link_filter = FileLinkFilter::new(&FileLinkConfig {
            extensions: self.file_extensions,
        })?;
        let extractor = Arc::new(Extractor::new(&self.keywords, link_filter));
        let fetcher = Arc::new(HttpFetcher::new(self.request_timeout, &self.user_agent)?);

        Ok(scrape::run(
            fetcher,
            extractor,
            self.urls,
            self.max_concurrency,
            self.shutdown,
        )
        .await)
    }
}
