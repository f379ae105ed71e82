use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to fetch a page or file
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout, or protocol error
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// Local write failure while saving a downloaded file
    #[error("failed to save download: {0}")]
    Save(#[from] std::io::Error),
}

/// A fetched page body with the status it was served with
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: StatusCode,
    pub body: String,
}

/// Seam for issuing page requests, so the orchestrator can be driven by an
/// instrumented fetcher in tests
pub trait Fetch {
    /// Fetch a single URL and return the decoded body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// HTTP fetcher backed by a single client reused for the whole run
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with a bounded per-request timeout
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Download a single file to `dest`, creating parent directories
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;

        ::log::debug!("Saved {} bytes from {} to {:?}", bytes.len(), url, dest);
        Ok(())
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send {
        async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            let body = response.text().await?;
            Ok(FetchedPage { status, body })
        }
    }
}
