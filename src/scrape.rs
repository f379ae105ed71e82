use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Semaphore, mpsc};

use crate::extract::Extractor;
use crate::fetch::Fetch;
use crate::results::{PageRecord, RunSummary};

/// Collected output of one category batch
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Matched records, in input URL order
    pub records: Vec<PageRecord>,

    /// Counts for the whole batch
    pub summary: RunSummary,
}

/// What a single URL's task produced
enum Outcome {
    Matched(Box<PageRecord>),
    NoMatch,
    Failed,
    Skipped,
}

/// Fan out one fetch+extract task per URL, bounded by a semaphore, and
/// collect the indexed outcomes back into input order.
///
/// A failure on one URL never aborts the batch; the run completes when
/// every task has reported. Tasks that have not yet fetched when `shutdown`
/// is set finish as skipped.
pub async fn run<F>(
    fetcher: Arc<F>,
    extractor: Arc<Extractor>,
    urls: Vec<String>,
    max_concurrency: usize,
    shutdown: Arc<AtomicBool>,
) -> BatchOutput
where
    F: Fetch + Send + Sync + 'static,
{
    let attempted = urls.len();
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let (result_tx, mut result_rx) = mpsc::channel::<(usize, Outcome)>(attempted.max(1));

    for (index, url) in urls.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let extractor = Arc::clone(&extractor);
        let semaphore = Arc::clone(&semaphore);
        let shutdown = Arc::clone(&shutdown);
        let result_tx = result_tx.clone();

        tokio::spawn(async move {
            // Held for the whole fetch+extract, released on every exit path
            let _permit = semaphore.acquire().await.unwrap();

            let outcome = if shutdown.load(Ordering::Relaxed) {
                ::log::debug!("Shutdown requested, not fetching: {}", url);
                Outcome::Skipped
            } else {
                scrape_one(fetcher.as_ref(), &extractor, &url).await
            };

            if result_tx.send((index, outcome)).await.is_err() {
                ::log::error!("Result channel closed before task for {} reported", url);
            }
        });
    }

    // Drop the original sender so the channel closes once all tasks are done
    drop(result_tx);

    // Single collector owns the accumulating collection; tasks share nothing
    // mutable beyond the semaphore
    let mut summary = RunSummary {
        attempted,
        ..RunSummary::default()
    };
    let mut indexed: Vec<(usize, PageRecord)> = Vec::new();
    while let Some((index, outcome)) = result_rx.recv().await {
        match outcome {
            Outcome::Matched(record) => {
                summary.matched += 1;
                indexed.push((index, *record));
            }
            Outcome::NoMatch => summary.no_match += 1,
            Outcome::Failed => summary.failed += 1,
            Outcome::Skipped => summary.skipped += 1,
        }
    }

    // Report records in input order, not completion order
    indexed.sort_by_key(|(index, _)| *index);
    let records = indexed.into_iter().map(|(_, record)| record).collect();

    BatchOutput { records, summary }
}

/// Fetch and extract a single URL
async fn scrape_one<F: Fetch>(fetcher: &F, extractor: &Extractor, url: &str) -> Outcome {
    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => {
            ::log::warn!("Failed to fetch {}: {}", url, e);
            return Outcome::Failed;
        }
    };
    ::log::debug!("Fetched {} ({}, {} bytes)", url, page.status, page.body.len());

    match extractor.extract(url, &page.body) {
        Some(record) => {
            ::log::info!(
                "Matched {} ({} keywords, {} files)",
                url,
                record.keywords_matched.len(),
                record.files.len()
            );
            Outcome::Matched(Box::new(record))
        }
        None => {
            ::log::debug!("No keywords matched: {}", url);
            Outcome::NoMatch
        }
    }
}
