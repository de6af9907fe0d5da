//! Batch orchestration.
//!
//! A batch is the list of URLs from one client request. After the size check
//! every URL gets its own task running the [`ArticlePipeline`]; the batch
//! returns only once every task has reached a terminal status, timed-out ones
//! included. One URL's failure never cancels or alters its siblings.
//!
//! Each task writes into its own result slot (indexed by the URL's position),
//! and the slots are merged after the join, so no lock guards the results.

use crate::models::{ArticleResult, ProcessingStatus};
use crate::pipeline::ArticlePipeline;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

/// Why a whole batch was refused before any work started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchRejected {
    #[error("no urls in request")]
    Empty,
    #[error("too many urls in request, should be {max} or less")]
    TooMany { max: usize, got: usize },
}

/// Runs one pipeline per URL and gathers the results.
#[derive(Clone)]
pub struct BatchOrchestrator {
    pipeline: ArticlePipeline,
    max_urls: usize,
}

impl BatchOrchestrator {
    /// # Arguments
    ///
    /// * `pipeline` - Pipeline cloned into every task
    /// * `max_urls` - Largest accepted batch
    pub fn new(pipeline: ArticlePipeline, max_urls: usize) -> Self {
        Self { pipeline, max_urls }
    }

    pub fn max_urls(&self) -> usize {
        self.max_urls
    }

    /// Check the batch size without doing any work.
    pub fn validate(&self, urls: &[String]) -> Result<(), BatchRejected> {
        match urls.len() {
            0 => Err(BatchRejected::Empty),
            got if got > self.max_urls => Err(BatchRejected::TooMany {
                max: self.max_urls,
                got,
            }),
            _ => Ok(()),
        }
    }

    /// Analyze every URL concurrently.
    ///
    /// # Returns
    ///
    /// One [`ArticleResult`] per input URL, in input order, or
    /// [`BatchRejected`] if the batch is empty or too large. A rejected
    /// batch starts no pipelines.
    #[instrument(level = "info", skip_all, fields(urls = urls.len()))]
    pub async fn run_batch(&self, urls: Vec<String>) -> Result<Vec<ArticleResult>, BatchRejected> {
        if let Err(rejected) = self.validate(&urls) {
            warn!(error = %rejected, "Rejected batch");
            return Err(rejected);
        }

        let mut tasks = JoinSet::new();
        for (index, url) in urls.iter().cloned().enumerate() {
            let pipeline = self.pipeline.clone();
            tasks.spawn(async move {
                let result = AssertUnwindSafe(pipeline.process(&url))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        error!(%url, "Article pipeline panicked");
                        ArticleResult::failed(&url, ProcessingStatus::ParsingError)
                    });
                (index, result)
            });
        }

        let mut slots: Vec<Option<ArticleResult>> = vec![None; urls.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => error!(error = %e, "Article task did not finish"),
            }
        }

        let results: Vec<ArticleResult> = slots
            .into_iter()
            .zip(&urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| ArticleResult::failed(url, ProcessingStatus::ParsingError))
            })
            .collect();

        let ok = results
            .iter()
            .filter(|r| r.status() == ProcessingStatus::Ok)
            .count();
        info!(total = results.len(), ok, failed = results.len() - ok, "Batch complete");
        Ok(results)
    }
}
