//! Per-URL article pipeline.
//!
//! Each URL goes through four stages in strict order:
//!
//! ```text
//! START ─fetch─▶ FETCHED ─sanitize─▶ SANITIZED ─normalize─▶ NORMALIZED ─score─▶ OK
//!   │               │                    │
//!   ├ FETCH_ERROR   └ PARSING_ERROR      └ TIMEOUT (over budget)
//!   └ TIMEOUT
//! ```
//!
//! The first failing stage decides the terminal status and the remaining
//! stages are skipped. [`ArticlePipeline::process`] never fails: every
//! failure is folded into the returned [`ArticleResult`].
//!
//! # Normalization budget
//!
//! Normalization is CPU-bound and cannot be interrupted, so it runs on the
//! blocking pool and its wall time is measured afterwards. A result that took
//! longer than the budget is discarded and the URL reports `TIMEOUT`, even
//! though the words were computed.

use crate::charged::ChargedWordSet;
use crate::fetcher::{FetchError, Fetcher};
use crate::models::{ArticleResult, ProcessingStatus};
use crate::sanitizers::{SanitizeError, SanitizerRegistry};
use crate::scoring::calculate_jaundice_rate;
use crate::words::WordNormalizer;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

/// The stage that stopped a pipeline, with its cause.
#[derive(Debug, Error)]
enum StageFailure {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("sanitize failed: {0}")]
    Sanitize(#[from] SanitizeError),
    #[error("normalization took {elapsed:?}, budget is {budget:?}")]
    NormalizeOverBudget { elapsed: Duration, budget: Duration },
    #[error("normalization task aborted: {0}")]
    NormalizeAborted(#[from] JoinError),
}

impl StageFailure {
    fn status(&self) -> ProcessingStatus {
        match self {
            StageFailure::Fetch(FetchError::Timeout(_)) => ProcessingStatus::Timeout,
            StageFailure::Fetch(_) => ProcessingStatus::FetchError,
            StageFailure::Sanitize(_) => ProcessingStatus::ParsingError,
            StageFailure::NormalizeOverBudget { .. } => ProcessingStatus::Timeout,
            StageFailure::NormalizeAborted(_) => ProcessingStatus::ParsingError,
        }
    }
}

/// Shared, read-only dependencies of every pipeline run.
///
/// Cloning is cheap: all heavy state sits behind `Arc`s and the fetcher
/// shares its connection pool.
#[derive(Clone)]
pub struct ArticlePipeline {
    fetcher: Fetcher,
    sanitizers: Arc<SanitizerRegistry>,
    source_key: Arc<str>,
    normalizer: Arc<dyn WordNormalizer>,
    charged: Arc<ChargedWordSet>,
    normalize_budget: Duration,
}

impl ArticlePipeline {
    /// Assemble a pipeline.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Downloads pages within the fetch budget
    /// * `sanitizers` - Registry the page's sanitizer is looked up in
    /// * `source_key` - Registry key of the sanitizer to use
    /// * `normalizer` - Word normalizer, shared across tasks
    /// * `charged` - Charged vocabulary, shared across tasks
    /// * `normalize_budget` - Wall-time budget for normalization
    pub fn new(
        fetcher: Fetcher,
        sanitizers: Arc<SanitizerRegistry>,
        source_key: impl Into<Arc<str>>,
        normalizer: Arc<dyn WordNormalizer>,
        charged: Arc<ChargedWordSet>,
        normalize_budget: Duration,
    ) -> Self {
        Self {
            fetcher,
            sanitizers,
            source_key: source_key.into(),
            normalizer,
            charged,
            normalize_budget,
        }
    }

    /// Run every stage for `url` and classify the outcome.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn process(&self, url: &str) -> ArticleResult {
        let t0 = Instant::now();
        let result = match self.run(url).await {
            Ok((score, words_count)) => ArticleResult::ok(url, score, words_count),
            Err(failure) => {
                warn!(status = %failure.status(), error = %failure, "Article pipeline stopped");
                ArticleResult::failed(url, failure.status())
            }
        };
        info!(
            status = %result.status(),
            score = ?result.score(),
            words_count = ?result.words_count(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Processed article"
        );
        result
    }

    async fn run(&self, url: &str) -> Result<(f64, usize), StageFailure> {
        let html = self.fetcher.fetch(url).await?;

        let text = self.sanitizers.sanitize(&self.source_key, &html)?;
        debug!(chars = text.chars().count(), "Sanitized article");

        let words = self.normalize(text).await?;
        let score = calculate_jaundice_rate(&words, &self.charged);
        Ok((score, words.len()))
    }

    async fn normalize(&self, text: String) -> Result<Vec<String>, StageFailure> {
        let normalizer = Arc::clone(&self.normalizer);
        let t0 = Instant::now();
        let words =
            tokio::task::spawn_blocking(move || normalizer.normalize(&text).collect::<Vec<_>>())
                .await?;
        let elapsed = t0.elapsed();

        debug!(words = words.len(), elapsed_ms = elapsed.as_millis(), "Normalized article");
        if elapsed > self.normalize_budget {
            return Err(StageFailure::NormalizeOverBudget {
                elapsed,
                budget: self.normalize_budget,
            });
        }
        Ok(words)
    }
}
