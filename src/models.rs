//! Data models for analyzed articles.
//!
//! This module defines the records produced by the article pipeline:
//! - [`ProcessingStatus`]: Terminal outcome of one URL's pipeline
//! - [`ArticleResult`]: Per-URL record returned to clients
//!
//! The JSON field names (`URL`, `http_status`) match the wire format clients
//! already consume, hence the explicit `#[serde(rename)]` attributes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Terminal outcome of processing a single URL.
///
/// Exactly one status is assigned per URL and it is never revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    /// The article was fetched, recognized, normalized and scored.
    Ok,
    /// The server answered with a non-success status or the request failed.
    FetchError,
    /// The page did not match the article template of the sanitizer.
    ParsingError,
    /// Either the fetch or the normalization exceeded its budget.
    Timeout,
}

impl ProcessingStatus {
    /// The wire representation, e.g. `"FETCH_ERROR"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Ok => "OK",
            ProcessingStatus::FetchError => "FETCH_ERROR",
            ProcessingStatus::ParsingError => "PARSING_ERROR",
            ProcessingStatus::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The analysis record for one URL.
///
/// `score` and `words_count` are present if and only if the status is
/// [`ProcessingStatus::Ok`]. The fields are private so that the only way to
/// build a record is through [`ArticleResult::ok`] or
/// [`ArticleResult::failed`], which keep that invariant. Deserialization
/// goes through the same check and rejects inconsistent records.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawArticleResult")]
pub struct ArticleResult {
    /// The URL exactly as the client sent it.
    #[serde(rename = "URL")]
    url: String,
    /// Terminal status of the pipeline.
    #[serde(rename = "http_status")]
    status: ProcessingStatus,
    /// Jaundice rate in `[0, 100]`, two decimal places.
    score: Option<f64>,
    /// Number of normalized words the score was computed over.
    words_count: Option<usize>,
}

/// A record whose score fields disagree with its status.
#[derive(Debug, Error, PartialEq)]
#[error("`score` and `words_count` must be set exactly when `http_status` is OK (got {status})")]
pub struct InconsistentResult {
    status: ProcessingStatus,
}

/// Wire shape of [`ArticleResult`] before the invariant is checked.
#[derive(Deserialize)]
struct RawArticleResult {
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "http_status")]
    status: ProcessingStatus,
    score: Option<f64>,
    words_count: Option<usize>,
}

impl TryFrom<RawArticleResult> for ArticleResult {
    type Error = InconsistentResult;

    fn try_from(raw: RawArticleResult) -> Result<Self, Self::Error> {
        match (raw.status, raw.score, raw.words_count) {
            (ProcessingStatus::Ok, Some(score), Some(words_count)) => {
                Ok(Self::ok(raw.url, score, words_count))
            }
            (status, None, None) if status != ProcessingStatus::Ok => {
                Ok(Self::failed(raw.url, status))
            }
            (status, _, _) => Err(InconsistentResult { status }),
        }
    }
}

impl ArticleResult {
    /// A successfully scored article.
    pub fn ok(url: impl Into<String>, score: f64, words_count: usize) -> Self {
        Self {
            url: url.into(),
            status: ProcessingStatus::Ok,
            score: Some(score),
            words_count: Some(words_count),
        }
    }

    /// A classified failure. Passing [`ProcessingStatus::Ok`] here is a
    /// programming error: debug builds panic, release builds downgrade it to
    /// `PARSING_ERROR` since there is no score to report.
    pub fn failed(url: impl Into<String>, status: ProcessingStatus) -> Self {
        debug_assert_ne!(status, ProcessingStatus::Ok, "failed() called with OK status");
        let status = match status {
            ProcessingStatus::Ok => ProcessingStatus::ParsingError,
            other => other,
        };
        Self {
            url: url.into(),
            status,
            score: None,
            words_count: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn words_count(&self) -> Option<usize> {
        self.words_count
    }
}
