//! Source-specific HTML sanitizers.
//!
//! A sanitizer reduces the raw HTML of one news site to the plain text of the
//! article. Every site lays its articles out differently, so sanitizers are
//! registered by source key in a [`SanitizerRegistry`] and the pipeline looks
//! one up by the key it was configured with.
//!
//! # Supported Sources
//!
//! | Key | Module | Template |
//! |-----|--------|----------|
//! | `inosmi_ru` | [`inosmi_ru`] | exactly one `<article>` element |
//!
//! # Failure
//!
//! A sanitizer fails with [`SanitizeError::ArticleNotFound`] when the page
//! does not match its template (a different site, a 404 page, an index page).
//! The pipeline does not look inside that failure: every [`SanitizeError`]
//! becomes a parsing error for the URL.

pub mod inosmi_ru;

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Why a page could not be reduced to article text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("article not found on page")]
    ArticleNotFound,
    #[error("no sanitizer registered for source `{0}`")]
    UnknownSource(String),
}

type SanitizeFn = Box<dyn Fn(&str) -> Result<String, SanitizeError> + Send + Sync>;

/// Sanitizers keyed by source identifier.
///
/// Built once at startup and shared read-only across all pipeline tasks.
pub struct SanitizerRegistry {
    sanitizers: HashMap<String, SanitizeFn>,
}

impl SanitizerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            sanitizers: HashMap::new(),
        }
    }

    /// A registry holding every sanitizer that ships with the crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(inosmi_ru::SOURCE_KEY, inosmi_ru::sanitize);
        registry
    }

    /// Register (or replace) the sanitizer for `source_key`.
    pub fn register<F>(&mut self, source_key: impl Into<String>, sanitizer: F)
    where
        F: Fn(&str) -> Result<String, SanitizeError> + Send + Sync + 'static,
    {
        self.sanitizers.insert(source_key.into(), Box::new(sanitizer));
    }

    pub fn contains(&self, source_key: &str) -> bool {
        self.sanitizers.contains_key(source_key)
    }

    /// Reduce `html` to plain text with the sanitizer registered for
    /// `source_key`.
    ///
    /// # Errors
    ///
    /// - [`SanitizeError::UnknownSource`] if nothing is registered for the key
    /// - whatever the sanitizer itself reports, usually
    ///   [`SanitizeError::ArticleNotFound`]
    pub fn sanitize(&self, source_key: &str, html: &str) -> Result<String, SanitizeError> {
        let sanitizer = self
            .sanitizers
            .get(source_key)
            .ok_or_else(|| SanitizeError::UnknownSource(source_key.to_string()))?;
        sanitizer(html)
    }
}

impl Default for SanitizerRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for SanitizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.sanitizers.keys().collect();
        keys.sort();
        f.debug_struct("SanitizerRegistry")
            .field("sources", &keys)
            .finish()
    }
}
