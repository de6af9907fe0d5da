//! The charged (sensationalist) vocabulary.
//!
//! The vocabulary is stored as two plain-text files, one word per line:
//!
//! ```text
//! charged_dict/
//! ├── positive_words.txt
//! └── negative_words.txt
//! ```
//!
//! Both lists are merged into a single [`ChargedWordSet`] at startup. The set
//! is immutable afterwards and shared read-only (behind an `Arc`) by every
//! pipeline task, so no locking is involved.

use crate::words::WordNormalizer;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// File names of the vocabulary lists inside the dictionary directory.
pub const CHARGED_WORD_FILES: [&str; 2] = ["positive_words.txt", "negative_words.txt"];

/// Immutable set of lowercase canonical charged word forms.
#[derive(Debug, Clone, Default)]
pub struct ChargedWordSet {
    words: HashSet<String>,
}

impl ChargedWordSet {
    /// Build a set from already-canonical words. Words are trimmed and
    /// lowercased; blank entries are ignored.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load and merge the positive and negative lists from `dir`.
    ///
    /// Both files are read concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or unreadable.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let dir = dir.as_ref();
        let contents = try_join_all(
            CHARGED_WORD_FILES
                .iter()
                .map(|name| fs::read_to_string(dir.join(name))),
        )
        .await?;

        let set = Self::from_words(contents.iter().flat_map(|text| text.lines()));
        info!(count = set.len(), "Loaded charged vocabulary");
        Ok(set)
    }

    /// Re-key the set by `normalizer`'s canonical forms, so it matches the
    /// words the pipeline produces for an article. Entries the normalizer
    /// filters out are dropped.
    pub fn canonicalized(&self, normalizer: &dyn WordNormalizer) -> Self {
        let words = self
            .words
            .iter()
            .filter_map(|word| normalizer.canonical_form(word))
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
