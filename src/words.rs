//! Word normalization.
//!
//! Turns sanitized article text into the sequence of canonical word forms the
//! scorer counts over. The pipeline only depends on the [`WordNormalizer`]
//! trait; [`RussianNormalizer`] is the implementation the server ships with.
//!
//! # Rules
//!
//! 1. Split on whitespace
//! 2. Strip guillemets and ellipses anywhere, ASCII punctuation at both ends
//! 3. Lowercase, `ё` → `е`
//! 4. Replace with the dictionary lemma when one is known
//! 5. Keep forms longer than two characters, plus the negation particle
//! 6. Reduce to the Snowball stem, so every inflection of a word
//!    collapses to one form
//!
//! The charged vocabulary goes through the same [`WordNormalizer::canonical_form`]
//! (see [`ChargedWordSet::canonicalized`](crate::charged::ChargedWordSet::canonicalized)),
//! so `аварии` in an article matches `авария` in the vocabulary.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// The only short word that survives filtering: it flips the meaning of
/// whatever follows and must be counted.
pub const NEGATION_PARTICLE: &str = "не";

const MIN_WORD_CHARS: usize = 3;

/// Reduces raw text to canonical word forms.
///
/// Implementations are built once at startup and shared by every pipeline
/// task, so they must be safe for concurrent read-only use.
pub trait WordNormalizer: Send + Sync {
    /// Canonical form of a single raw token, or `None` if the token is
    /// punctuation or a filtered short word.
    fn canonical_form(&self, token: &str) -> Option<String>;

    /// Lazily yield the canonical forms of the words in `text`, with
    /// punctuation and short function words already filtered out.
    fn normalize<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(
            text.split_whitespace()
                .filter_map(move |token| self.canonical_form(token)),
        )
    }
}

/// Russian normalizer: Snowball stemming, with an optional `form → lemma`
/// dictionary consulted first for forms the stemmer handles badly
/// (suppletive verbs like `шёл` → `идти`).
pub struct RussianNormalizer {
    lemmas: HashMap<String, String>,
    stemmer: Stemmer,
}

impl fmt::Debug for RussianNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RussianNormalizer")
            .field("lemmas", &self.lemmas.len())
            .finish_non_exhaustive()
    }
}

impl Default for RussianNormalizer {
    fn default() -> Self {
        Self::with_lemmas(HashMap::new())
    }
}

impl RussianNormalizer {
    /// A normalizer without a lemma dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lemmas(lemmas: HashMap<String, String>) -> Self {
        Self {
            lemmas: lemmas
                .into_iter()
                .map(|(form, lemma)| (fold_case(&form), fold_case(&lemma)))
                .collect(),
            stemmer: Stemmer::create(Algorithm::Russian),
        }
    }

    /// Load a lemma dictionary with one `form lemma` pair per line,
    /// separated by a tab or spaces. Lines starting with `#` and lines that
    /// do not hold exactly two fields are skipped.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path.as_ref()).await?;
        let lemmas = parse_lemmas(&text);
        info!(count = lemmas.len(), "Loaded lemma dictionary");
        Ok(Self::with_lemmas(lemmas))
    }
}

impl WordNormalizer for RussianNormalizer {
    fn canonical_form(&self, token: &str) -> Option<String> {
        let cleaned = fold_case(&clean_word(token));
        if cleaned.is_empty() {
            return None;
        }
        let lemma = self.lemmas.get(&cleaned).cloned().unwrap_or(cleaned);
        if !keep_word(&lemma) {
            return None;
        }
        if lemma == NEGATION_PARTICLE {
            return Some(lemma);
        }
        Some(self.stemmer.stem(&lemma).into_owned())
    }
}

fn parse_lemmas(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(form), Some(lemma), None) => Some((fold_case(form), fold_case(lemma))),
                _ => None,
            }
        })
        .collect()
}

fn clean_word(word: &str) -> String {
    word.replace(['«', '»', '…'], "")
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_string()
}

fn fold_case(word: &str) -> String {
    word.to_lowercase().replace('ё', "е")
}

fn keep_word(word: &str) -> bool {
    word == NEGATION_PARTICLE || word.chars().count() >= MIN_WORD_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn russian_lemmas() -> RussianNormalizer {
        let lemmas = [("хочет", "хотеть"), ("стало", "стать"), ("шёл", "идти")]
            .into_iter()
            .map(|(f, l)| (f.to_string(), l.to_string()))
            .collect();
        RussianNormalizer::with_lemmas(lemmas)
    }

    fn words(normalizer: &impl WordNormalizer, text: &str) -> Vec<String> {
        normalizer.normalize(text).collect()
    }

    /// Canonical forms of words that are already clean dictionary entries.
    fn stems(words: &[&str]) -> Vec<String> {
        let stemmer = Stemmer::create(Algorithm::Russian);
        words.iter().map(|w| stemmer.stem(w).into_owned()).collect()
    }

    #[test]
    fn test_drops_short_words_and_punctuation() {
        assert_eq!(
            words(&russian_lemmas(), "Во-первых, он хочет, чтобы"),
            stems(&["во-первых", "хотеть", "чтобы"])
        );
    }

    #[test]
    fn test_strips_guillemets() {
        assert_eq!(
            words(&russian_lemmas(), "«Удивительно, но это стало началом!»"),
            stems(&["удивительно", "это", "стать", "началом"])
        );
    }

    #[test]
    fn test_keeps_negation_particle() {
        let normalizer = RussianNormalizer::new();
        let verbs = stems(&["пришел", "позвонил"]);
        assert_eq!(
            words(&normalizer, "Он не пришёл… и не позвонил"),
            vec![NEGATION_PARTICLE, verbs[0].as_str(), NEGATION_PARTICLE, verbs[1].as_str()]
        );
    }

    #[test]
    fn test_inflected_forms_share_canonical_form() {
        let normalizer = RussianNormalizer::new();
        for (inflected, dictionary) in [
            ("аварии", "авария"),
            ("Страшной", "страшный"),
            ("катастрофой", "катастрофа"),
            ("ужасные", "ужасный"),
        ] {
            assert_eq!(
                normalizer.canonical_form(inflected),
                normalizer.canonical_form(dictionary),
                "{inflected} vs {dictionary}"
            );
        }
    }

    #[test]
    fn test_lemma_dictionary_takes_precedence() {
        let normalizer = russian_lemmas();
        assert_eq!(normalizer.canonical_form("шёл"), normalizer.canonical_form("идти"));
        assert_ne!(
            RussianNormalizer::new().canonical_form("шёл"),
            normalizer.canonical_form("идти")
        );
    }

    #[test]
    fn test_yo_is_folded() {
        let normalizer = RussianNormalizer::new();
        assert_eq!(normalizer.canonical_form("ЁЖИК"), normalizer.canonical_form("ежик"));
    }

    #[test]
    fn test_empty_and_punctuation_only_text() {
        let normalizer = RussianNormalizer::new();
        assert!(words(&normalizer, "").is_empty());
        assert!(words(&normalizer, "... !!! «» …").is_empty());
    }

    #[test]
    fn test_parse_lemmas_skips_malformed_lines() {
        let lemmas = parse_lemmas("# comment\nСтало\tстать\nодно\nтри поля тут\n\nшёл  идти\n");
        assert_eq!(lemmas.len(), 2);
        assert_eq!(lemmas.get("стало").map(String::as_str), Some("стать"));
        assert_eq!(lemmas.get("шел").map(String::as_str), Some("идти"));
    }

    #[tokio::test]
    async fn test_load_lemma_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lemmas.txt");
        std::fs::write(&path, "хочет хотеть\n").unwrap();

        let normalizer = RussianNormalizer::load(&path).await.unwrap();
        assert_eq!(words(&normalizer, "Она хочет"), stems(&["она", "хотеть"]));
    }
}
