//! Fixtures shared by the pipeline, batch and server tests.

use crate::charged::ChargedWordSet;
use crate::fetcher::Fetcher;
use crate::pipeline::ArticlePipeline;
use crate::sanitizers::SanitizerRegistry;
use crate::words::{RussianNormalizer, WordNormalizer};
use std::sync::Arc;
use std::time::Duration;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(1);
pub const NORMALIZE_BUDGET: Duration = Duration::from_secs(3);

pub const ARTICLE_PAGE: &str = r#"<html><body>
    <article>
      <h1>Авария на трассе</h1>
      <p>Страшная авария произошла ночью. Водитель не пострадал, но машина сгорела.</p>
      <p>Очевидцы говорят про настоящий ад на дороге.</p>
    </article>
</body></html>"#;

pub const NOT_AN_ARTICLE_PAGE: &str = r#"<html><body><div>
    <h1>Example Domain</h1>
    <p>This domain is for use in illustrative examples in documents.</p>
</div></body></html>"#;

/// Dictionary forms, canonicalized the way the pipeline canonicalizes them.
pub fn charged_words() -> ChargedWordSet {
    ChargedWordSet::from_words(["авария", "авиакатастрофа", "ад", "страшный"])
        .canonicalized(&RussianNormalizer::new())
}

pub fn pipeline() -> ArticlePipeline {
    ArticlePipeline::new(
        Fetcher::new(reqwest::Client::new(), FETCH_TIMEOUT),
        Arc::new(SanitizerRegistry::with_builtin()),
        "inosmi_ru",
        Arc::new(RussianNormalizer::new()),
        Arc::new(charged_words()),
        NORMALIZE_BUDGET,
    )
}

/// Normalizer that blocks for a fixed time before delegating.
pub struct SlowNormalizer(pub Duration);

impl WordNormalizer for SlowNormalizer {
    fn canonical_form(&self, token: &str) -> Option<String> {
        Some(token.to_lowercase())
    }

    fn normalize<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
        std::thread::sleep(self.0);
        Box::new(
            text.split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .into_iter(),
        )
    }
}
