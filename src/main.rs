//! # Jaundice Rate
//!
//! Scores news articles by how "yellow" their language is: the share of an
//! article's words that belong to a curated vocabulary of charged
//! (sensationalist) words.
//!
//! ## Usage
//!
//! ```sh
//! jaundice_rate serve
//! curl 'http://127.0.0.1:8080/?urls=https://inosmi.ru/a.html,https://inosmi.ru/b.html'
//!
//! jaundice_rate analyze https://inosmi.ru/20220908/polonez-255973070.html
//! ```
//!
//! ## Architecture
//!
//! Every URL of a request runs through its own pipeline task:
//! 1. **Fetching**: Download the page within the fetch budget
//! 2. **Sanitizing**: Reduce the page to article text with the site's sanitizer
//! 3. **Normalizing**: Split into canonical word forms within the normalize budget
//! 4. **Scoring**: Percentage of charged words, two decimal places
//!
//! Each pipeline ends in exactly one status (`OK`, `FETCH_ERROR`,
//! `PARSING_ERROR`, `TIMEOUT`); a failing URL never affects its siblings.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod batch;
mod charged;
mod cli;
mod config;
mod fetcher;
mod models;
mod pipeline;
mod sanitizers;
mod scoring;
mod server;
mod words;

#[cfg(test)]
mod test_support;

use batch::BatchOrchestrator;
use charged::ChargedWordSet;
use cli::{Cli, Command};
use config::Settings;
use fetcher::Fetcher;
use models::ProcessingStatus;
use pipeline::ArticlePipeline;
use sanitizers::SanitizerRegistry;
use server::AppState;
use words::{RussianNormalizer, WordNormalizer};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref())
        .await?
        .with_cli_overrides(&args);
    if let Err(e) = settings.validate() {
        error!(error = %e, "Refusing to start with invalid settings");
        return Err(e.into());
    }
    info!(?settings, "Settings resolved");

    let pipeline = match build_pipeline(&settings).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "Failed to prepare the article pipeline");
            return Err(e);
        }
    };

    match args.command {
        Command::Serve { bind } => {
            let state = Arc::new(AppState {
                batch: BatchOrchestrator::new(pipeline, settings.max_urls_amount),
            });
            server::serve(&bind, state).await
        }
        Command::Analyze { url } => {
            let result = pipeline.process(&url).await;
            match (result.status(), result.score(), result.words_count()) {
                (ProcessingStatus::Ok, Some(score), Some(words_count)) => {
                    println!("Rating: {score}\nWords in article: {words_count}");
                }
                (status, _, _) => println!("Status: {status}"),
            }
            Ok(())
        }
    }
}

/// Build every shared, read-only dependency of the pipeline once.
#[instrument(level = "info", skip_all)]
async fn build_pipeline(settings: &Settings) -> Result<ArticlePipeline, Box<dyn Error>> {
    let sanitizers = SanitizerRegistry::with_builtin();
    if !sanitizers.contains(&settings.sanitizer) {
        return Err(format!("unknown sanitizer `{}`", settings.sanitizer).into());
    }

    let normalizer: Arc<dyn WordNormalizer> = match &settings.lemmas {
        Some(path) => Arc::new(RussianNormalizer::load(path).await?),
        None => Arc::new(RussianNormalizer::new()),
    };
    let charged = ChargedWordSet::load(&settings.charged_dict_dir)
        .await?
        .canonicalized(normalizer.as_ref());
    if charged.is_empty() {
        warn!(dir = %settings.charged_dict_dir.display(), "Charged vocabulary is empty; every article will score 0");
    }

    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let fetcher = Fetcher::new(http, settings.fetch_timeout());

    Ok(ArticlePipeline::new(
        fetcher,
        Arc::new(sanitizers),
        settings.sanitizer.as_str(),
        normalizer,
        Arc::new(charged),
        settings.normalize_budget(),
    ))
}
