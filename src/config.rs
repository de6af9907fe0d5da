//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then the optional YAML file, then
//! command-line flags and environment variables (see [`crate::cli::Cli`]).
//!
//! # YAML format
//!
//! ```yaml
//! timeout_fetch_expired_sec: 3
//! min_runtime_sec: 3
//! max_urls_amount: 10
//! charged_dict_dir: charged_dict
//! lemmas: lemmas.txt
//! sanitizer: inosmi_ru
//! ```
//!
//! Every key is optional.

use crate::cli::Cli;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid setting `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Budget for one article download, in seconds.
    pub timeout_fetch_expired_sec: f64,
    /// Budget for normalizing one article, in seconds.
    pub min_runtime_sec: f64,
    /// Largest accepted batch.
    pub max_urls_amount: usize,
    pub charged_dict_dir: PathBuf,
    pub lemmas: Option<PathBuf>,
    pub sanitizer: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_fetch_expired_sec: 3.0,
            min_runtime_sec: 3.0,
            max_urls_amount: 10,
            charged_dict_dir: PathBuf::from("charged_dict"),
            lemmas: None,
            sanitizer: "inosmi_ru".to_string(),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read the YAML file at `path`, or return the defaults when there is none.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = fs::read_to_string(path).await?;
        let settings = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    /// Overlay every option given on the command line or in the environment.
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(secs) = cli.timeout_fetch_expired_sec {
            self.timeout_fetch_expired_sec = secs;
        }
        if let Some(secs) = cli.min_runtime_sec {
            self.min_runtime_sec = secs;
        }
        if let Some(max) = cli.max_urls_amount {
            self.max_urls_amount = max;
        }
        if let Some(dir) = &cli.charged_dict_dir {
            self.charged_dict_dir = dir.clone();
        }
        if let Some(lemmas) = &cli.lemmas {
            self.lemmas = Some(lemmas.clone());
        }
        if let Some(sanitizer) = &cli.sanitizer {
            self.sanitizer = sanitizer.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_seconds("timeout_fetch_expired_sec", self.timeout_fetch_expired_sec)?;
        check_seconds("min_runtime_sec", self.min_runtime_sec)?;
        if self.max_urls_amount == 0 {
            return Err(ConfigError::Invalid {
                name: "max_urls_amount",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        seconds(self.timeout_fetch_expired_sec)
    }

    pub fn normalize_budget(&self) -> Duration {
        seconds(self.min_runtime_sec)
    }
}

fn check_seconds(name: &'static str, secs: f64) -> Result<(), ConfigError> {
    match Duration::try_from_secs_f64(secs) {
        Ok(d) if !d.is_zero() => Ok(()),
        _ => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a positive number of seconds, got {secs}"),
        }),
    }
}

fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_default()
}
