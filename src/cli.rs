//! Command-line interface definitions.
//!
//! Every option can also come from an environment variable, and every option
//! except the subcommand arguments can be set in the YAML file given with
//! `--config`. Flags and environment variables win over the file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Serve the batch endpoint on the default address
/// jaundice_rate serve
///
/// # Tighter fetch budget and a lemma dictionary
/// jaundice_rate --timeout-fetch-expired-sec 2 --lemmas ./lemmas.txt serve -b 0.0.0.0:8080
///
/// # Score one article and print the result
/// jaundice_rate analyze https://inosmi.ru/20220908/polonez-255973070.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "JAUNDICE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Seconds allowed for downloading one article
    #[arg(long, env = "TIMEOUT_FETCH_EXPIRED_SEC", global = true)]
    pub timeout_fetch_expired_sec: Option<f64>,

    /// Seconds allowed for normalizing one article's words
    #[arg(long, env = "MIN_RUNTIME_SEC", global = true)]
    pub min_runtime_sec: Option<f64>,

    /// Largest number of URLs accepted in one request
    #[arg(long, env = "MAX_URLS_AMOUNT", global = true)]
    pub max_urls_amount: Option<usize>,

    /// Directory holding positive_words.txt and negative_words.txt
    #[arg(long, env = "CHARGED_DICT_DIR", global = true)]
    pub charged_dict_dir: Option<PathBuf>,

    /// Optional `form lemma` dictionary used by the word normalizer
    #[arg(long, env = "LEMMAS_PATH", global = true)]
    pub lemmas: Option<PathBuf>,

    /// Sanitizer (source key) applied to fetched pages
    #[arg(long, env = "SANITIZER", global = true)]
    pub sanitizer: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the batch analysis endpoint over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
        bind: String,
    },
    /// Analyze a single article and print its rating
    Analyze {
        /// Article URL
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    // Parsed values may come from the environment of the test process, so
    // defaults are checked on the declared arguments instead.
    #[test]
    fn test_cli_serve_defaults() {
        let command = Cli::command();
        let serve = command.find_subcommand("serve").unwrap();
        let bind = serve
            .get_arguments()
            .find(|arg| arg.get_id() == "bind")
            .unwrap();
        let defaults: Vec<_> = bind.get_default_values().iter().map(|v| v.to_str()).collect();
        assert_eq!(defaults, [Some("127.0.0.1:8080")]);
        assert_eq!(bind.get_env(), Some(OsStr::new("BIND_ADDR")));

        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert!(config.get_default_values().is_empty());
        assert!(config.is_global_set());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "jaundice_rate",
            "serve",
            "-b",
            "0.0.0.0:9000",
            "--max-urls-amount",
            "5",
            "--timeout-fetch-expired-sec",
            "1.5",
        ]);

        assert_eq!(
            cli.command,
            Command::Serve {
                bind: "0.0.0.0:9000".to_string()
            }
        );
        assert_eq!(cli.max_urls_amount, Some(5));
        assert_eq!(cli.timeout_fetch_expired_sec, Some(1.5));
    }

    #[test]
    fn test_cli_analyze() {
        let cli = Cli::parse_from([
            "jaundice_rate",
            "--sanitizer",
            "inosmi_ru",
            "analyze",
            "https://inosmi.ru/a.html",
        ]);

        assert_eq!(
            cli.command,
            Command::Analyze {
                url: "https://inosmi.ru/a.html".to_string()
            }
        );
        assert_eq!(cli.sanitizer.as_deref(), Some("inosmi_ru"));
    }
}
