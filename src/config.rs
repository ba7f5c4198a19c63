//! Client configuration from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REVEAL_TICK: Duration = Duration::from_millis(15);
pub const DEFAULT_REVEAL_STEP: usize = 1;

/// Settings for the terminal client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the summarization service
    pub api_url: String,
    /// Per-request timeout; `None` means wait for the server
    pub request_timeout: Option<Duration>,
    pub reveal_tick: Duration,
    /// Code points revealed per tick
    pub reveal_step: usize,
    pub log_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            reveal_tick: DEFAULT_REVEAL_TICK,
            reveal_step: DEFAULT_REVEAL_STEP,
            log_path: default_log_path(std::env::var("HOME").ok()),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self {
            log_path: default_log_path(lookup("HOME")),
            ..Self::default()
        };

        Self {
            api_url: lookup("WIKI_EXPLORER_API_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.api_url),
            request_timeout: parse_var::<u64>(&lookup, "WIKI_EXPLORER_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            reveal_tick: parse_var::<u64>(&lookup, "WIKI_EXPLORER_REVEAL_MS")
                .filter(|ms| *ms > 0)
                .map_or(defaults.reveal_tick, Duration::from_millis),
            reveal_step: parse_var::<usize>(&lookup, "WIKI_EXPLORER_REVEAL_STEP")
                .filter(|step| *step > 0)
                .unwrap_or(defaults.reveal_step),
            log_path: lookup("WIKI_EXPLORER_LOG")
                .map_or(defaults.log_path, PathBuf::from),
        }
    }
}

fn default_log_path(home: Option<String>) -> PathBuf {
    let home = home.unwrap_or_else(|| "/tmp".to_string());
    PathBuf::from(format!("{home}/.wiki-explorer/client.log"))
}

/// Parse a variable, ignoring (with a warning) values that do not parse.
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}
