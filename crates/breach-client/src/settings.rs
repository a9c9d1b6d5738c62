//! Client settings read from the environment.

use breach_core::{ConfigError, GameConfig};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Where scores go unless overridden
pub const DEFAULT_SCORE_URL: &str = "https://YOUR_SERVER_URL_HERE.com/submit";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Failed to read game config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid game config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Everything the client needs before the first frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Leaderboard endpoint for score POSTs
    pub score_url: String,
    pub score_timeout: Duration,
    /// False when BREACH_SCORE_DISABLED is set
    pub submit_scores: bool,
    /// Fixed session seed, random when absent
    pub seed: Option<u64>,
    /// Optional JSON game config
    pub config_path: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl ClientSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let score_timeout = match lookup("BREACH_SCORE_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|_| SettingsError::Invalid {
                    var: "BREACH_SCORE_TIMEOUT_SECS",
                    expected: "a whole number of seconds",
                    value: value.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(5),
        };

        let seed = match lookup("BREACH_SEED") {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|_| {
                SettingsError::Invalid {
                    var: "BREACH_SEED",
                    expected: "an unsigned integer",
                    value: value.clone(),
                }
            })?),
            None => None,
        };

        let submit_scores = !lookup("BREACH_SCORE_DISABLED").is_some_and(|v| is_truthy(&v));

        Ok(Self {
            score_url: lookup("BREACH_SCORE_URL").unwrap_or_else(|| DEFAULT_SCORE_URL.into()),
            score_timeout,
            submit_scores,
            seed,
            config_path: lookup("BREACH_CONFIG").map(PathBuf::from),
            log_file: lookup("BREACH_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static-breach.log")),
        })
    }

    /// Load the game config file, or the standard rules when none is set
    pub fn load_game_config(&self) -> Result<GameConfig, SettingsError> {
        let Some(path) = &self.config_path else {
            return Ok(GameConfig::default());
        };

        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadConfig {
            path: path.clone(),
            source,
        })?;

        GameConfig::from_json_str(&json).map_err(|source| SettingsError::Config {
            path: path.clone(),
            source,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
