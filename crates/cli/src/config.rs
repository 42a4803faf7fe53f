//! CLI configuration -- `rfops.toml` merged with command-line overrides.
//!
//! ```toml
//! api_url = "http://localhost:8000"
//! attack_poll_secs = 3
//! job_poll_secs = 5
//! ```
//!
//! An explicitly passed `--config` path must exist and parse; the default
//! `./rfops.toml` is optional and silently skipped when absent.

use std::path::Path;

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "rfops.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub attack_poll_secs: u64,
    pub job_poll_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: "http://localhost:8000".to_string(),
            attack_poll_secs: rfops_tracker::ATTACK_POLL_INTERVAL.as_secs(),
            job_poll_secs: rfops_tracker::JOB_POLL_INTERVAL.as_secs(),
        }
    }
}

/// Resolve the effective config: file (explicit or default location),
/// then flag overrides on top.
pub fn load(path: Option<&Path>, api_url: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                parse_file(default)?
            } else {
                Config::default()
            }
        }
    };
    if let Some(api_url) = api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    Ok(config)
}

fn parse_file(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
