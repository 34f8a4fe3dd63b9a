use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sift_budget::DEFAULT_BUCKET_TARGET;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "sift.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rules file: `.toml`, `.json`, or hledger rules text.
    pub rules: Option<PathBuf>,
    pub bucket_target: usize,
    pub currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rules: None,
            bucket_target: DEFAULT_BUCKET_TARGET,
            currency_symbol: "$".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config")?;
        Ok(config)
    }

    /// Reads `path`, or `sift.toml` in the working directory when no path
    /// is given. A missing file yields the defaults. Relative `rules`
    /// paths resolve against the config file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            if path != Path::new(DEFAULT_CONFIG_FILE) {
                warn!(path = %path.display(), "config file not found, using defaults");
            }
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Config::from_toml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        if let (Some(rules), Some(dir)) = (&config.rules, path.parent()) {
            if rules.is_relative() {
                config.rules = Some(dir.join(rules));
            }
        }
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
