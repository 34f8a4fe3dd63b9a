use std::path::Path;

use serde::{Deserialize, Serialize};
use sift_core::Rule;
use thiserror::Error;
use tracing::debug;

use crate::hledger::{format_hledger_rules, parse_hledger_rules, HledgerError};
use crate::store::RuleStore;

#[derive(Error, Debug)]
pub enum RulesFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("Failed to write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Hledger(#[from] HledgerError),
}

/// Rule file flavours, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
    Toml,
    Json,
    Hledger,
}

impl RulesFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => RulesFormat::Toml,
            Some("json") => RulesFormat::Json,
            _ => RulesFormat::Hledger,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlRules {
    #[serde(default)]
    rules: Vec<Rule>,
}

pub fn parse_rules(text: &str, format: RulesFormat) -> Result<RuleStore, RulesFileError> {
    let rules = match format {
        RulesFormat::Toml => {
            let file: TomlRules = toml::from_str(text)?;
            // Tables without an Index keep file order.
            file.rules
                .into_iter()
                .enumerate()
                .map(|(pos, mut rule)| {
                    if rule.index == 0 {
                        rule.index = pos + 1;
                    }
                    rule
                })
                .collect()
        }
        RulesFormat::Json => serde_json::from_str(text)?,
        RulesFormat::Hledger => parse_hledger_rules(text)?,
    };
    Ok(RuleStore::new(rules))
}

pub fn format_rules(store: &RuleStore, format: RulesFormat) -> Result<String, RulesFileError> {
    Ok(match format {
        RulesFormat::Toml => toml::to_string(&TomlRules {
            rules: store.rules().to_vec(),
        })?,
        RulesFormat::Json => serde_json::to_string_pretty(store.rules())?,
        RulesFormat::Hledger => format_hledger_rules(store.rules()),
    })
}

pub fn load_rules(path: &Path) -> Result<RuleStore, RulesFileError> {
    let text = std::fs::read_to_string(path)?;
    let store = parse_rules(&text, RulesFormat::from_path(path))?;
    debug!(path = %path.display(), rules = store.len(), "loaded rules");
    Ok(store)
}

pub fn save_rules(path: &Path, store: &RuleStore) -> Result<(), RulesFileError> {
    let text = format_rules(store, RulesFormat::from_path(path))?;
    std::fs::write(path, text)?;
    Ok(())
}
