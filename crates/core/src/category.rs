use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SEPARATOR: char = ':';
pub const BUILTIN: &str = "builtin";
pub const EVERYTHING_ELSE: &str = "builtin:everything else";

/// The top-level component of a colon-delimited category path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Assets,
    Liabilities,
    Expenses,
    Revenues,
    Uncategorized,
    Builtin,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKind::Assets => "assets",
            CategoryKind::Liabilities => "liabilities",
            CategoryKind::Expenses => "expenses",
            CategoryKind::Revenues => "revenues",
            CategoryKind::Uncategorized => "uncategorized",
            CategoryKind::Builtin => BUILTIN,
        }
    }

    /// Kind of the category's top-level component, if it is a known one.
    pub fn of(category: &str) -> Option<Self> {
        top_level(category).parse().ok()
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assets" => Ok(CategoryKind::Assets),
            "liabilities" => Ok(CategoryKind::Liabilities),
            "expenses" => Ok(CategoryKind::Expenses),
            "revenues" => Ok(CategoryKind::Revenues),
            "uncategorized" => Ok(CategoryKind::Uncategorized),
            "builtin" => Ok(CategoryKind::Builtin),
            other => Err(CategoryError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CategoryError {
    #[error("Unknown category type: {0}")]
    UnknownKind(String),
    #[error("Category must start with \"expenses:\" or \"revenues:\"")]
    MissingRulePrefix,
    #[error("Category name is empty")]
    Empty,
}

/// Substring before the first `:`, or the whole name when there is no colon.
pub fn top_level(category: &str) -> &str {
    match category.find(SEPARATOR) {
        Some(i) => &category[..i],
        None => category,
    }
}

/// Substring after the last `:`, or the whole name when there is no colon.
pub fn leaf(category: &str) -> &str {
    match category.rfind(SEPARATOR) {
        Some(i) => &category[i + 1..],
        None => category,
    }
}

/// Human-readable path, e.g. `expenses > shopping > food`.
pub fn render(category: &str) -> String {
    category.replace(SEPARATOR, " > ")
}

pub fn is_builtin(category: &str) -> bool {
    category.to_lowercase().starts_with("builtin:")
}

pub fn is_revenue(category: &str) -> bool {
    category == "revenues" || category.starts_with("revenues:")
}

/// Categories a rule may assign must live under `expenses:` or `revenues:`.
pub fn validate_rule_category(category: &str) -> Result<(), CategoryError> {
    if category.is_empty() {
        return Err(CategoryError::Empty);
    }
    if category.starts_with("expenses:") || category.starts_with("revenues:") {
        Ok(())
    } else {
        Err(CategoryError::MissingRulePrefix)
    }
}
