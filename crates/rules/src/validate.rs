use sift_core::category::{validate_rule_category, CategoryError};
use thiserror::Error;

use crate::matcher::compile_condition;

/// Problems found in an edited rule before it is submitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Pattern is empty")]
    EmptyPattern,
    #[error("Invalid regular expression: {0}")]
    InvalidPattern(String),
    #[error("Pattern does not match this transaction: {fingerprint}")]
    NoSelfMatch { fingerprint: String },
    #[error(transparent)]
    Category(#[from] CategoryError),
}

/// Checks that `pattern` compiles and matches the fingerprint it was
/// written for.
pub fn validate_pattern(pattern: &str, fingerprint: &str) -> Result<(), ValidationError> {
    if pattern.trim().is_empty() {
        return Err(ValidationError::EmptyPattern);
    }
    let re = compile_condition(pattern).map_err(|e| ValidationError::InvalidPattern(e.to_string()))?;
    if !re.is_match(fingerprint) {
        return Err(ValidationError::NoSelfMatch {
            fingerprint: fingerprint.to_string(),
        });
    }
    Ok(())
}

pub fn validate_rule(pattern: &str, fingerprint: &str, account2: &str) -> Result<(), ValidationError> {
    validate_pattern(pattern, fingerprint)?;
    validate_rule_category(account2)?;
    Ok(())
}
