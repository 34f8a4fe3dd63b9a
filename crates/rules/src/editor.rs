//! View-model behind the rule editor. Each field change is applied to the
//! model directly and `submit` reads only the model.

use rust_decimal::Decimal;
use sift_core::category::leaf;
use sift_core::{Rule, Transaction};

use crate::fingerprint::{fingerprint, FINGERPRINT_HEADER};
use crate::matcher::first_matching_condition;
use crate::pattern::{payee_regex, synthesize, synthesize_choices, unmarshal, Precision, SignFilter};
use crate::validate::{validate_rule, ValidationError};

/// A rule edit ready to hand to [`crate::RuleStore::apply_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChange {
    /// Replace one condition of an existing rule and set its category.
    UpdateCondition {
        index: usize,
        position: usize,
        pattern: String,
        account2: String,
    },
    /// Add a new rule after all existing ones.
    AddRule {
        conditions: Vec<String>,
        account2: String,
    },
    RemoveCondition { index: usize, position: usize },
    DeleteRule { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Express { precision: Precision, sign: SignFilter },
    Custom { pattern: String },
}

#[derive(Debug, Clone)]
pub struct RuleEditor {
    fingerprint: String,
    payee: String,
    amount: Decimal,
    rule: Rule,
    account2: String,
    condition: Option<usize>,
    mode: EditorMode,
}

impl RuleEditor {
    /// Opens the editor for `txn`. `rule` is the rule that currently
    /// categorizes it, or a blank rule when there is none.
    pub fn new(txn: &Transaction, rule: Rule) -> Self {
        let fingerprint = fingerprint(txn);
        let condition = first_matching_condition(&rule.conditions, &fingerprint);
        let pattern = match condition {
            Some(pos) => rule.conditions[pos].clone(),
            None => payee_regex(&txn.payee),
        };
        let choices = unmarshal(&pattern, &txn.payee);
        let mode = if pattern == synthesize_choices(&txn.payee, choices) {
            EditorMode::Express {
                precision: choices.precision(),
                sign: choices.sign(),
            }
        } else {
            EditorMode::Custom { pattern }
        };
        let account2 = if rule.account2.is_empty() {
            txn.category().unwrap_or_default().to_string()
        } else {
            rule.account2.clone()
        };
        RuleEditor {
            fingerprint,
            payee: txn.payee.clone(),
            amount: txn.amount(),
            rule,
            account2,
            condition,
            mode,
        }
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn account2(&self) -> &str {
        &self.account2
    }

    /// Whether submitting edits an existing condition rather than adding one.
    pub fn is_update(&self) -> bool {
        self.condition.is_some()
    }

    pub fn pattern(&self) -> String {
        match &self.mode {
            EditorMode::Express { precision, sign } => synthesize(&self.payee, *precision, *sign),
            EditorMode::Custom { pattern } => pattern.clone(),
        }
    }

    /// Only meaningful in express mode; ignored for custom patterns.
    pub fn set_precision(&mut self, value: Precision) {
        if let EditorMode::Express { precision, .. } = &mut self.mode {
            *precision = value;
        }
    }

    /// Only meaningful in express mode; ignored for custom patterns.
    pub fn set_sign(&mut self, value: SignFilter) {
        if let EditorMode::Express { sign, .. } = &mut self.mode {
            *sign = value;
        }
    }

    pub fn set_custom_pattern(&mut self, pattern: &str) {
        self.mode = EditorMode::Custom {
            pattern: pattern.to_string(),
        };
    }

    pub fn set_account2(&mut self, account2: &str) {
        self.account2 = account2.trim().to_string();
    }

    /// Switches between express and custom mode, carrying the current
    /// pattern across.
    pub fn toggle_custom(&mut self) {
        self.mode = match &self.mode {
            EditorMode::Express { .. } => EditorMode::Custom {
                pattern: self.pattern(),
            },
            EditorMode::Custom { pattern } => {
                let choices = unmarshal(pattern, &self.payee);
                EditorMode::Express {
                    precision: choices.precision(),
                    sign: choices.sign(),
                }
            }
        };
    }

    /// Sign choices that can never match this transaction.
    pub fn disabled_signs(&self) -> Vec<SignFilter> {
        if self.amount < Decimal::ZERO {
            vec![SignFilter::Revenues]
        } else if self.amount > Decimal::ZERO {
            vec![SignFilter::Expenses]
        } else {
            vec![]
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rule(&self.pattern(), &self.fingerprint, &self.account2)
    }

    /// The fingerprint with its column header, shown when the pattern
    /// fails to match.
    pub fn fingerprint_help(&self) -> String {
        format!("{FINGERPRINT_HEADER}\n{}", self.fingerprint)
    }

    pub fn summary(&self) -> String {
        format!(
            "For new transactions, always categorize \"{}\" as {}.",
            self.payee,
            leaf(&self.account2)
        )
    }

    pub fn submit(&self) -> Result<RuleChange, ValidationError> {
        self.validate()?;
        let pattern = self.pattern();
        Ok(match self.condition {
            Some(position) => RuleChange::UpdateCondition {
                index: self.rule.index,
                position,
                pattern,
                account2: self.account2.clone(),
            },
            None => {
                let mut conditions = self.rule.conditions.clone();
                conditions.push(pattern);
                RuleChange::AddRule {
                    conditions,
                    account2: self.account2.clone(),
                }
            }
        })
    }

    /// Removes the condition that matched this transaction, or the whole
    /// rule when it was the only one. `None` when nothing matched.
    pub fn remove(&self) -> Option<RuleChange> {
        let position = self.condition?;
        let index = self.rule.index;
        if self.rule.conditions.len() == 1 {
            Some(RuleChange::DeleteRule { index })
        } else {
            Some(RuleChange::RemoveCondition { index, position })
        }
    }
}
