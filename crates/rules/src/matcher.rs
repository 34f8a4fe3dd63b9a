use regex::{Regex, RegexBuilder};
use sift_core::{Rule, Transaction};
use tracing::{debug, warn};

use crate::fingerprint::fingerprint;

/// Compiles a rule condition the way the matcher uses it: case-insensitive.
pub fn compile_condition(condition: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(condition).case_insensitive(true).build()
}

/// Position of the first condition matching `fingerprint`. Conditions that
/// do not compile never match.
pub fn first_matching_condition(conditions: &[String], fingerprint: &str) -> Option<usize> {
    conditions.iter().position(|c| {
        compile_condition(c)
            .map(|re| re.is_match(fingerprint))
            .unwrap_or(false)
    })
}

/// Internal pairing of a rule with its compiled conditions. Conditions that
/// failed to compile are left out.
struct CompiledRule {
    rule: Rule,
    conditions: Vec<Regex>,
}

impl CompiledRule {
    fn is_match(&self, fingerprint: &str) -> bool {
        self.conditions.iter().any(|re| re.is_match(fingerprint))
    }
}

/// Finds the rule that categorizes a transaction.
///
/// Rules are ordered by `index`; when several match, the one with the
/// greatest index wins.
pub struct RuleMatcher {
    rules: Vec<CompiledRule>,
}

impl RuleMatcher {
    pub fn new(rules: &[Rule]) -> Self {
        let mut compiled: Vec<CompiledRule> = rules
            .iter()
            .map(|rule| {
                let conditions = rule
                    .conditions
                    .iter()
                    .filter_map(|cond| match compile_condition(cond) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!(rule = rule.index, condition = %cond, "ignoring invalid condition: {e}");
                            None
                        }
                    })
                    .collect();
                CompiledRule {
                    rule: rule.clone(),
                    conditions,
                }
            })
            .collect();
        compiled.sort_by_key(|cr| cr.rule.index);
        Self { rules: compiled }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The winning rule for a fingerprint, or `None` when nothing matches.
    pub fn find_matching_rule(&self, fingerprint: &str) -> Option<&Rule> {
        let found = self
            .rules
            .iter()
            .filter(|cr| cr.is_match(fingerprint))
            .max_by_key(|cr| cr.rule.index)
            .map(|cr| &cr.rule);
        debug!(fingerprint, rule = found.map(|r| r.index), "rule lookup");
        found
    }

    /// Every matching rule, in ascending index order.
    pub fn matches(&self, fingerprint: &str) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|cr| cr.is_match(fingerprint))
            .map(|cr| &cr.rule)
            .collect()
    }

    pub fn find_for_transaction(&self, txn: &Transaction) -> Option<&Rule> {
        self.find_matching_rule(&fingerprint(txn))
    }

    /// Sets the transaction's category from the winning rule. Rules with an
    /// empty `account2` leave the transaction unchanged.
    pub fn categorize(&self, txn: &mut Transaction) -> Option<&Rule> {
        let rule = self.find_for_transaction(txn)?;
        if !rule.account2.is_empty() {
            txn.set_category(&rule.account2);
        }
        Some(rule)
    }

    /// Returns positions + matched rules for all transactions, in order.
    pub fn apply_rules<'a>(&'a self, transactions: &[Transaction]) -> Vec<(usize, &'a Rule)> {
        transactions
            .iter()
            .enumerate()
            .filter_map(|(idx, txn)| self.find_for_transaction(txn).map(|r| (idx, r)))
            .collect()
    }
}
