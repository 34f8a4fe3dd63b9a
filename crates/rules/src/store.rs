use sift_core::category::{validate_rule_category, CategoryError};
use sift_core::rule::clean_conditions;
use sift_core::Rule;
use thiserror::Error;
use tracing::debug;

use crate::editor::RuleChange;
use crate::matcher::RuleMatcher;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("No rule at index {0}")]
    NotFound(usize),
    #[error("Rule {index} has no condition at position {position}")]
    ConditionNotFound { index: usize, position: usize },
    #[error("A rule needs at least one condition or a category")]
    EmptyRule,
    #[error(transparent)]
    Category(#[from] CategoryError),
}

/// What a mutation left behind at the edited position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Added(usize),
    Updated(usize),
    /// The rule was removed and the rest renumbered.
    Deleted,
}

/// Sets every rule's index to its 1-based position.
pub fn renumber(mut rules: Vec<Rule>) -> Vec<Rule> {
    for (pos, rule) in rules.iter_mut().enumerate() {
        rule.index = pos + 1;
    }
    rules
}

fn check_account2(account2: &str) -> Result<(), RuleError> {
    if account2.is_empty() {
        return Ok(());
    }
    validate_rule_category(account2)?;
    Ok(())
}

/// The ordered rule list. Every mutation leaves indices at exactly `1..=N`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Builds a store from rules in any order. Rules are ordered by their
    /// current index (stable for duplicates), deletion sentinels are dropped,
    /// and the result is renumbered.
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut store = RuleStore::default();
        store.replace(rules);
        store
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        index.checked_sub(1).and_then(|pos| self.rules.get(pos))
    }

    fn position(&self, index: usize) -> Result<usize, RuleError> {
        if index == 0 || index > self.rules.len() {
            return Err(RuleError::NotFound(index));
        }
        Ok(index - 1)
    }

    /// Distinct non-empty categories, in rule order.
    pub fn accounts(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for rule in &self.rules {
            if !rule.account2.is_empty() && !seen.contains(&rule.account2.as_str()) {
                seen.push(rule.account2.as_str());
            }
        }
        seen
    }

    /// Replaces the whole list, as when the backing store returns its state.
    pub fn replace(&mut self, mut rules: Vec<Rule>) {
        rules.sort_by_key(|r| r.index);
        rules.retain(|r| !r.is_deletion_sentinel());
        self.rules = renumber(rules);
    }

    /// Inserts a rule so that it ends up at index `at`, clamped to `1..=N+1`.
    /// Returns the new rule's index.
    pub fn add<I, S>(&mut self, conditions: I, account2: &str, at: usize) -> Result<usize, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rule = Rule::new(0, clean_conditions(conditions), account2);
        if rule.is_deletion_sentinel() {
            return Err(RuleError::EmptyRule);
        }
        check_account2(account2)?;
        let pos = at.clamp(1, self.rules.len() + 1) - 1;
        self.rules.insert(pos, rule);
        self.rules = renumber(std::mem::take(&mut self.rules));
        debug!(index = pos + 1, total = self.rules.len(), "added rule");
        Ok(pos + 1)
    }

    /// Adds a rule after all others, where it takes priority over them.
    pub fn append<I, S>(&mut self, conditions: I, account2: &str) -> Result<usize, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let at = self.rules.len() + 1;
        self.add(conditions, account2, at)
    }

    /// Moves the rule at `old_index` to `new_index` (clamped into `1..=N`).
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> Result<usize, RuleError> {
        let old = self.position(old_index)?;
        let rule = self.rules.remove(old);
        let new = new_index.clamp(1, self.rules.len() + 1) - 1;
        self.rules.insert(new, rule);
        self.rules = renumber(std::mem::take(&mut self.rules));
        debug!(from = old_index, to = new + 1, "reordered rule");
        Ok(new + 1)
    }

    pub fn update_conditions<I, S>(&mut self, index: usize, conditions: I) -> Result<EditOutcome, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pos = self.position(index)?;
        self.rules[pos].conditions = clean_conditions(conditions);
        self.delete_if_empty(index)
    }

    pub fn update_account2(&mut self, index: usize, account2: &str) -> Result<EditOutcome, RuleError> {
        let pos = self.position(index)?;
        check_account2(account2)?;
        self.rules[pos].account2 = account2.to_string();
        self.delete_if_empty(index)
    }

    /// Removes the rule at `index` if it has become a deletion sentinel.
    pub fn delete_if_empty(&mut self, index: usize) -> Result<EditOutcome, RuleError> {
        let pos = self.position(index)?;
        if self.rules[pos].is_deletion_sentinel() {
            self.remove(index)?;
            return Ok(EditOutcome::Deleted);
        }
        Ok(EditOutcome::Updated(index))
    }

    pub fn remove(&mut self, index: usize) -> Result<Rule, RuleError> {
        let pos = self.position(index)?;
        let removed = self.rules.remove(pos);
        self.rules = renumber(std::mem::take(&mut self.rules));
        debug!(index, total = self.rules.len(), "removed rule");
        Ok(removed)
    }

    pub fn matcher(&self) -> RuleMatcher {
        RuleMatcher::new(&self.rules)
    }

    /// Performs an edit submitted from a rule editor.
    pub fn apply_change(&mut self, change: RuleChange) -> Result<EditOutcome, RuleError> {
        match change {
            RuleChange::UpdateCondition {
                index,
                position,
                pattern,
                account2,
            } => {
                let pos = self.position(index)?;
                let mut conditions = self.rules[pos].conditions.clone();
                let slot = conditions
                    .get_mut(position)
                    .ok_or(RuleError::ConditionNotFound { index, position })?;
                *slot = pattern;
                check_account2(&account2)?;
                self.rules[pos].account2 = account2;
                self.update_conditions(index, conditions)
            }
            RuleChange::AddRule {
                conditions,
                account2,
            } => self.append(conditions, &account2).map(EditOutcome::Added),
            RuleChange::RemoveCondition { index, position } => {
                let pos = self.position(index)?;
                let mut conditions = self.rules[pos].conditions.clone();
                if position >= conditions.len() {
                    return Err(RuleError::ConditionNotFound { index, position });
                }
                conditions.remove(position);
                self.update_conditions(index, conditions)
            }
            RuleChange::DeleteRule { index } => self.remove(index).map(|_| EditOutcome::Deleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_rule(index: usize, condition: &str, account: &str) -> Rule {
        let conditions = if condition.is_empty() {
            vec![]
        } else {
            vec![condition.to_string()]
        };
        Rule::new(index, conditions, account)
    }

    fn sample() -> RuleStore {
        RuleStore::new(vec![
            make_rule(1, "rent", "expenses:home"),
            make_rule(2, "coffee", "expenses:food"),
            make_rule(3, "payroll", "revenues:salary"),
        ])
    }

    fn conditions(store: &RuleStore) -> Vec<&str> {
        store.rules().iter().map(|r| r.conditions[0].as_str()).collect()
    }

    fn assert_contiguous(store: &RuleStore) {
        let indices: Vec<usize> = store.rules().iter().map(|r| r.index).collect();
        let expected: Vec<usize> = (1..=store.len()).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn new_sorts_and_renumbers() {
        let store = RuleStore::new(vec![
            make_rule(7, "b", "expenses:b"),
            make_rule(3, "a", "expenses:a"),
            make_rule(9, "", ""),
        ]);
        assert_eq!(conditions(&store), vec!["a", "b"]);
        assert_contiguous(&store);
    }

    #[test]
    fn add_inserts_and_clamps() {
        let mut store = sample();
        assert_eq!(store.add(["gym"], "expenses:health", 2).unwrap(), 2);
        assert_eq!(conditions(&store), vec!["rent", "gym", "coffee", "payroll"]);
        assert_eq!(store.add(["tail"], "expenses:misc", 99).unwrap(), 5);
        assert_eq!(store.add(["head"], "expenses:misc", 0).unwrap(), 1);
        assert_contiguous(&store);
    }

    #[test]
    fn add_cleans_and_rejects_empty() {
        let mut store = sample();
        assert_eq!(store.append(["  ", ""], ""), Err(RuleError::EmptyRule));
        let index = store.append([" gas  ", ""], "expenses:car").unwrap();
        assert_eq!(store.get(index).unwrap().conditions, vec!["gas"]);
    }

    #[test]
    fn add_rejects_bad_category() {
        let mut store = sample();
        assert_eq!(
            store.append(["gas"], "assets:car"),
            Err(RuleError::Category(CategoryError::MissingRulePrefix))
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn reorder_moves_and_renumbers() {
        let mut store = sample();
        assert_eq!(store.reorder(3, 1).unwrap(), 1);
        assert_eq!(conditions(&store), vec!["payroll", "rent", "coffee"]);
        assert_eq!(store.reorder(1, 50).unwrap(), 3);
        assert_eq!(conditions(&store), vec!["rent", "coffee", "payroll"]);
        assert_contiguous(&store);
    }

    #[test]
    fn reorder_unknown_index() {
        let mut store = sample();
        assert_eq!(store.reorder(0, 1), Err(RuleError::NotFound(0)));
        assert_eq!(store.reorder(4, 1), Err(RuleError::NotFound(4)));
    }

    #[test]
    fn clearing_both_fields_deletes() {
        let mut store = sample();
        assert_eq!(store.update_account2(2, "").unwrap(), EditOutcome::Updated(2));
        let empty: [&str; 0] = [];
        assert_eq!(store.update_conditions(2, empty).unwrap(), EditOutcome::Deleted);
        assert_eq!(conditions(&store), vec!["rent", "payroll"]);
        assert_contiguous(&store);
    }

    #[test]
    fn accounts_are_distinct() {
        let mut store = sample();
        store.append(["latte"], "expenses:food").unwrap();
        assert_eq!(
            store.accounts(),
            vec!["expenses:home", "expenses:food", "revenues:salary"]
        );
    }

    #[test]
    fn apply_update_condition() {
        let mut store = sample();
        let outcome = store
            .apply_change(RuleChange::UpdateCondition {
                index: 2,
                position: 0,
                pattern: "espresso".into(),
                account2: "expenses:drinks".into(),
            })
            .unwrap();
        assert_eq!(outcome, EditOutcome::Updated(2));
        let rule = store.get(2).unwrap();
        assert_eq!(rule.conditions, vec!["espresso"]);
        assert_eq!(rule.account2, "expenses:drinks");
    }

    #[test]
    fn apply_missing_condition_position() {
        let mut store = sample();
        let err = store
            .apply_change(RuleChange::RemoveCondition { index: 1, position: 3 })
            .unwrap_err();
        assert_eq!(err, RuleError::ConditionNotFound { index: 1, position: 3 });
    }

    #[test]
    fn apply_add_and_delete() {
        let mut store = sample();
        let added = store
            .apply_change(RuleChange::AddRule {
                conditions: vec!["shell".into()],
                account2: "expenses:car".into(),
            })
            .unwrap();
        assert_eq!(added, EditOutcome::Added(4));
        let deleted = store.apply_change(RuleChange::DeleteRule { index: 1 }).unwrap();
        assert_eq!(deleted, EditOutcome::Deleted);
        assert_eq!(conditions(&store), vec!["coffee", "payroll", "shell"]);
        assert_contiguous(&store);
    }

    #[test]
    fn matcher_prefers_appended_rule() {
        let mut store = sample();
        store.append(["coffee"], "expenses:treats").unwrap();
        let matcher = store.matcher();
        let rule = matcher
            .find_matching_rule(r#"2020-01-01,"coffee shop",USD,-3,0"#)
            .unwrap();
        assert_eq!(rule.account2, "expenses:treats");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Reorder(usize, usize),
        Remove(usize),
        Clear(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..8).prop_map(Op::Add),
            (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Reorder(a, b)),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn renumber_is_idempotent(indices in proptest::collection::vec(0usize..100, 0..12)) {
            let rules: Vec<Rule> = indices
                .iter()
                .map(|&i| make_rule(i, "x", "expenses:x"))
                .collect();
            let once = renumber(rules);
            prop_assert_eq!(renumber(once.clone()), once);
        }

        #[test]
        fn mutations_keep_indices_contiguous(ops in proptest::collection::vec(op(), 0..20)) {
            let mut store = sample();
            for op in ops {
                let _ = match op {
                    Op::Add(at) => store.add(["x"], "expenses:x", at).map(|_| ()),
                    Op::Reorder(a, b) => store.reorder(a, b).map(|_| ()),
                    Op::Remove(i) => store.remove(i).map(|_| ()),
                    Op::Clear(i) => store
                        .update_account2(i, "")
                        .and_then(|_| store.update_conditions(i, Vec::<String>::new()))
                        .map(|_| ()),
                };
                let indices: Vec<usize> = store.rules().iter().map(|r| r.index).collect();
                let expected: Vec<usize> = (1..=store.len()).collect();
                prop_assert_eq!(indices, expected);
            }
        }
    }
}
