//! The set of budgets a user keeps, with the reserved `builtin:` entries.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sift_core::category::{is_builtin, is_revenue, EVERYTHING_ELSE};
use sift_core::Budget;
use thiserror::Error;
use tracing::debug;

use crate::ranking::sort_budgets;

/// Accounts never counted toward "everything else", besides budgeted ones.
const EXCLUDED_FROM_LEFTOVER: [&str; 3] = ["assets", "liabilities", "builtin"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    #[error("Account name is required")]
    MissingAccount,
    #[error("Account name is reserved: {0}")]
    Reserved(String),
    #[error("Budget already exists: {0}")]
    Duplicate(String),
    #[error("No budget for {0}")]
    NotFound(String),
}

/// Step used by the +/- buttons on a budget target.
pub fn increment_step(amount: Decimal) -> Decimal {
    if amount < Decimal::ONE_HUNDRED {
        Decimal::TEN
    } else {
        Decimal::ONE_HUNDRED
    }
}

pub fn step_up(amount: Decimal) -> Decimal {
    amount + increment_step(amount)
}

/// Steps down so that 100 goes to 90 and 200 goes to 100. Never below zero.
pub fn step_down(amount: Decimal) -> Decimal {
    (amount - increment_step(amount - Decimal::ONE)).max(Decimal::ZERO)
}

fn covered_by(account: &str, prefix: &str) -> bool {
    account == prefix
        || account
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// Period activity of every account not covered by a budget or an
/// excluded top-level account.
pub fn leftover_accounts<'a>(
    budgets: &[Budget],
    activity: &'a BTreeMap<String, Decimal>,
) -> BTreeMap<&'a str, Decimal> {
    activity
        .iter()
        .filter(|(account, _)| {
            !EXCLUDED_FROM_LEFTOVER
                .iter()
                .copied()
                .chain(budgets.iter().map(|b| b.account.as_str()))
                .any(|prefix| covered_by(account, prefix))
        })
        .map(|(account, balance)| (account.as_str(), *balance))
        .collect()
}

/// Absolute values are summed so revenues do not cancel out spending.
pub fn everything_else_sum(budgets: &[Budget], activity: &BTreeMap<String, Decimal>) -> Decimal {
    leftover_accounts(budgets, activity)
        .values()
        .map(|v| v.abs())
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetBook {
    budgets: Vec<Budget>,
}

impl BudgetBook {
    /// Loads stored budgets. Unknown `builtin:` entries are dropped and the
    /// "everything else" entry is added when missing.
    pub fn new(budgets: Vec<Budget>) -> Self {
        let mut book = BudgetBook {
            budgets: budgets
                .into_iter()
                .map(Budget::normalized)
                .filter(|b| !is_builtin(&b.account) || b.account.eq_ignore_ascii_case(EVERYTHING_ELSE))
                .collect(),
        };
        if book.get(EVERYTHING_ELSE).is_none() {
            book.budgets
                .push(Budget::new(EVERYTHING_ELSE, Decimal::ZERO, Decimal::ZERO));
        }
        book
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn get(&self, account: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.account.eq_ignore_ascii_case(account))
    }

    fn get_mut(&mut self, account: &str) -> Option<&mut Budget> {
        self.budgets
            .iter_mut()
            .find(|b| b.account.eq_ignore_ascii_case(account))
    }

    pub fn add(&mut self, account: &str, target: Decimal) -> Result<&Budget, BudgetError> {
        let account = account.trim();
        if account.is_empty() {
            return Err(BudgetError::MissingAccount);
        }
        if is_builtin(account) {
            return Err(BudgetError::Reserved(account.to_string()));
        }
        if self.get(account).is_some() {
            return Err(BudgetError::Duplicate(account.to_string()));
        }
        debug!(account, %target, "adding budget");
        self.budgets.push(Budget::new(account, Decimal::ZERO, target));
        let last = self.budgets.len() - 1;
        Ok(&self.budgets[last])
    }

    /// Sets a target, clamping negatives to zero. The "everything else"
    /// entry may be updated; other `builtin:` names are rejected.
    pub fn update_target(&mut self, account: &str, target: Decimal) -> Result<Decimal, BudgetError> {
        if is_builtin(account) && !account.eq_ignore_ascii_case(EVERYTHING_ELSE) {
            return Err(BudgetError::Reserved(account.to_string()));
        }
        let budget = self
            .get_mut(account)
            .ok_or_else(|| BudgetError::NotFound(account.to_string()))?;
        budget.set_target(target);
        Ok(budget.budget)
    }

    pub fn increment(&mut self, account: &str) -> Result<Decimal, BudgetError> {
        let current = self.target_of(account)?;
        self.update_target(account, step_up(current))
    }

    pub fn decrement(&mut self, account: &str) -> Result<Decimal, BudgetError> {
        let current = self.target_of(account)?;
        self.update_target(account, step_down(current))
    }

    fn target_of(&self, account: &str) -> Result<Decimal, BudgetError> {
        self.get(account)
            .map(|b| b.budget)
            .ok_or_else(|| BudgetError::NotFound(account.to_string()))
    }

    pub fn remove(&mut self, account: &str) -> Result<Budget, BudgetError> {
        if is_builtin(account) {
            return Err(BudgetError::Reserved(account.to_string()));
        }
        let pos = self
            .budgets
            .iter()
            .position(|b| b.account.eq_ignore_ascii_case(account))
            .ok_or_else(|| BudgetError::NotFound(account.to_string()))?;
        Ok(self.budgets.remove(pos))
    }

    /// Fills in balances from per-account period activity: revenue
    /// balances are negated so earning reads positive, and "everything
    /// else" receives the leftover sum.
    pub fn apply_activity(&mut self, activity: &BTreeMap<String, Decimal>) {
        let leftover = everything_else_sum(&self.budgets, activity);
        for budget in &mut self.budgets {
            budget.balance = if budget.account.eq_ignore_ascii_case(EVERYTHING_ELSE) {
                leftover
            } else {
                let balance: Decimal = activity
                    .iter()
                    .filter(|(account, _)| covered_by(account, &budget.account))
                    .map(|(_, v)| *v)
                    .sum();
                if is_revenue(&budget.account) {
                    -balance
                } else {
                    balance
                }
            };
        }
    }

    /// Budgets in display order.
    pub fn sorted(&self) -> Vec<Budget> {
        let mut budgets = self.budgets.clone();
        sort_budgets(&mut budgets);
        budgets
    }
}
