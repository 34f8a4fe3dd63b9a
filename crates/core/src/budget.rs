use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category;

/// A spending (or earning) target for one category over the current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Budget {
    pub account: String,
    /// Actual activity in the period.
    #[serde(default)]
    pub balance: Decimal,
    /// Target ceiling, never negative.
    #[serde(default)]
    pub budget: Decimal,
    #[serde(default)]
    pub description: String,
}

impl Budget {
    pub fn new(account: &str, balance: Decimal, budget: Decimal) -> Self {
        Budget {
            account: account.to_string(),
            balance,
            budget: budget.max(Decimal::ZERO),
            description: category::leaf(account).to_string(),
        }
    }

    /// Re-derives `description` from `account`; wire payloads may omit it.
    pub fn normalized(mut self) -> Self {
        self.description = category::leaf(&self.account).to_string();
        self.budget = self.budget.max(Decimal::ZERO);
        self
    }

    /// Updates the target, clamping negative values to zero.
    pub fn set_target(&mut self, target: Decimal) {
        self.budget = target.max(Decimal::ZERO);
    }

    /// A top-level rollup such as `revenues` has no separate leaf.
    pub fn is_rollup(&self) -> bool {
        self.description == self.account
    }
}
