use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;
use sift_core::category::{top_level, BUILTIN};
use sift_core::Budget;

/// Slack allowed between spending and the elapsed part of the period
/// before a budget is flagged.
fn progress_tolerance() -> Decimal {
    Decimal::new(2, 2)
}

/// Revenues first, builtin last, everything else alphabetical in between.
fn prefix_key(account: &str) -> (u8, &str) {
    match top_level(account) {
        "revenues" => (0, ""),
        BUILTIN => (2, ""),
        other => (1, other),
    }
}

/// Display order for budgets. A total order: prefix group, then a bare
/// rollup before its leaves, then leaf name, then full account.
pub fn budget_order(a: &Budget, b: &Budget) -> Ordering {
    prefix_key(&a.account)
        .cmp(&prefix_key(&b.account))
        .then_with(|| b.is_rollup().cmp(&a.is_rollup()))
        .then_with(|| a.description.cmp(&b.description))
        .then_with(|| a.account.cmp(&b.account))
}

pub fn sort_budgets(budgets: &mut [Budget]) {
    budgets.sort_by(budget_order);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    OnBudget,
    OverBudget,
    Exceeded,
}

impl BudgetStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            BudgetStatus::OnBudget => "on-budget",
            BudgetStatus::OverBudget => "over-budget",
            BudgetStatus::Exceeded => "exceeded-budget",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Share of the target used, at most 1.
    pub percentage: Decimal,
    pub status: BudgetStatus,
    /// Spending is ahead of the calendar.
    pub over_progress: bool,
}

impl Progress {
    pub fn classify(balance: Decimal, budget: Decimal, time_progress: Decimal) -> Self {
        let percentage = if balance.is_zero() {
            Decimal::ZERO
        } else {
            match balance.checked_div(budget) {
                Some(ratio) => ratio.min(Decimal::ONE),
                None if balance > Decimal::ZERO => Decimal::ONE,
                None => Decimal::ZERO,
            }
        };
        let status = if balance > budget {
            BudgetStatus::Exceeded
        } else if percentage - progress_tolerance() > time_progress {
            BudgetStatus::OverBudget
        } else {
            BudgetStatus::OnBudget
        };
        Progress {
            percentage,
            status,
            over_progress: percentage > time_progress,
        }
    }

    pub fn of(budget: &Budget, time_progress: Decimal) -> Self {
        Progress::classify(budget.balance, budget.budget, time_progress)
    }

    /// e.g. `"on-budget over-progress"`.
    pub fn css_class(&self) -> String {
        let mut class = self.status.css_class().to_string();
        if self.over_progress {
            class.push_str(" over-progress");
        }
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn budget(account: &str) -> Budget {
        Budget::new(account, Decimal::ZERO, Decimal::ZERO)
    }

    fn accounts(budgets: &[Budget]) -> Vec<&str> {
        budgets.iter().map(|b| b.account.as_str()).collect()
    }

    #[test]
    fn revenues_first_builtin_last() {
        let expected = vec!["revenues:salary", "expenses:food", "builtin:everything else"];
        let orders = [
            ["expenses:food", "builtin:everything else", "revenues:salary"],
            ["builtin:everything else", "revenues:salary", "expenses:food"],
            ["revenues:salary", "expenses:food", "builtin:everything else"],
        ];
        for order in orders {
            let mut list: Vec<Budget> = order.iter().map(|a| budget(a)).collect();
            sort_budgets(&mut list);
            assert_eq!(accounts(&list), expected);
        }
    }

    #[test]
    fn rollup_before_leaves_then_by_leaf() {
        let mut list = vec![
            budget("expenses:shopping:zoo"),
            budget("expenses:car"),
            budget("expenses"),
            budget("uncategorized"),
            budget("expenses:food:apples"),
        ];
        sort_budgets(&mut list);
        assert_eq!(
            accounts(&list),
            vec![
                "expenses",
                "expenses:food:apples",
                "expenses:car",
                "expenses:shopping:zoo",
                "uncategorized"
            ]
        );
    }

    #[test]
    fn same_leaf_falls_back_to_account() {
        let mut list = vec![budget("expenses:b:gas"), budget("expenses:a:gas")];
        sort_budgets(&mut list);
        assert_eq!(accounts(&list), vec!["expenses:a:gas", "expenses:b:gas"]);
    }

    #[test]
    fn balance_equal_to_budget_is_on_budget() {
        let p = Progress::classify(dec!(100), dec!(100), dec!(1));
        assert_eq!(p.status, BudgetStatus::OnBudget);
        assert_eq!(p.percentage, Decimal::ONE);
    }

    #[test]
    fn one_cent_over_is_exceeded() {
        let p = Progress::classify(dec!(100.01), dec!(100), dec!(1));
        assert_eq!(p.status, BudgetStatus::Exceeded);
        assert_eq!(p.percentage, Decimal::ONE);
        assert_eq!(p.css_class(), "exceeded-budget");
    }

    #[test]
    fn ahead_of_calendar() {
        let p = Progress::classify(dec!(60), dec!(100), dec!(0.5));
        assert_eq!(p.status, BudgetStatus::OverBudget);
        assert_eq!(p.css_class(), "over-budget over-progress");

        let within_tolerance = Progress::classify(dec!(51), dec!(100), dec!(0.5));
        assert_eq!(within_tolerance.css_class(), "on-budget over-progress");

        let behind = Progress::classify(dec!(20), dec!(100), dec!(0.5));
        assert_eq!(behind.css_class(), "on-budget");
    }

    #[test]
    fn zero_budget() {
        assert_eq!(Progress::classify(dec!(0), dec!(0), dec!(0.5)).percentage, Decimal::ZERO);
        let spent = Progress::classify(dec!(5), dec!(0), dec!(0.5));
        assert_eq!(spent.percentage, Decimal::ONE);
        assert_eq!(spent.status, BudgetStatus::Exceeded);
    }

    fn account_name() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["revenues", "expenses", "builtin", "gifts", "uncategorized"]),
            proptest::collection::vec(prop::sample::select(vec!["a", "b", "gas"]), 0..3),
        )
            .prop_map(|(top, rest)| {
                let mut parts = vec![top.to_string()];
                parts.extend(rest.iter().map(|s| s.to_string()));
                parts.join(":")
            })
    }

    proptest! {
        #[test]
        fn order_is_total(a in account_name(), b in account_name(), c in account_name()) {
            let (a, b, c) = (budget(&a), budget(&b), budget(&c));
            prop_assert_eq!(budget_order(&a, &b), budget_order(&b, &a).reverse());
            prop_assert_eq!(budget_order(&a, &b) == Ordering::Equal, a.account == b.account);
            if budget_order(&a, &b) != Ordering::Greater && budget_order(&b, &c) != Ordering::Greater {
                prop_assert!(budget_order(&a, &c) != Ordering::Greater);
            }
        }

        #[test]
        fn sorting_ignores_input_order(
            names in proptest::collection::vec(account_name(), 0..10),
            seed in any::<u64>(),
        ) {
            let mut forward: Vec<Budget> = names.iter().map(|n| budget(n)).collect();
            let mut shuffled = forward.clone();
            shuffled.rotate_left(if names.is_empty() { 0 } else { (seed as usize) % names.len() });
            shuffled.reverse();
            sort_budgets(&mut forward);
            sort_budgets(&mut shuffled);
            prop_assert_eq!(forward, shuffled);
        }
    }
}
