use rust_decimal::Decimal;

use crate::aggregate::Bucket;

/// Turns running balances into per-period activity.
pub fn remove_cumulative(series: &[Decimal]) -> Vec<Decimal> {
    let mut previous = Decimal::ZERO;
    series
        .iter()
        .map(|&balance| {
            let delta = balance - previous;
            previous = balance;
            delta
        })
        .collect()
}

/// Expense and revenue accounts carry the opposite sign of how they are
/// shown, so charts flip them.
pub fn negate(series: &[Decimal]) -> Vec<Decimal> {
    series.iter().map(|v| -*v).collect()
}

impl Bucket {
    pub fn remove_cumulative(self) -> Self {
        Bucket {
            balances: remove_cumulative(&self.balances),
            name: self.name,
        }
    }

    pub fn negate(self) -> Self {
        Bucket {
            balances: negate(&self.balances),
            name: self.name,
        }
    }
}
