//! Collapses many hierarchical categories into a bounded set of buckets for
//! charting, summing the series of every category a bucket covers.

use rust_decimal::Decimal;
use serde::Serialize;
use sift_core::category::{top_level, SEPARATOR};
use sift_core::AccountBalances;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BUCKET_TARGET: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Series for '{name}' has {found} periods, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// One chart line: a category (or group of categories) and its series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    pub name: String,
    pub balances: Vec<Decimal>,
}

impl Bucket {
    pub fn total(&self) -> Decimal {
        self.balances.iter().copied().sum()
    }
}

fn is_within(name: &str, bucket: &str) -> bool {
    name == bucket
        || (name.len() > bucket.len()
            && name.starts_with(bucket)
            && name[bucket.len()..].starts_with(SEPARATOR))
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryAggregator {
    target: usize,
}

impl Default for CategoryAggregator {
    fn default() -> Self {
        CategoryAggregator::new(DEFAULT_BUCKET_TARGET)
    }
}

impl CategoryAggregator {
    pub fn new(target: usize) -> Self {
        CategoryAggregator { target }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Chooses bucket names for `names`, in a deterministic order.
    ///
    /// Starts from the distinct top-level components, then repeatedly
    /// replaces the first bucket whose unseen descendants still fit within
    /// the target with all of those descendants. A bucket that is itself
    /// one of `names` stays in place ahead of its descendants.
    pub fn bucket_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let mut inputs: Vec<String> = Vec::new();
        let mut buckets: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            push_unique(&mut inputs, name);
            push_unique(&mut buckets, top_level(name));
        }

        while buckets.len() < self.target {
            let mut expanded = false;
            for i in 0..buckets.len() {
                let bucket = &buckets[i];
                let children: Vec<String> = inputs
                    .iter()
                    .filter(|n| n.as_str() != bucket.as_str() && is_within(n, bucket))
                    .filter(|n| !buckets.contains(n))
                    .cloned()
                    .collect();
                if children.is_empty() {
                    continue;
                }
                let keep = inputs.contains(bucket);
                let new_len = buckets.len() - 1 + children.len() + usize::from(keep);
                if new_len > self.target {
                    continue;
                }
                debug!(bucket = %bucket, children = children.len(), "expanding bucket");
                let mut replacement = Vec::with_capacity(children.len() + 1);
                if keep {
                    replacement.push(bucket.clone());
                }
                replacement.extend(children);
                buckets.splice(i..=i, replacement);
                expanded = true;
                break;
            }
            if !expanded {
                break;
            }
        }
        buckets
    }

    /// Groups `accounts` into buckets and sums their series elementwise.
    ///
    /// Every account lands in exactly one bucket, the most specific one
    /// covering its name, so per-period totals are preserved.
    pub fn aggregate(&self, accounts: &[AccountBalances]) -> Result<Vec<Bucket>, AggregateError> {
        let Some(first) = accounts.first() else {
            return Ok(Vec::new());
        };
        let periods = first.balances.len();
        for account in accounts {
            if account.balances.len() != periods {
                return Err(AggregateError::LengthMismatch {
                    name: account.effective_name().to_string(),
                    expected: periods,
                    found: account.balances.len(),
                });
            }
        }

        let names: Vec<&str> = accounts.iter().map(|a| a.effective_name()).collect();
        let mut buckets: Vec<Bucket> = self
            .bucket_names(&names)
            .into_iter()
            .map(|name| Bucket {
                name,
                balances: vec![Decimal::ZERO; periods],
            })
            .collect();

        for account in accounts {
            let name = account.effective_name();
            let target = buckets
                .iter_mut()
                .filter(|b| is_within(name, &b.name))
                .max_by_key(|b| b.name.len());
            match target {
                Some(bucket) => {
                    for (sum, value) in bucket.balances.iter_mut().zip(&account.balances) {
                        *sum += *value;
                    }
                }
                None => warn!(account = name, "no bucket covers account"),
            }
        }
        Ok(buckets)
    }
}
