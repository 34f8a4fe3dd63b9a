use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-account cumulative balances, one entry per period in `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountBalances {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub balances: Vec<Decimal>,
}

impl AccountBalances {
    pub fn new(account: &str, account_type: &str, balances: Vec<Decimal>) -> Self {
        AccountBalances {
            id: account.to_string(),
            account: account.to_string(),
            account_type: account_type.to_string(),
            balances,
        }
    }

    /// The account name, or its type when the name is empty.
    pub fn effective_name(&self) -> &str {
        if self.account.is_empty() {
            &self.account_type
        } else {
            &self.account
        }
    }
}

/// Response body of the balances endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalancesPayload {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub accounts: Vec<AccountBalances>,
}
