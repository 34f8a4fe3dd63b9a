use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Posting {
    #[serde(default)]
    pub account: String,
    pub currency: String,
    pub amount: Decimal,
}

impl Posting {
    pub fn new(account: &str, currency: &str, amount: Decimal) -> Self {
        Posting {
            account: account.to_string(),
            currency: currency.to_string(),
            amount,
        }
    }
}

/// A bank-feed transaction as delivered by the ledger API.
///
/// The first posting is the bank side (its amount is negative for money
/// leaving the account); the second posting carries the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    #[serde(default, rename = "ID", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub date: String,
    pub payee: String,
    pub postings: Vec<Posting>,
}

impl Transaction {
    pub fn new(date: &str, payee: &str, postings: Vec<Posting>) -> Self {
        Transaction {
            id: String::new(),
            date: date.to_string(),
            payee: payee.to_string(),
            postings,
        }
    }

    pub fn first_posting(&self) -> Option<&Posting> {
        self.postings.first()
    }

    /// Amount of the first posting, zero when there are no postings.
    pub fn amount(&self) -> Decimal {
        self.first_posting().map_or(Decimal::ZERO, |p| p.amount)
    }

    /// Category assigned through the second posting, if there is one.
    pub fn category(&self) -> Option<&str> {
        self.postings.get(1).map(|p| p.account.as_str())
    }

    /// Assigns `category` to the second posting. Returns false when the
    /// transaction has fewer than two postings.
    pub fn set_category(&mut self, category: &str) -> bool {
        match self.postings.get_mut(1) {
            Some(posting) => {
                posting.account = category.to_string();
                true
            }
            None => false,
        }
    }
}
