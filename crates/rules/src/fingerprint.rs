use sift_core::Transaction;

/// Column names of a fingerprint, for showing users what a pattern sees.
pub const FINGERPRINT_HEADER: &str = "date, payee, currency, amount, balance";

/// Running balance placeholder; no rule depends on it yet.
const BALANCE_PLACEHOLDER: &str = "0";

/// The payee as it appears in a fingerprint, JSON-quoted.
pub fn quote_payee(payee: &str) -> String {
    serde_json::to_string(payee).unwrap_or_else(|_| format!("\"{payee}\""))
}

/// Canonical one-line form of a transaction that rule conditions are
/// matched against: `date,"payee",currency,amount,0`.
///
/// The payee is JSON-quoted so exact patterns can anchor on the quotes.
/// A transaction without postings yields empty currency and amount fields.
pub fn fingerprint(txn: &Transaction) -> String {
    let payee = quote_payee(&txn.payee);
    let (currency, amount) = match txn.first_posting() {
        Some(posting) => (posting.currency.as_str(), posting.amount.to_string()),
        None => ("", String::new()),
    };
    [
        txn.date.as_str(),
        payee.as_str(),
        currency,
        amount.as_str(),
        BALANCE_PLACEHOLDER,
    ]
    .join(",")
}
