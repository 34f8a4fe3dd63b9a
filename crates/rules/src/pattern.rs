//! Express rule patterns: a payee plus two independent choices, encoded as a
//! regular expression over a transaction fingerprint.

use serde::{Deserialize, Serialize};

use crate::fingerprint::quote_payee;

/// Unsigned decimal amount.
pub const AMOUNT_EXPR: &str = r"\d+(\.\d+)?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    /// Payee must equal the whole quoted payee field.
    Exact,
    /// Payee may appear anywhere in the fingerprint.
    Fuzzy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignFilter {
    /// Only negative amounts.
    Expenses,
    /// Only positive amounts.
    Revenues,
    Both,
}

impl SignFilter {
    pub const ALL: [SignFilter; 3] = [SignFilter::Both, SignFilter::Expenses, SignFilter::Revenues];
}

/// The flag form of the express choices, as recovered from a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressChoices {
    pub exact: bool,
    pub expenses: bool,
    pub revenues: bool,
}

impl ExpressChoices {
    pub fn new(precision: Precision, sign: SignFilter) -> Self {
        ExpressChoices {
            exact: precision == Precision::Exact,
            expenses: sign != SignFilter::Revenues,
            revenues: sign != SignFilter::Expenses,
        }
    }

    pub fn precision(self) -> Precision {
        if self.exact {
            Precision::Exact
        } else {
            Precision::Fuzzy
        }
    }

    pub fn sign(self) -> SignFilter {
        match (self.expenses, self.revenues) {
            (true, false) => SignFilter::Expenses,
            (false, true) => SignFilter::Revenues,
            _ => SignFilter::Both,
        }
    }
}

fn expenses_suffix() -> String {
    format!(".*,-{AMOUNT_EXPR},")
}

fn revenues_suffix() -> String {
    format!(".*,{AMOUNT_EXPR},")
}

/// Lower-cases characters with a one-char lowercase form. Others (like
/// `İ`) are kept, since conditions match case-insensitively anyway.
fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

/// Regex-escaped payee, written the way the fingerprint spells it:
/// JSON-escaped, without the surrounding quotes.
pub fn payee_regex(payee: &str) -> String {
    let quoted = quote_payee(payee);
    let inner = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(&quoted);
    regex::escape(&fold_case(inner))
}

pub fn synthesize(payee: &str, precision: Precision, sign: SignFilter) -> String {
    let mut pattern = payee_regex(payee);
    if precision == Precision::Exact {
        pattern = format!(",\"{pattern}\",");
    }
    match sign {
        SignFilter::Expenses => pattern.push_str(&expenses_suffix()),
        SignFilter::Revenues => pattern.push_str(&revenues_suffix()),
        SignFilter::Both => {}
    }
    pattern
}

pub fn synthesize_choices(payee: &str, choices: ExpressChoices) -> String {
    synthesize(payee, choices.precision(), choices.sign())
}

/// Recovers the express choices from a pattern built for `payee`.
///
/// Patterns that were not synthesized still yield choices; use
/// [`is_express`] to tell whether the pattern round-trips.
pub fn unmarshal(pattern: &str, payee: &str) -> ExpressChoices {
    let exact = pattern.starts_with(&format!(",\"{}\",", payee_regex(payee)));
    let (mut expenses, mut revenues) = (true, true);
    if pattern.contains(&expenses_suffix()) {
        revenues = false;
    } else if pattern.contains(&revenues_suffix()) {
        expenses = false;
    }
    ExpressChoices {
        exact,
        expenses,
        revenues,
    }
}

/// True when `pattern` is exactly what the express choices would produce.
pub fn is_express(pattern: &str, payee: &str) -> bool {
    pattern == synthesize_choices(payee, unmarshal(pattern, payee))
}
