use serde::{Deserialize, Serialize};

/// A categorization rule: if any condition matches a transaction's
/// fingerprint, the transaction is assigned `account2`.
///
/// `index` is the rule's 1-based position in its store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, rename = "Account2")]
    pub account2: String,
}

impl Rule {
    pub fn new(index: usize, conditions: Vec<String>, account2: &str) -> Self {
        Rule {
            index,
            conditions,
            account2: account2.to_string(),
        }
    }

    /// A rule with neither conditions nor a category marks a row for removal.
    pub fn is_deletion_sentinel(&self) -> bool {
        self.conditions.is_empty() && self.account2.is_empty()
    }
}

/// Trims conditions and drops blank ones.
pub fn clean_conditions<I, S>(conditions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    conditions
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_requires_both_fields_empty() {
        assert!(Rule::new(1, vec![], "").is_deletion_sentinel());
        assert!(!Rule::new(1, vec![], "expenses:food").is_deletion_sentinel());
        assert!(!Rule::new(1, vec!["food".into()], "").is_deletion_sentinel());
    }

    #[test]
    fn clean_conditions_trims_and_drops_blanks() {
        let cleaned = clean_conditions(["  coffee ", "", "   ", "bagels"]);
        assert_eq!(cleaned, vec!["coffee", "bagels"]);
    }

    #[test]
    fn wire_shape_round_trips() {
        let json = r#"{"Index":2,"Conditions":["food"],"Account2":"expenses:food"}"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule, Rule::new(2, vec!["food".into()], "expenses:food"));
        assert_eq!(serde_json::to_string(&rule).unwrap(), json);
    }
}
