//! hledger CSV rules text: one `if` block per rule, one condition per
//! line, then indented `key value` lines.
//!
//! ```text
//! if
//! star bucks
//! dunkin
//!   account2 expenses:food
//! ```

use sift_core::rule::clean_conditions;
use sift_core::Rule;
use thiserror::Error;
use tracing::debug;

use crate::store::renumber;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HledgerError {
    #[error("line {line}: rule block has no conditions")]
    NoConditions { line: usize },
    #[error("line {line}: rule block has no expressions")]
    NoExpressions { line: usize },
    #[error("line {line}: expected key and value, got '{text}'")]
    MissingValue { line: usize, text: String },
    #[error("line {line}: unrecognized rule key '{key}'")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: condition after expressions; start a new block with 'if'")]
    ConditionAfterExpression { line: usize },
}

#[derive(Default)]
struct Block {
    start: usize,
    conditions: Vec<String>,
    account2: Option<String>,
    has_expressions: bool,
}

impl Block {
    fn finish(self, rules: &mut Vec<Rule>) -> Result<(), HledgerError> {
        let conditions = clean_conditions(self.conditions);
        if conditions.is_empty() {
            return Err(HledgerError::NoConditions { line: self.start });
        }
        if !self.has_expressions {
            return Err(HledgerError::NoExpressions { line: self.start });
        }
        rules.push(Rule::new(0, conditions, &self.account2.unwrap_or_default()));
        Ok(())
    }

    fn expression(&mut self, line_no: usize, line: &str) -> Result<(), HledgerError> {
        if clean_conditions(&self.conditions).is_empty() {
            return Err(HledgerError::NoConditions { line: self.start });
        }
        self.has_expressions = true;
        let trimmed = line.trim();
        let (key, value) = match trimmed.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (trimmed, ""),
        };
        match key {
            // A bare `account2` is a rule that has not been given a category.
            "account2" => self.account2 = Some(value.to_string()),
            _ if value.is_empty() => {
                return Err(HledgerError::MissingValue {
                    line: line_no,
                    text: trimmed.to_string(),
                })
            }
            "account1" | "comment" => debug!(line = line_no, key, value, "ignoring rule key"),
            other => {
                return Err(HledgerError::UnknownKey {
                    line: line_no,
                    key: other.to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Parses rules text; rules are numbered in file order.
///
/// An `if` line opens a block only once the current block has
/// expressions; before that it is read as another condition, so a
/// condition may itself start with `if `.
pub fn parse_hledger_rules(text: &str) -> Result<Vec<Rule>, HledgerError> {
    let mut rules = Vec::new();
    let mut block: Option<Block> = None;

    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        if line.trim().is_empty() {
            continue;
        }
        let indented = line.starts_with(' ') || line.starts_with('\t');
        if line == "if" || line.starts_with("if ") {
            if block.as_ref().is_some_and(|b| b.has_expressions) {
                if let Some(done) = block.take() {
                    done.finish(&mut rules)?;
                }
            }
            match block.as_mut() {
                Some(current) => current.conditions.push(line.to_string()),
                None => {
                    block = Some(Block {
                        start: line_no,
                        conditions: vec![line["if".len()..].to_string()],
                        ..Block::default()
                    })
                }
            }
            continue;
        }
        let Some(current) = block.as_mut() else {
            return Err(HledgerError::NoConditions { line: line_no });
        };
        if indented {
            current.expression(line_no, line)?;
        } else if current.has_expressions {
            return Err(HledgerError::ConditionAfterExpression { line: line_no });
        } else {
            current.conditions.push(line.to_string());
        }
    }
    if let Some(done) = block.take() {
        done.finish(&mut rules)?;
    }
    Ok(renumber(rules))
}

/// Writes one block per rule. Rules without conditions never match and
/// have no block form, so they are left out.
pub fn format_hledger_rules(rules: &[Rule]) -> String {
    let mut out = String::new();
    for rule in rules.iter().filter(|r| !r.conditions.is_empty()) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("if\n");
        for cond in &rule.conditions {
            out.push_str(cond);
            out.push('\n');
        }
        out.push_str("  account2");
        if !rule.account2.is_empty() {
            out.push(' ');
            out.push_str(&rule.account2);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "if\nstar bucks\ndunkin\n  account2 expenses:food\n\nif payroll\n  account2 revenues:salary\n";

    #[test]
    fn parses_blocks() {
        let rules = parse_hledger_rules(TEXT).unwrap();
        assert_eq!(
            rules,
            vec![
                Rule::new(1, vec!["star bucks".into(), "dunkin".into()], "expenses:food"),
                Rule::new(2, vec!["payroll".into()], "revenues:salary"),
            ]
        );
    }

    #[test]
    fn format_then_parse_keeps_rules() {
        let rules = parse_hledger_rules(TEXT).unwrap();
        let text = format_hledger_rules(&rules);
        assert!(text.starts_with("if\nstar bucks\ndunkin\n  account2 expenses:food\n\nif\n"));
        assert_eq!(parse_hledger_rules(&text).unwrap(), rules);
    }

    #[test]
    fn rejects_unknown_key() {
        let err = parse_hledger_rules("if\ncoffee\n  memo hi\n").unwrap_err();
        assert_eq!(
            err,
            HledgerError::UnknownKey {
                line: 3,
                key: "memo".into()
            }
        );
    }

    #[test]
    fn account1_and_comment_are_skipped() {
        let text = "if\ncoffee\n  account1 assets:checking\n  account2 expenses:food\n  comment latte\n";
        assert_eq!(
            parse_hledger_rules(text).unwrap(),
            vec![Rule::new(1, vec!["coffee".into()], "expenses:food")]
        );
    }

    #[test]
    fn rejects_block_without_conditions() {
        let err = parse_hledger_rules("if\n  account2 expenses:food\n").unwrap_err();
        assert_eq!(err, HledgerError::NoConditions { line: 1 });
    }

    #[test]
    fn rejects_block_without_expressions() {
        let err = parse_hledger_rules("if coffee\ntea\n").unwrap_err();
        assert_eq!(err, HledgerError::NoExpressions { line: 1 });
    }

    #[test]
    fn if_before_expressions_is_a_condition() {
        let rules = parse_hledger_rules("if coffee\nif tea\n  account2 expenses:drinks\n").unwrap();
        assert_eq!(
            rules,
            vec![Rule::new(1, vec!["coffee".into(), "if tea".into()], "expenses:drinks")]
        );
    }

    #[test]
    fn conditions_starting_with_if_round_trip() {
        let rules = vec![
            Rule::new(1, vec!["if fee".into(), "bank".into()], "expenses:fees"),
            Rule::new(2, vec!["if".into()], "expenses:misc"),
        ];
        let text = format_hledger_rules(&rules);
        assert_eq!(parse_hledger_rules(&text).unwrap(), rules);
    }

    #[test]
    fn rule_without_category_round_trips() {
        let rules = vec![
            Rule::new(1, vec!["coffee".into()], ""),
            Rule::new(2, vec!["tea".into()], "expenses:drinks"),
        ];
        let text = format_hledger_rules(&rules);
        assert_eq!(text, "if\ncoffee\n  account2\n\nif\ntea\n  account2 expenses:drinks\n");
        assert_eq!(parse_hledger_rules(&text).unwrap(), rules);
    }

    #[test]
    fn rules_without_conditions_are_not_written() {
        let rules = vec![
            Rule::new(1, vec![], "expenses:misc"),
            Rule::new(2, vec!["tea".into()], "expenses:drinks"),
        ];
        assert_eq!(format_hledger_rules(&rules), "if\ntea\n  account2 expenses:drinks\n");
    }

    #[test]
    fn rejects_condition_after_expressions() {
        assert_eq!(
            parse_hledger_rules("if\ncoffee\n  account2 expenses:food\ntea\n"),
            Err(HledgerError::ConditionAfterExpression { line: 4 })
        );
    }

    #[test]
    fn rejects_key_without_value() {
        assert!(matches!(
            parse_hledger_rules("if coffee\n  comment\n"),
            Err(HledgerError::MissingValue { line: 2, .. })
        ));
    }

    #[test]
    fn empty_text_has_no_rules() {
        assert_eq!(parse_hledger_rules("\n\n").unwrap(), vec![]);
    }
}
