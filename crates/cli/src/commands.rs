use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sift_budget::{activity_chart, chart_rows, BudgetBook, CategoryAggregator, Progress};
use sift_core::category::render;
use sift_core::{BalancesPayload, BatchOutcome, Budget, DateRange, Money, Transaction};
use sift_rules::{load_rules, save_rules, RuleStore};
use tracing::info;

use crate::config::Config;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn rules_store(config: &Config, rules: Option<&Path>) -> Result<RuleStore> {
    let path = rules
        .or(config.rules.as_deref())
        .context("No rules file given; pass --rules or set `rules` in sift.toml")?;
    load_rules(path).with_context(|| format!("Failed to load rules from {}", path.display()))
}

/// Applies the rules to every transaction and returns them as JSON.
pub fn categorize(store: &RuleStore, mut transactions: Vec<Transaction>) -> Result<String> {
    let matcher = store.matcher();
    let mut matched = 0;
    for txn in &mut transactions {
        if matcher.categorize(txn).is_some() {
            matched += 1;
        }
    }
    info!(matched, total = transactions.len(), "categorized transactions");
    Ok(serde_json::to_string_pretty(&transactions)?)
}

/// Appends every rule from `source` to `target`, itemizing rules that
/// could not be added.
pub fn merge_rules(target: &mut RuleStore, source: &RuleStore) -> BatchOutcome<usize> {
    let mut outcome = BatchOutcome::new();
    for rule in source.rules() {
        let result = target.append(&rule.conditions, &rule.account2).map(|_| ());
        outcome.record(rule.index, result);
    }
    outcome
}

pub fn merge_rules_file(target_path: &Path, source_path: &Path) -> Result<BatchOutcome<usize>> {
    let mut target = load_rules(target_path)
        .with_context(|| format!("Failed to load rules from {}", target_path.display()))?;
    let source = load_rules(source_path)
        .with_context(|| format!("Failed to load rules from {}", source_path.display()))?;
    let outcome = merge_rules(&mut target, &source);
    save_rules(target_path, &target)
        .with_context(|| format!("Failed to save rules to {}", target_path.display()))?;
    Ok(outcome)
}

/// Monthly activity table: one column per bucket, one row per month.
pub fn expenses_table(config: &Config, payload: &BalancesPayload) -> Result<String> {
    let aggregator = CategoryAggregator::new(config.bucket_target);
    let buckets = activity_chart(&aggregator, &payload.accounts)?;
    let range = DateRange::new(payload.start.date_naive(), payload.end.date_naive());
    let rows = chart_rows(range, &buckets);

    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("No data\n");
        return Ok(out);
    }
    out.push_str("Month");
    for bucket in &buckets {
        write!(out, "\t{}", render(&bucket.name))?;
    }
    out.push('\n');
    for row in rows {
        out.push_str(&row.label);
        for (_, value) in &row.values {
            write!(out, "\t{}", Money::from_decimal(*value).format_with(&config.currency_symbol))?;
        }
        out.push('\n');
    }
    Ok(out)
}

/// Budget report for the month containing `today`.
pub fn budget_report(
    config: &Config,
    budgets: Vec<Budget>,
    activity: &BTreeMap<String, Decimal>,
    today: NaiveDate,
) -> Result<String> {
    let mut book = BudgetBook::new(budgets);
    book.apply_activity(activity);
    let month = DateRange::month_of(today);
    let time_progress = month.time_progress(today.and_time(chrono::NaiveTime::MIN));

    let symbol = config.currency_symbol.as_str();
    let mut out = String::new();
    writeln!(out, "{month}")?;
    for budget in book.sorted() {
        let progress = Progress::of(&budget, time_progress);
        writeln!(
            out,
            "{}\t{} / {}\t{}",
            render(&budget.account),
            Money::from_decimal(budget.balance).format_with(symbol),
            Money::from_decimal(budget.budget).format_with(symbol),
            progress.css_class(),
        )?;
    }
    Ok(out)
}
