use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sift_core::period::month_label;
use sift_core::{AccountBalances, DateRange};

use crate::aggregate::{AggregateError, Bucket, CategoryAggregator};

/// Orders buckets by the absolute size of their total activity, largest
/// first. Ties keep their existing order.
pub fn rank_by_activity(mut buckets: Vec<Bucket>) -> Vec<Bucket> {
    buckets.sort_by(|a, b| b.total().abs().cmp(&a.total().abs()));
    buckets
}

/// The only supported presentation pipeline: aggregate, then per-period
/// deltas, then sign flip, then ranking.
pub fn activity_chart(
    aggregator: &CategoryAggregator,
    accounts: &[AccountBalances],
) -> Result<Vec<Bucket>, AggregateError> {
    let buckets = aggregator
        .aggregate(accounts)?
        .into_iter()
        .map(|b| b.remove_cumulative().negate())
        .collect();
    Ok(rank_by_activity(buckets))
}

/// One month of a stacked chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChartRow {
    pub month: NaiveDate,
    pub label: String,
    pub values: Vec<(String, Decimal)>,
}

/// Lays bucket series out by month across `range` (end exclusive). Periods
/// past the end of a series read as zero.
pub fn chart_rows(range: DateRange, buckets: &[Bucket]) -> Vec<ChartRow> {
    if buckets.is_empty() || range.end <= range.start {
        return Vec::new();
    }
    range
        .month_starts()
        .into_iter()
        .enumerate()
        .map(|(i, month)| ChartRow {
            month,
            label: month_label(month),
            values: buckets
                .iter()
                .map(|b| {
                    let value = b.balances.get(i).copied().unwrap_or_default();
                    (b.name.clone(), value)
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bucket(name: &str, balances: Vec<Decimal>) -> Bucket {
        Bucket {
            name: name.into(),
            balances,
        }
    }

    #[test]
    fn ranks_by_absolute_total() {
        let ranked = rank_by_activity(vec![
            bucket("a", vec![dec!(5)]),
            bucket("b", vec![dec!(-50)]),
            bucket("c", vec![dec!(20)]),
            bucket("d", vec![dec!(-5)]),
        ]);
        let names: Vec<&str> = ranked.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn pipeline_produces_positive_spending() {
        let accounts = vec![
            AccountBalances::new("expenses:food", "expenses", vec![dec!(-100), dec!(-150), dec!(-120)]),
            AccountBalances::new("expenses:rent", "expenses", vec![dec!(-1000), dec!(-2000), dec!(-3000)]),
        ];
        let chart = activity_chart(&CategoryAggregator::default(), &accounts).unwrap();
        assert_eq!(chart[0].name, "expenses:rent");
        assert_eq!(chart[1].balances, vec![dec!(100), dec!(50), dec!(-30)]);
    }

    #[test]
    fn one_row_per_month() {
        let range = DateRange::new(date(2020, 1, 15), date(2020, 3, 1));
        let rows = chart_rows(range, &[bucket("expenses", vec![dec!(1), dec!(2)])]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "January 2020");
        assert_eq!(rows[1].month, date(2020, 2, 1));
        assert_eq!(rows[1].values, vec![("expenses".to_string(), dec!(2))]);
    }

    #[test]
    fn short_series_read_as_zero() {
        let range = DateRange::new(date(2020, 1, 1), date(2020, 4, 1));
        let rows = chart_rows(range, &[bucket("x", vec![dec!(7)])]);
        assert_eq!(rows[2].values[0].1, Decimal::ZERO);
    }

    #[test]
    fn empty_or_inverted_range_has_no_rows() {
        let range = DateRange::new(date(2020, 3, 1), date(2020, 1, 1));
        assert!(chart_rows(range, &[bucket("x", vec![])]).is_empty());
        let range = DateRange::new(date(2020, 1, 1), date(2020, 3, 1));
        assert!(chart_rows(range, &[]).is_empty());
    }
}
