use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// "January 2020"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// A span of calendar dates. `contains` and `month_of` treat `end` as the
/// last day in the range; `month_starts` stops before `end`, the way a
/// balances payload's end is the first day after its last month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        DateRange::new(first_of_month(date), last_of_month(date))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// First day of every month from `start`'s month while before `end`.
    pub fn month_starts(self) -> Vec<NaiveDate> {
        let mut months = Vec::new();
        let mut current = first_of_month(self.start);
        while current < self.end {
            months.push(current);
            match current.checked_add_months(Months::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        months
    }

    /// Fraction of the period elapsed at `now`, clamped to `[0, 1]`.
    ///
    /// Both ends are taken at midnight, matching how the budget screen
    /// measures a month (first day to last day).
    pub fn time_progress(self, now: NaiveDateTime) -> Decimal {
        let start = self.start.and_time(NaiveTime::MIN);
        let end = self.end.and_time(NaiveTime::MIN);
        let total = (end - start).num_seconds();
        if total <= 0 {
            return Decimal::ONE;
        }
        let elapsed = (now - start).num_seconds();
        (Decimal::from(elapsed) / Decimal::from(total)).clamp(Decimal::ZERO, Decimal::ONE)
    }
}
