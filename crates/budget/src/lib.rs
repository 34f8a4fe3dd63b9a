pub mod aggregate;
pub mod book;
pub mod chart;
pub mod ranking;
pub mod series;

pub use aggregate::{AggregateError, Bucket, CategoryAggregator, DEFAULT_BUCKET_TARGET};
pub use book::{everything_else_sum, leftover_accounts, BudgetBook, BudgetError};
pub use chart::{activity_chart, chart_rows, rank_by_activity, ChartRow};
pub use ranking::{budget_order, sort_budgets, BudgetStatus, Progress};
pub use series::{negate, remove_cumulative};
