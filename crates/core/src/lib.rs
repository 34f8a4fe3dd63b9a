pub mod balance;
pub mod budget;
pub mod cache;
pub mod category;
pub mod connect;
pub mod error;
pub mod money;
pub mod period;
pub mod rule;
pub mod transaction;

pub use balance::{AccountBalances, BalancesPayload};
pub use budget::Budget;
pub use cache::{CategoryCache, CategoryEntry, CategorySource};
pub use category::{CategoryError, CategoryKind};
pub use connect::{AccountEditor, DirectConnectConfig, Driver, WebConnectConfig};
pub use error::{ApiError, BatchOutcome};
pub use money::Money;
pub use period::DateRange;
pub use rule::Rule;
pub use transaction::{Posting, Transaction};
