pub mod editor;
pub mod file;
pub mod fingerprint;
pub mod hledger;
pub mod matcher;
pub mod pattern;
pub mod store;
pub mod validate;

pub use editor::{EditorMode, RuleChange, RuleEditor};
pub use file::{load_rules, save_rules, RulesFileError, RulesFormat};
pub use fingerprint::{fingerprint, FINGERPRINT_HEADER};
pub use hledger::{format_hledger_rules, parse_hledger_rules, HledgerError};
pub use matcher::RuleMatcher;
pub use pattern::{ExpressChoices, Precision, SignFilter};
pub use store::{renumber, EditOutcome, RuleError, RuleStore};
pub use validate::ValidationError;
