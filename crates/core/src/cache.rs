//! Fetch-once category list, shared by every picker that needs it.

use tracing::debug;

use crate::category;
use crate::error::ApiError;

/// Where the category list comes from (normally the ledger API).
pub trait CategorySource {
    fn fetch_categories(&self) -> Result<Vec<String>, ApiError>;
}

impl<F> CategorySource for F
where
    F: Fn() -> Result<Vec<String>, ApiError>,
{
    fn fetch_categories(&self) -> Result<Vec<String>, ApiError> {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub display: String,
}

/// Caches the category list until [`CategoryCache::invalidate`] is called.
/// Writers that add categories (new rules, new budgets) invalidate it.
pub struct CategoryCache<S: CategorySource> {
    source: S,
    entries: Option<Vec<CategoryEntry>>,
}

impl<S: CategorySource> CategoryCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: None,
        }
    }

    pub fn get(&mut self) -> Result<&[CategoryEntry], ApiError> {
        if self.entries.is_none() {
            let names = self.source.fetch_categories()?;
            debug!(count = names.len(), "loaded categories");
            self.entries = Some(
                names
                    .into_iter()
                    .map(|name| CategoryEntry {
                        display: category::render(&name),
                        name,
                    })
                    .collect(),
            );
        }
        Ok(self.entries.as_deref().unwrap_or_default())
    }

    pub fn invalidate(&mut self) {
        self.entries = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fetches_once_until_invalidated() {
        let calls = Cell::new(0);
        let source = || {
            calls.set(calls.get() + 1);
            Ok::<_, ApiError>(vec!["expenses:car:gas".to_string(), "revenues".to_string()])
        };
        let mut cache = CategoryCache::new(source);
        assert!(!cache.is_loaded());

        let entries = cache.get().unwrap();
        assert_eq!(entries[0].display, "expenses > car > gas");
        cache.get().unwrap();
        assert_eq!(calls.get(), 1);

        cache.invalidate();
        cache.get().unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let calls = Cell::new(0);
        let source = || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(ApiError::Rejected {
                    status: 503,
                    message: "busy".to_string(),
                })
            } else {
                Ok(vec!["expenses".to_string()])
            }
        };
        let mut cache = CategoryCache::new(source);
        assert!(cache.get().is_err());
        assert_eq!(cache.get().unwrap().len(), 1);
    }
}
