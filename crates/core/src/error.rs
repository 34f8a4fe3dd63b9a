use serde::Serialize;
use thiserror::Error;

/// Failure reported by the backing store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The store described the problem; the user can fix the input and retry.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The failure body did not carry an error description. Callers must
    /// propagate this to the top-level handler.
    #[error("Unexpected response from server (status {status}): {body}")]
    Unrecoverable { status: u16, body: String },
}

impl ApiError {
    /// Interprets a failure response body of the form `{"Error": "..."}`.
    pub fn from_failure_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("Error").and_then(|e| e.as_str()).map(str::to_string));
        match message {
            Some(message) => ApiError::Rejected { status, message },
            None => ApiError::Unrecoverable {
                status,
                body: body.to_string(),
            },
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}

/// Per-entity results of a bulk operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome<K> {
    pub items: Vec<(K, Result<(), String>)>,
}

impl<K> Default for BatchOutcome<K> {
    fn default() -> Self {
        BatchOutcome { items: Vec::new() }
    }
}

impl<K> BatchOutcome<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<E: std::fmt::Display>(&mut self, key: K, result: Result<(), E>) {
        self.items.push((key, result.map_err(|e| e.to_string())));
    }

    pub fn applied(&self) -> impl Iterator<Item = &K> {
        self.items.iter().filter(|(_, r)| r.is_ok()).map(|(k, _)| k)
    }

    pub fn failed(&self) -> impl Iterator<Item = (&K, &str)> {
        self.items
            .iter()
            .filter_map(|(k, r)| r.as_ref().err().map(|e| (k, e.as_str())))
    }

    pub fn is_complete_success(&self) -> bool {
        self.items.iter().all(|(_, r)| r.is_ok())
    }
}
