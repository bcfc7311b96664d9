//! Error types for the shared data model
//!
//! Only local, pure failures live here. Transport and remote failures are
//! classified by the client crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rule editing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Rule position outside the current sequence
    #[error("Invalid rule index {index} (audience has {len} rules)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Unknown rule field: {0}")]
    UnknownField(String),

    #[error("Unknown rule operator: {0}")]
    UnknownOperator(String),
}

pub type RuleResult<T> = Result<T, RuleError>;

/// Error body returned by the CRM API on non-2xx responses
///
/// The backend is not consistent about the key, so both `message` and
/// `error` are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RemoteErrorBody {
    /// Best human-readable message from a raw response body
    pub fn extract(raw: &str) -> String {
        serde_json::from_str::<RemoteErrorBody>(raw)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| raw.trim().to_string())
    }
}
