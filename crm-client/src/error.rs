//! Client error types

use shared::RuleError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local pre-flight check failed; never reaches the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session missing or expired (401, a redirect to the login page, or a
    /// 404 on a session-bound flow)
    #[error("Authentication required (HTTP {status})")]
    AuthRequired { status: u16 },

    /// Transport failure, no response received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response with a body
    #[error("Remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// Rule editing error (out-of-range index and friends)
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// 2xx response whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_invalid_index(&self) -> bool {
        matches!(self, Self::Rule(RuleError::InvalidIndex { .. }))
    }

    /// Reinterpret a 404 as a lost session
    ///
    /// Unauthenticated API calls are answered with a login redirect that
    /// lands on a page the API prefix does not serve, so preview and
    /// campaign creation see a 404 where they would expect a 401.
    pub fn for_session_flow(self) -> Self {
        match self {
            Self::Remote { status: 404, .. } => Self::AuthRequired { status: 404 },
            other => other,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_flow_upgrades_not_found() {
        let err = ClientError::Remote {
            status: 404,
            message: "Cannot GET /login".into(),
        };
        assert!(err.for_session_flow().is_auth_required());

        let err = ClientError::Remote {
            status: 500,
            message: "boom".into(),
        };
        assert!(matches!(err.for_session_flow(), ClientError::Remote { status: 500, .. }));

        let err = ClientError::Network("connection refused".into());
        assert!(err.for_session_flow().is_network());
    }

    #[test]
    fn test_rule_error_conversion() {
        let err: ClientError = RuleError::InvalidIndex { index: 3, len: 1 }.into();
        assert!(err.is_invalid_index());
        assert_eq!(err.to_string(), "Invalid rule index 3 (audience has 1 rules)");
    }
}
