//! User-facing notices derived from client errors

use crate::ClientError;

/// Whether a notice interrupts the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Must be acknowledged (modal alert, non-zero exit, ...)
    Blocking,
    /// Logged only
    Silent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Blocking,
            message: message.into(),
        }
    }

    pub fn silent(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Silent,
            message: message.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }

    /// Notice for a failed audience preview
    ///
    /// Connectivity hiccups stay silent so rule editing is never interrupted.
    pub fn for_preview(err: &ClientError) -> Self {
        match err {
            ClientError::Network(_) => Self::silent(format!("Audience preview unavailable: {err}")),
            ClientError::AuthRequired { .. } => Self::session_expired(),
            _ => Self::blocking("Failed to preview audience. Please try again."),
        }
    }

    /// Notice for any other user action, e.g. `for_action("create campaign", &err)`
    pub fn for_action(action: &str, err: &ClientError) -> Self {
        match err {
            ClientError::Validation(message) => Self::blocking(message.clone()),
            ClientError::AuthRequired { .. } => Self::session_expired(),
            _ => Self::blocking(format!("Failed to {action}. Please try again.")),
        }
    }

    fn session_expired() -> Self {
        Self::blocking("Your session has expired. Please sign in again.")
    }
}
