//! Request error taxonomy shared by every operation and transport.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Malformed, missing or ill-formatted input.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule would be violated.
    #[error("{0}")]
    Conflict(String),

    /// A referenced entity is absent. Operations decide whether that is a
    /// bad reference (400) or a missing target (404).
    #[error("{message}")]
    NotFound { message: String, status_code: u16 },

    /// The target exists but belongs to another organization.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unexpected(String),
}

impl RequestError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Missing entity referenced from the request body.
    pub fn missing_reference(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            status_code: 400,
        }
    }

    /// Missing entity targeted by the request.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            status_code: 404,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::NotFound { status_code, .. } => *status_code,
            Self::Forbidden(_) => 403,
            Self::Unexpected(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::Unexpected(_) => "unexpected_error",
        }
    }

    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Unexpected(_))
    }
}
