//! # AppError
//!
//! Centralized error handling for the Rusty-Bazaar ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;
use uuid::Uuid;

/// The primary error type for all bz-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g., User, Advertisement)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., short password, negative price)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A message was sent without any text.
    #[error("message content is empty")]
    EmptyContent,

    /// The addressee of a message does not exist.
    #[error("recipient not found with ID {0}")]
    RecipientNotFound(Uuid),

    /// Missing, invalid or expired credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but acting on someone else's resource
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists (e.g., duplicate email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Reference data is unusable (e.g., rank table without a floor entry).
    /// Raised at startup, never per request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The store detected a conflicting concurrent write; safe to retry.
    #[error("concurrent update conflict: {0}")]
    Concurrency(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        AppError::NotFound(entity.to_string(), id.to_string())
    }

    /// Stable, machine-readable kind for structured error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(..) | AppError::RecipientNotFound(_) => "not_found",
            AppError::ValidationError(_) | AppError::EmptyContent => "validation",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Configuration(_) => "configuration",
            AppError::Concurrency(_) => "transient",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Concurrency(_))
    }
}

/// A specialized Result type for Rusty-Bazaar logic.
pub type Result<T> = std::result::Result<T, AppError>;
