//! # DraftError
//!
//! Centralized error handling for the Draftroom pipeline.
//! Maps save/submission failures to actionable error types.

use crate::models::DraftId;
use crate::status::Status;
use thiserror::Error;

/// The primary error type for all pipeline operations.
#[derive(Error, Debug)]
pub enum DraftError {
    /// Identity could not be resolved; nothing may be persisted.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The recorded author differs from the caller.
    #[error("permission denied: draft belongs to another author")]
    PermissionDenied,

    /// Required fields missing or invalid; carries the offending fields.
    #[error("validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    /// Unique-constraint violation on a generated slug.
    #[error("slug already in use: {0}")]
    DuplicateSlug(String),

    /// Infrastructure failure (backend down, network error).
    #[error("persistence failure: {0}")]
    Persistence(#[from] anyhow::Error),

    /// Mutex rejection; absorbed locally and never shown to the user.
    #[error("operation already in progress")]
    AlreadyInProgress,

    /// A transition outside the allowed lifecycle table.
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition { from: Status, to: Status },

    /// A status value outside the closed set. Downstream consumers must
    /// treat this as an error state, not fall back to a default.
    #[error("unrecognized status value: {0}")]
    UnknownStatus(String),

    /// Record missing from the store.
    #[error("draft not found with ID {0}")]
    NotFound(DraftId),
}

/// A specialized Result type for Draftroom logic.
pub type Result<T> = std::result::Result<T, DraftError>;
