//! Service Layer Error Types
//!
//! Umbrella error for the entity and association services, chaining the
//! lower layers via `#[from]` and adding the kinds only the service layer
//! can detect (unknown owner/attachable kinds).

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::tree::TreeError;
use thiserror::Error;

/// Service operation errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Entity not found by id
    #[error("Entity not found: {id}")]
    NotFound { id: String },

    /// Field-level validation failed; nothing was mutated
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Structural tree operation failed
    #[error("Tree operation failed: {0}")]
    Tree(#[from] TreeError),

    /// Association referenced an owner kind outside the allow-list
    #[error("Invalid owner type: {kind}")]
    InvalidOwnerType { kind: String },

    /// Association referenced an attachable kind outside the allow-list
    #[error("Invalid attachable kind: {kind}")]
    InvalidAttachableKind { kind: String },

    /// A store-level race; safe to retry
    #[error("Concurrent modification: {context}")]
    ConcurrentModification { context: String },

    /// Non-concurrency store failure
    #[error("Store operation failed: {0}")]
    Store(StoreError),
}

impl ServiceError {
    /// Create an entity not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid owner type error
    pub fn invalid_owner_type(kind: impl Into<String>) -> Self {
        Self::InvalidOwnerType { kind: kind.into() }
    }

    /// Create an invalid attachable kind error
    pub fn invalid_attachable_kind(kind: impl Into<String>) -> Self {
        Self::InvalidAttachableKind { kind: kind.into() }
    }

    /// Whether the caller may safely retry the operation
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConcurrentModification { .. } => true,
            Self::Tree(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LockTimeout { timeout_ms } => Self::ConcurrentModification {
                context: format!("forest lock timed out after {}ms", timeout_ms),
            },
            StoreError::StaleSnapshot { context } => Self::ConcurrentModification { context },
            other => Self::Store(other),
        }
    }
}
