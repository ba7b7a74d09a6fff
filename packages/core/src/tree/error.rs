//! Tree Layer Error Types
//!
//! Structural failures for interval-tree operations. Concurrency-shaped
//! store failures (lock timeout, stale snapshot) are folded into
//! `ConcurrentModification` so callers have a single retryable kind.

use crate::db::StoreError;
use thiserror::Error;

/// Errors from structural tree operations
#[derive(Error, Debug)]
pub enum TreeError {
    /// Operation targeted a node id that does not exist
    #[error("Node not found: {id}")]
    NotFound { id: String },

    /// Referenced parent does not exist in this forest
    #[error("Invalid parent node: {parent_id}")]
    InvalidParent { parent_id: String },

    /// Move or create would make a node its own ancestor
    #[error("Circular reference detected: {context}")]
    CircularReference { context: String },

    /// Non-cascading delete attempted on a node with descendants
    #[error("Node '{id}' has {descendant_count} descendant(s); delete requires cascade")]
    HasChildren { id: String, descendant_count: i64 },

    /// The forest writer lease could not be acquired, or the snapshot
    /// went stale mid-operation; safe to retry
    #[error("Concurrent modification: {context}")]
    ConcurrentModification { context: String },

    /// Structural rule breach (depth limit, kind mismatch, corrupt bounds)
    #[error("Hierarchy constraint violated: {0}")]
    HierarchyViolation(String),

    /// Non-concurrency store failure
    #[error("Store operation failed: {0}")]
    Store(StoreError),
}

impl TreeError {
    /// Create a node not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid parent error
    pub fn invalid_parent(parent_id: impl Into<String>) -> Self {
        Self::InvalidParent {
            parent_id: parent_id.into(),
        }
    }

    /// Create a circular reference error
    pub fn circular_reference(context: impl Into<String>) -> Self {
        Self::CircularReference {
            context: context.into(),
        }
    }

    /// Create a has-children error
    pub fn has_children(id: impl Into<String>, descendant_count: i64) -> Self {
        Self::HasChildren {
            id: id.into(),
            descendant_count,
        }
    }

    /// Create a concurrent modification error
    pub fn concurrent_modification(context: impl Into<String>) -> Self {
        Self::ConcurrentModification {
            context: context.into(),
        }
    }

    /// Create a hierarchy violation error
    pub fn hierarchy_violation(msg: impl Into<String>) -> Self {
        Self::HierarchyViolation(msg.into())
    }

    /// Whether the caller may safely retry the operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

impl From<StoreError> for TreeError {
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
