//! Storage Layer Error Types
//!
//! Errors surfaced by `TreeStore` / `AssociationStore` implementations.
//! Concurrency-shaped failures (lock timeout, stale snapshot) get their
//! own variants so upper layers can map them to a retryable error kind;
//! everything backend-specific travels through the `anyhow` variant.

use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The per-forest writer lock could not be acquired in time
    #[error("Forest lock timed out after {timeout_ms}ms")]
    LockTimeout { timeout_ms: u64 },

    /// A batch referenced state that changed underneath the caller
    #[error("Stale snapshot: {context}")]
    StaleSnapshot { context: String },

    /// Operation targeted a node id the store does not hold
    #[error("Unknown node: {id}")]
    UnknownNode { id: String },

    /// Backend-specific failure with arbitrary context
    #[error("Storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a lock timeout error
    pub fn lock_timeout(timeout: Duration) -> Self {
        Self::LockTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Create a stale snapshot error
    pub fn stale_snapshot(context: impl Into<String>) -> Self {
        Self::StaleSnapshot {
            context: context.into(),
        }
    }

    /// Create an unknown node error
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }
}
