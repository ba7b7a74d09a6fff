//! TreeStore Trait - Forest Persistence Abstraction
//!
//! This trait is the seam between the interval-tree algorithm and
//! whatever holds the rows. The tree layer is generic over it; swapping
//! the backing engine never touches the renumbering logic.
//!
//! # Contract
//!
//! - `save_nodes` / `delete_nodes` apply a whole batch atomically: either
//!   every row in the batch is persisted or none is. Partial application
//!   of a renumbering batch corrupts the forest's interval invariants.
//! - `lock_forest` hands out an exclusive writer lease for one entity
//!   family. Structural mutations hold the lease across their whole
//!   read-recompute-write cycle; the lease ends when the guard drops.
//!   The primitive must exclude writers in *other process instances*
//!   sharing the store, not just local tasks.
//! - Reads (`load_*`) return a consistent snapshot relative to in-flight
//!   writers and do not require the lease.

use crate::db::StoreError;
use crate::models::{HierarchyKind, TreeNode};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Exclusive writer lease over one forest; released on drop
pub trait ForestLock: Send {}

/// Boxed lease handed out by [`TreeStore::lock_forest`]
pub type ForestGuard = Box<dyn ForestLock>;

/// Abstraction over forest row persistence
///
/// Implementations must be `Send + Sync`; every method is async so both
/// embedded and networked backends fit behind it.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Load a single node by id
    ///
    /// Returns `Ok(None)` when the id is absent (not an error).
    async fn load_node(
        &self,
        kind: HierarchyKind,
        id: &str,
    ) -> Result<Option<TreeNode>, StoreError>;

    /// Load the direct children of `parent_id` (roots when `None`),
    /// ordered by `left`
    async fn load_children(
        &self,
        kind: HierarchyKind,
        parent_id: Option<&str>,
    ) -> Result<Vec<TreeNode>, StoreError>;

    /// Load every node of one forest, ordered by `left`
    async fn load_forest(&self, kind: HierarchyKind) -> Result<Vec<TreeNode>, StoreError>;

    /// Persist a batch of created or renumbered nodes atomically
    ///
    /// Rows are upserted by id. The batch is the unit of atomicity.
    async fn save_nodes(&self, kind: HierarchyKind, batch: Vec<TreeNode>)
        -> Result<(), StoreError>;

    /// Delete a batch of nodes atomically, returning how many existed
    async fn delete_nodes(&self, kind: HierarchyKind, ids: &[String]) -> Result<u64, StoreError>;

    /// Update a node's payload (content and/or shallow-merged properties)
    /// without touching its interval bounds
    ///
    /// This is the only write path for non-structural edits; going through
    /// it means a concurrent renumbering can never be clobbered by a
    /// read-modify-write of the whole row.
    ///
    /// Returns the updated node, or `Ok(None)` when the id is absent.
    async fn update_payload(
        &self,
        kind: HierarchyKind,
        id: &str,
        content: Option<String>,
        properties: Option<Value>,
    ) -> Result<Option<TreeNode>, StoreError>;

    /// Acquire the exclusive writer lease for one forest
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockTimeout`] when the lease cannot be
    /// acquired within `timeout`; the caller must treat that as a
    /// retryable concurrency failure and must not have written anything.
    async fn lock_forest(
        &self,
        kind: HierarchyKind,
        timeout: Duration,
    ) -> Result<ForestGuard, StoreError>;
}
