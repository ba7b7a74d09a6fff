//! AssociationStore Trait - Attachment Persistence Abstraction
//!
//! Persistence seam for polymorphic association rows. Unlike the tree
//! store there is no forest-wide lock: rows for different owners are
//! independent, and the only race that matters (two attaches of the same
//! key) is settled by `upsert` being atomic per key.

use crate::db::StoreError;
use crate::models::{Association, AssociationKey, AttachableKind, OwnerKind};
use async_trait::async_trait;

/// Result of an atomic upsert
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    /// Final persisted row (original id and creation time on update)
    pub association: Association,
    /// `true` when a new row was created, `false` when an existing row's
    /// sort order was updated
    pub inserted: bool,
}

/// Abstraction over association row persistence
#[async_trait]
pub trait AssociationStore: Send + Sync {
    /// Insert the row, or atomically update `sort_order` when a row with
    /// the same [`AssociationKey`] already exists
    ///
    /// The check-and-write must be a single atomic step per key; two
    /// concurrent upserts of one key must collapse to one row.
    async fn upsert(&self, association: Association) -> Result<UpsertOutcome, StoreError>;

    /// Remove the row matching `key`, returning whether it existed
    async fn remove(&self, key: &AssociationKey) -> Result<bool, StoreError>;

    /// All rows for one owner, optionally narrowed to a group, ordered by
    /// `sort_order` then id
    async fn list_by_owner(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        group: Option<&str>,
    ) -> Result<Vec<Association>, StoreError>;

    /// Reverse lookup: every row referencing one attachable resource,
    /// ordered by `sort_order` then id
    async fn list_by_attachable(
        &self,
        attachable_kind: AttachableKind,
        attachable_id: &str,
    ) -> Result<Vec<Association>, StoreError>;
}
