//! Polymorphic Association Service
//!
//! Attaches, detaches and lists resources against an owner without the
//! owner's schema knowing about the resource kind. The service never
//! touches the owner or the attached resource itself; the association
//! rows are its only side effect.
//!
//! # Idempotency
//!
//! Re-attaching an existing `(owner, attachable, group)` key updates the
//! row's `sort_order` instead of creating a second row; detaching an
//! absent key succeeds and reports `false`.

use crate::db::{AssociationStore, UpsertOutcome};
use crate::models::{
    normalize_group, Association, AssociationKey, AttachableKind, OwnerKind, ValidationError,
};
use crate::services::ServiceError;
use std::sync::Arc;

/// Attachment bookkeeping over an [`AssociationStore`]
pub struct AssociationService<S> {
    store: Arc<S>,
}

impl<S> AssociationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S: AssociationStore> AssociationService<S> {
    /// Resolve an owner kind arriving as a string (the single rejection
    /// point for unknown owner kinds)
    pub fn parse_owner_kind(kind: &str) -> Result<OwnerKind, ServiceError> {
        kind.parse()
            .map_err(|_| ServiceError::invalid_owner_type(kind))
    }

    /// Resolve an attachable kind arriving as a string
    pub fn parse_attachable_kind(kind: &str) -> Result<AttachableKind, ServiceError> {
        kind.parse()
            .map_err(|_| ServiceError::invalid_attachable_kind(kind))
    }

    /// Attach a resource to an owner.
    ///
    /// An empty or absent `group` collapses to the default group. When
    /// the key already exists, the existing row's `sort_order` is
    /// updated and no second row appears.
    pub async fn attach(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        attachable_kind: AttachableKind,
        attachable_id: &str,
        group: Option<&str>,
        sort_order: i64,
    ) -> Result<Association, ServiceError> {
        if owner_id.is_empty() {
            return Err(ValidationError::MissingField("owner_id".to_string()).into());
        }
        if attachable_id.is_empty() {
            return Err(ValidationError::MissingField("attachable_id".to_string()).into());
        }

        let association = Association::new(
            owner_kind,
            owner_id.to_string(),
            attachable_kind,
            attachable_id.to_string(),
            group.map(str::to_string),
            sort_order,
        );

        let UpsertOutcome {
            association,
            inserted,
        } = self.store.upsert(association).await?;

        tracing::debug!(
            owner = %owner_kind,
            owner_id,
            attachable = %attachable_kind,
            attachable_id,
            group = %association.group,
            inserted,
            "attached resource"
        );
        Ok(association)
    }

    /// Detach a resource from an owner, returning whether a row existed.
    ///
    /// Detaching an absent key is not an error.
    pub async fn detach(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        attachable_kind: AttachableKind,
        attachable_id: &str,
        group: Option<&str>,
    ) -> Result<bool, ServiceError> {
        let key = AssociationKey::new(
            owner_kind,
            owner_id,
            attachable_kind,
            attachable_id,
            normalize_group(group),
        );
        let existed = self.store.remove(&key).await?;

        tracing::debug!(
            owner = %owner_kind,
            owner_id,
            attachable = %attachable_kind,
            attachable_id,
            existed,
            "detached resource"
        );
        Ok(existed)
    }

    /// All attachments of one owner, optionally narrowed to a group,
    /// ordered by `sort_order` then row id
    pub async fn list_by_owner(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        group: Option<&str>,
    ) -> Result<Vec<Association>, ServiceError> {
        Ok(self.store.list_by_owner(owner_kind, owner_id, group).await?)
    }

    /// Reverse lookup: every owner currently referencing a resource
    pub async fn list_by_attachable(
        &self,
        attachable_kind: AttachableKind,
        attachable_id: &str,
    ) -> Result<Vec<Association>, ServiceError> {
        Ok(self
            .store
            .list_by_attachable(attachable_kind, attachable_id)
            .await?)
    }

    /// How many owners reference a resource (checked before allowing the
    /// resource's deletion)
    pub async fn reference_count(
        &self,
        attachable_kind: AttachableKind,
        attachable_id: &str,
    ) -> Result<usize, ServiceError> {
        Ok(self
            .list_by_attachable(attachable_kind, attachable_id)
            .await?
            .len())
    }
}
