//! Tag Service
//!
//! Thin façade over [`AssociationService`]: tagging is attachment of a
//! `Tag` resource in the default group, nothing more.

use crate::db::AssociationStore;
use crate::models::{Association, AttachableKind, OwnerKind, DEFAULT_GROUP};
use crate::services::{AssociationService, ServiceError};
use std::sync::Arc;

/// Tagging over an [`AssociationStore`]
pub struct TagService<S> {
    associations: AssociationService<S>,
}

impl<S> TagService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            associations: AssociationService::new(store),
        }
    }
}

impl<S: AssociationStore> TagService<S> {
    /// Tag an owner; re-tagging with the same tag is a no-op on rows
    pub async fn tag(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        tag_id: &str,
    ) -> Result<Association, ServiceError> {
        self.associations
            .attach(owner_kind, owner_id, AttachableKind::Tag, tag_id, None, 0)
            .await
    }

    /// Remove a tag from an owner, returning whether it was present
    pub async fn untag(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        tag_id: &str,
    ) -> Result<bool, ServiceError> {
        self.associations
            .detach(owner_kind, owner_id, AttachableKind::Tag, tag_id, None)
            .await
    }

    /// Tag ids currently applied to an owner
    pub async fn tags_for(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
    ) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .associations
            .list_by_owner(owner_kind, owner_id, Some(DEFAULT_GROUP))
            .await?
            .into_iter()
            .filter(|a| a.attachable_kind == AttachableKind::Tag)
            .map(|a| a.attachable_id)
            .collect())
    }

    /// Every owner currently carrying a tag
    pub async fn tagged_with(
        &self,
        tag_id: &str,
    ) -> Result<Vec<(OwnerKind, String)>, ServiceError> {
        Ok(self
            .associations
            .list_by_attachable(AttachableKind::Tag, tag_id)
            .await?
            .into_iter()
            .map(|a| (a.owner_kind, a.owner_id))
            .collect())
    }

    /// How many owners use a tag (checked before deleting the tag itself)
    pub async fn usage_count(&self, tag_id: &str) -> Result<usize, ServiceError> {
        self.associations
            .reference_count(AttachableKind::Tag, tag_id)
            .await
    }
}
