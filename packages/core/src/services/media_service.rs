//! Media Service
//!
//! Thin façade over [`AssociationService`] for file attachments. Groups
//! partition an owner's media into named buckets ("featured", "gallery");
//! upload transport and file storage are collaborator concerns.

use crate::db::AssociationStore;
use crate::models::{Association, AttachableKind, OwnerKind};
use crate::services::{AssociationService, ServiceError};
use std::sync::Arc;

/// Media attachment bookkeeping over an [`AssociationStore`]
pub struct MediaService<S> {
    associations: AssociationService<S>,
}

impl<S> MediaService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            associations: AssociationService::new(store),
        }
    }
}

impl<S: AssociationStore> MediaService<S> {
    /// Attach a media file to an owner within a group; re-attaching the
    /// same file in the same group re-sorts it instead of duplicating
    pub async fn attach(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        media_id: &str,
        group: Option<&str>,
        sort_order: i64,
    ) -> Result<Association, ServiceError> {
        self.associations
            .attach(
                owner_kind,
                owner_id,
                AttachableKind::Media,
                media_id,
                group,
                sort_order,
            )
            .await
    }

    /// Detach a media file from an owner's group, returning whether it
    /// was present
    pub async fn detach(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        media_id: &str,
        group: Option<&str>,
    ) -> Result<bool, ServiceError> {
        self.associations
            .detach(owner_kind, owner_id, AttachableKind::Media, media_id, group)
            .await
    }

    /// An owner's media attachments in display order, optionally narrowed
    /// to one group
    pub async fn attachments(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        group: Option<&str>,
    ) -> Result<Vec<Association>, ServiceError> {
        Ok(self
            .associations
            .list_by_owner(owner_kind, owner_id, group)
            .await?
            .into_iter()
            .filter(|a| a.attachable_kind == AttachableKind::Media)
            .collect())
    }

    /// Every owner currently referencing a media file
    pub async fn owners_of(
        &self,
        media_id: &str,
    ) -> Result<Vec<(OwnerKind, String)>, ServiceError> {
        Ok(self
            .associations
            .list_by_attachable(AttachableKind::Media, media_id)
            .await?
            .into_iter()
            .map(|a| (a.owner_kind, a.owner_id))
            .collect())
    }

    /// How many owners reference a media file (checked before allowing
    /// the file's deletion)
    pub async fn reference_count(&self, media_id: &str) -> Result<usize, ServiceError> {
        self.associations
            .reference_count(AttachableKind::Media, media_id)
            .await
    }
}
