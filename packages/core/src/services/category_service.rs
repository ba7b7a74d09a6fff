//! Category Service
//!
//! Domain wrapper composing interval-tree behavior with category
//! validation. Field rules run before any structural mutation: a
//! validation failure must leave the forest untouched.

use crate::db::TreeStore;
use crate::models::category::{validate_name, validate_slug};
use crate::models::{Category, HierarchyKind, TreeNode};
use crate::services::ServiceError;
use crate::tree::{DeleteOutcome, IntervalTree, TreeConfig, TreeError};
use serde_json::json;
use std::sync::Arc;

/// Category management over a [`TreeStore`]
pub struct CategoryService<S> {
    tree: IntervalTree<S>,
}

impl<S> CategoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            tree: IntervalTree::new(store, HierarchyKind::Category),
        }
    }

    pub fn with_config(store: Arc<S>, config: TreeConfig) -> Self {
        Self {
            tree: IntervalTree::with_config(store, HierarchyKind::Category, config),
        }
    }

    /// Access the underlying interval tree
    pub fn tree(&self) -> &IntervalTree<S> {
        &self.tree
    }
}

fn wrap_many(nodes: Vec<TreeNode>) -> Result<Vec<Category>, ServiceError> {
    nodes
        .into_iter()
        .map(|n| Category::from_node(n).map_err(ServiceError::from))
        .collect()
}

impl<S: TreeStore> CategoryService<S> {
    /// Create a category as the last child of `parent_id` (or as a new
    /// root category)
    pub async fn create(
        &self,
        name: &str,
        slug: &str,
        parent_id: Option<&str>,
    ) -> Result<Category, ServiceError> {
        let draft = Category::draft(name, slug, parent_id)?;
        let placed = self.tree.insert(draft, None).await?;
        tracing::info!(id = %placed.id, slug, "created category");
        Ok(Category::from_node(placed)?)
    }

    pub async fn get(&self, id: &str) -> Result<Category, ServiceError> {
        Ok(Category::from_node(self.tree.node(id).await?)?)
    }

    /// Update the display name without touching the tree position
    pub async fn rename(&self, id: &str, name: &str) -> Result<Category, ServiceError> {
        validate_name(name)?;
        let updated = self
            .tree
            .store()
            .update_payload(
                HierarchyKind::Category,
                id,
                Some(name.trim().to_string()),
                None,
            )
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;
        Ok(Category::from_node(updated)?)
    }

    /// Change the slug
    pub async fn set_slug(&self, id: &str, slug: &str) -> Result<Category, ServiceError> {
        validate_slug(slug)?;
        let updated = self
            .tree
            .store()
            .update_payload(HierarchyKind::Category, id, None, Some(json!({ "slug": slug })))
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;
        Ok(Category::from_node(updated)?)
    }

    /// Flip the active flag
    pub async fn set_active(&self, id: &str, active: bool) -> Result<Category, ServiceError> {
        let updated = self
            .tree
            .store()
            .update_payload(
                HierarchyKind::Category,
                id,
                None,
                Some(json!({ "active": active })),
            )
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;
        Ok(Category::from_node(updated)?)
    }

    /// Relocate a category (and its whole subtree) under a new parent
    pub async fn move_to(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<Category, ServiceError> {
        // Self-parenting check; ids without an interval are covered here,
        // the containment check in the tree covers the rest.
        if new_parent_id == Some(id) {
            return Err(TreeError::circular_reference(format!(
                "category {} cannot become its own parent",
                id
            ))
            .into());
        }
        Ok(Category::from_node(
            self.tree.move_subtree(id, new_parent_id).await?,
        )?)
    }

    /// Delete a category; `cascade` removes the whole subtree
    pub async fn delete(&self, id: &str, cascade: bool) -> Result<DeleteOutcome, ServiceError> {
        let outcome = self.tree.delete(id, cascade).await?;
        tracing::info!(id, deleted = outcome.deleted, "deleted category");
        Ok(outcome)
    }

    /// Direct children of `parent_id`, or the root categories when `None`
    pub async fn children(&self, parent_id: Option<&str>) -> Result<Vec<Category>, ServiceError> {
        wrap_many(self.tree.children(parent_id).await?)
    }

    /// Breadcrumb chain, root first
    pub async fn ancestors(&self, id: &str) -> Result<Vec<Category>, ServiceError> {
        wrap_many(self.tree.ancestors(id).await?)
    }

    /// The whole subtree below a category, in interval order
    pub async fn descendants(&self, id: &str) -> Result<Vec<Category>, ServiceError> {
        wrap_many(self.tree.descendants(id).await?)
    }

    /// Other categories under the same parent
    pub async fn siblings(&self, id: &str) -> Result<Vec<Category>, ServiceError> {
        wrap_many(self.tree.siblings(id).await?)
    }

    /// Verify the category forest's structural invariants
    pub async fn audit(&self) -> Result<(), ServiceError> {
        Ok(self.tree.audit().await?)
    }
}
