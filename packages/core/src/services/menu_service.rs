//! Menu Service
//!
//! Navigation trees over the interval tree. Items without a URL act as
//! grouping headers; reordering and nesting follow the same structural
//! rules as every other forest.

use crate::db::TreeStore;
use crate::models::menu::{validate_label, validate_url};
use crate::models::{HierarchyKind, MenuItem, TreeNode};
use crate::services::ServiceError;
use crate::tree::{DeleteOutcome, IntervalTree, TreeConfig, TreeError};
use serde_json::json;
use std::sync::Arc;

/// Menu management over a [`TreeStore`]
pub struct MenuService<S> {
    tree: IntervalTree<S>,
}

impl<S> MenuService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            tree: IntervalTree::new(store, HierarchyKind::Menu),
        }
    }

    pub fn with_config(store: Arc<S>, config: TreeConfig) -> Self {
        Self {
            tree: IntervalTree::with_config(store, HierarchyKind::Menu, config),
        }
    }

    /// Access the underlying interval tree
    pub fn tree(&self) -> &IntervalTree<S> {
        &self.tree
    }
}

fn wrap_many(nodes: Vec<TreeNode>) -> Result<Vec<MenuItem>, ServiceError> {
    nodes
        .into_iter()
        .map(|n| MenuItem::from_node(n).map_err(ServiceError::from))
        .collect()
}

impl<S: TreeStore> MenuService<S> {
    /// Create a menu item as the last child of `parent_id` (or as a new
    /// top-level item)
    pub async fn create(
        &self,
        label: &str,
        url: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<MenuItem, ServiceError> {
        let draft = MenuItem::draft(label, url, parent_id)?;
        let placed = self.tree.insert(draft, None).await?;
        tracing::info!(id = %placed.id, label, "created menu item");
        Ok(MenuItem::from_node(placed)?)
    }

    pub async fn get(&self, id: &str) -> Result<MenuItem, ServiceError> {
        Ok(MenuItem::from_node(self.tree.node(id).await?)?)
    }

    /// Update the display label without touching the tree position
    pub async fn relabel(&self, id: &str, label: &str) -> Result<MenuItem, ServiceError> {
        validate_label(label)?;
        let updated = self
            .tree
            .store()
            .update_payload(HierarchyKind::Menu, id, Some(label.trim().to_string()), None)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;
        Ok(MenuItem::from_node(updated)?)
    }

    /// Change or clear the target URL (`None` turns the item into a
    /// grouping header)
    pub async fn set_url(&self, id: &str, url: Option<&str>) -> Result<MenuItem, ServiceError> {
        if let Some(url) = url {
            validate_url(url)?;
        }
        let updated = self
            .tree
            .store()
            .update_payload(HierarchyKind::Menu, id, None, Some(json!({ "url": url })))
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;
        Ok(MenuItem::from_node(updated)?)
    }

    /// Flip the active flag
    pub async fn set_active(&self, id: &str, active: bool) -> Result<MenuItem, ServiceError> {
        let updated = self
            .tree
            .store()
            .update_payload(HierarchyKind::Menu, id, None, Some(json!({ "active": active })))
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;
        Ok(MenuItem::from_node(updated)?)
    }

    /// Relocate a menu item (and its nested items) under a new parent
    pub async fn move_to(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<MenuItem, ServiceError> {
        if new_parent_id == Some(id) {
            return Err(TreeError::circular_reference(format!(
                "menu item {} cannot become its own parent",
                id
            ))
            .into());
        }
        Ok(MenuItem::from_node(
            self.tree.move_subtree(id, new_parent_id).await?,
        )?)
    }

    /// Delete a menu item; `cascade` removes nested items too
    pub async fn delete(&self, id: &str, cascade: bool) -> Result<DeleteOutcome, ServiceError> {
        let outcome = self.tree.delete(id, cascade).await?;
        tracing::info!(id, deleted = outcome.deleted, "deleted menu item");
        Ok(outcome)
    }

    /// Direct children of `parent_id`, or the top-level items when `None`
    pub async fn children(&self, parent_id: Option<&str>) -> Result<Vec<MenuItem>, ServiceError> {
        wrap_many(self.tree.children(parent_id).await?)
    }

    /// The whole nested structure below an item, in display order
    pub async fn descendants(&self, id: &str) -> Result<Vec<MenuItem>, ServiceError> {
        wrap_many(self.tree.descendants(id).await?)
    }

    /// Breadcrumb chain, root first
    pub async fn ancestors(&self, id: &str) -> Result<Vec<MenuItem>, ServiceError> {
        wrap_many(self.tree.ancestors(id).await?)
    }

    /// Verify the menu forest's structural invariants
    pub async fn audit(&self) -> Result<(), ServiceError> {
        Ok(self.tree.audit().await?)
    }
}
