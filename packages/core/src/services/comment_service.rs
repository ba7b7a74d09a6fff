//! Comment Service
//!
//! Threaded comments over the interval tree, plus the moderation state
//! machine. Replies inherit their parent's post; a thread never spans
//! posts, and re-parenting across posts is rejected before any interval
//! mutation.

use crate::db::TreeStore;
use crate::models::{Comment, CommentStatus, HierarchyKind, TreeNode, ValidationError};
use crate::services::ServiceError;
use crate::tree::{DeleteOutcome, IntervalTree, TreeConfig, TreeError};
use serde_json::json;
use std::sync::Arc;

/// Comment management over a [`TreeStore`]
pub struct CommentService<S> {
    tree: IntervalTree<S>,
}

impl<S> CommentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            tree: IntervalTree::new(store, HierarchyKind::Comment),
        }
    }

    pub fn with_config(store: Arc<S>, config: TreeConfig) -> Self {
        Self {
            tree: IntervalTree::with_config(store, HierarchyKind::Comment, config),
        }
    }

    /// Access the underlying interval tree
    pub fn tree(&self) -> &IntervalTree<S> {
        &self.tree
    }
}

fn wrap_many(nodes: Vec<TreeNode>) -> Result<Vec<Comment>, ServiceError> {
    nodes
        .into_iter()
        .map(|n| Comment::from_node(n).map_err(ServiceError::from))
        .collect()
}

impl<S: TreeStore> CommentService<S> {
    /// Create a top-level comment on a post
    pub async fn create(
        &self,
        body: &str,
        author_id: &str,
        post_id: &str,
    ) -> Result<Comment, ServiceError> {
        let draft = Comment::draft(body, author_id, post_id)?;
        let placed = self.tree.insert(draft, None).await?;
        tracing::info!(id = %placed.id, post_id, "created comment");
        Ok(Comment::from_node(placed)?)
    }

    /// Reply to an existing comment; the reply joins the parent's thread
    pub async fn reply(
        &self,
        parent_id: &str,
        body: &str,
        author_id: &str,
    ) -> Result<Comment, ServiceError> {
        let parent = self.tree.node(parent_id).await?;
        let draft = Comment::draft_reply(body, author_id, &parent)?;
        let placed = self.tree.insert(draft, None).await?;
        Ok(Comment::from_node(placed)?)
    }

    pub async fn get(&self, id: &str) -> Result<Comment, ServiceError> {
        Ok(Comment::from_node(self.tree.node(id).await?)?)
    }

    /// Explicitly approve a comment (`pending` or `rejected` only)
    pub async fn approve(&self, id: &str) -> Result<Comment, ServiceError> {
        self.transition(id, CommentStatus::Approved).await
    }

    /// Explicitly reject a comment (`pending` or `approved` only)
    pub async fn reject(&self, id: &str) -> Result<Comment, ServiceError> {
        self.transition(id, CommentStatus::Rejected).await
    }

    async fn transition(&self, id: &str, next: CommentStatus) -> Result<Comment, ServiceError> {
        let comment = self.get(id).await?;
        let current = comment.status();
        if !current.can_become(next) {
            return Err(ValidationError::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        let updated = self
            .tree
            .store()
            .update_payload(
                HierarchyKind::Comment,
                id,
                None,
                Some(json!({ "status": next.to_string() })),
            )
            .await?
            .ok_or_else(|| ServiceError::not_found(id))?;

        tracing::info!(id, from = %current, to = %next, "comment status changed");
        Ok(Comment::from_node(updated)?)
    }

    /// Re-parent a mis-threaded reply within the same post.
    ///
    /// `new_parent_id = None` promotes the comment to a top-level thread
    /// root. Moving into another post's thread is rejected.
    pub async fn move_to(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<Comment, ServiceError> {
        if new_parent_id == Some(id) {
            return Err(TreeError::circular_reference(format!(
                "comment {} cannot become its own parent",
                id
            ))
            .into());
        }

        if let Some(parent_id) = new_parent_id {
            let node = self.tree.node(id).await?;
            let parent = match self.tree.node(parent_id).await {
                Ok(parent) => parent,
                Err(TreeError::NotFound { .. }) => {
                    return Err(TreeError::invalid_parent(parent_id).into());
                }
                Err(err) => return Err(err.into()),
            };
            if node.property_str("post") != parent.property_str("post") {
                return Err(TreeError::hierarchy_violation(format!(
                    "comment {} cannot move into another post's thread",
                    id
                ))
                .into());
            }
        }

        Ok(Comment::from_node(
            self.tree.move_subtree(id, new_parent_id).await?,
        )?)
    }

    /// Delete a comment; `cascade` removes its replies too
    pub async fn delete(&self, id: &str, cascade: bool) -> Result<DeleteOutcome, ServiceError> {
        let outcome = self.tree.delete(id, cascade).await?;
        tracing::info!(id, deleted = outcome.deleted, "deleted comment");
        Ok(outcome)
    }

    /// A comment and its whole reply subtree, in thread order
    pub async fn thread(&self, id: &str) -> Result<Vec<Comment>, ServiceError> {
        let root = self.tree.node(id).await?;
        let mut nodes = vec![root];
        nodes.extend(self.tree.descendants(id).await?);
        wrap_many(nodes)
    }

    /// Direct replies to a comment
    pub async fn replies(&self, id: &str) -> Result<Vec<Comment>, ServiceError> {
        wrap_many(self.tree.children(Some(id)).await?)
    }

    /// Top-level comments of one post, in interval order
    pub async fn for_post(&self, post_id: &str) -> Result<Vec<Comment>, ServiceError> {
        let roots = self.tree.children(None).await?;
        wrap_many(
            roots
                .into_iter()
                .filter(|n| n.property_str("post") == Some(post_id))
                .collect(),
        )
    }

    /// Comments currently in a given moderation status, forest-wide
    pub async fn with_status(
        &self,
        status: CommentStatus,
    ) -> Result<Vec<Comment>, ServiceError> {
        let forest = self.tree.store().load_forest(HierarchyKind::Comment).await?;
        let comments = wrap_many(forest)?;
        Ok(comments
            .into_iter()
            .filter(|c| c.status() == status)
            .collect())
    }

    /// Verify the comment forest's structural invariants
    pub async fn audit(&self) -> Result<(), ServiceError> {
        Ok(self.tree.audit().await?)
    }
}
