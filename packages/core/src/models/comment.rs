//! Type-Safe Comment Wrapper
//!
//! Comments are hierarchical (threaded replies) and carry a moderation
//! status. The status never auto-transitions: only an explicit approve or
//! reject moves it, and re-approval of a rejected comment is allowed.

use crate::models::{HierarchyKind, TreeNode, ValidationError};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Maximum length for comment bodies
pub const MAX_BODY_LEN: usize = 4000;

/// Moderation status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStatus {
    /// Awaiting moderation (default)
    Pending,
    /// Visible to readers
    Approved,
    /// Hidden; may still be re-approved explicitly
    Rejected,
}

impl CommentStatus {
    /// Whether an explicit transition to `next` is legal.
    ///
    /// Transitioning to the current state is not legal: approvals and
    /// rejections are deliberate moderator actions, not upserts.
    pub fn can_become(self, next: CommentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Rejected, Self::Approved)
                | (Self::Approved, Self::Rejected)
        )
    }
}

impl FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Invalid comment status: {}", s)),
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Validate a comment body against the 1..=4000 character bound
pub fn validate_body(body: &str) -> Result<(), ValidationError> {
    let len = body.trim().chars().count();
    if len == 0 || len > MAX_BODY_LEN {
        return Err(ValidationError::LengthOutOfRange {
            field: "body",
            max: MAX_BODY_LEN,
        });
    }
    Ok(())
}

/// Type-safe wrapper for comment nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    node: TreeNode,
}

impl Comment {
    /// Build a validated top-level comment on a post.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the body is out of bounds or the
    /// author/post references are empty.
    pub fn draft(body: &str, author_id: &str, post_id: &str) -> Result<TreeNode, ValidationError> {
        validate_body(body)?;
        if author_id.is_empty() {
            return Err(ValidationError::MissingField("author_id".to_string()));
        }
        if post_id.is_empty() {
            return Err(ValidationError::MissingField("post_id".to_string()));
        }

        let node = TreeNode::new(
            HierarchyKind::Comment,
            body.trim().to_string(),
            None,
            json!({
                "status": CommentStatus::Pending.to_string(),
                "author": author_id,
                "post": post_id,
            }),
        );
        node.validate()?;
        Ok(node)
    }

    /// Build a validated reply under an existing comment node.
    ///
    /// The reply inherits the parent's post reference; a thread never
    /// spans posts.
    pub fn draft_reply(
        body: &str,
        author_id: &str,
        parent: &TreeNode,
    ) -> Result<TreeNode, ValidationError> {
        if parent.kind != HierarchyKind::Comment {
            return Err(ValidationError::InvalidKind(parent.kind.to_string()));
        }
        let post_id = parent
            .property_str("post")
            .ok_or_else(|| ValidationError::MissingField("post".to_string()))?;

        let mut node = Self::draft(body, author_id, post_id)?;
        node.parent_id = Some(parent.id.clone());
        Ok(node)
    }

    /// Wrap an existing node, checking the hierarchy kind
    pub fn from_node(node: TreeNode) -> Result<Self, ValidationError> {
        if node.kind != HierarchyKind::Comment {
            return Err(ValidationError::InvalidKind(node.kind.to_string()));
        }
        Ok(Self { node })
    }

    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn body(&self) -> &str {
        &self.node.content
    }

    pub fn author_id(&self) -> &str {
        self.node.property_str("author").unwrap_or_default()
    }

    /// Id of the post this comment thread belongs to
    pub fn post_id(&self) -> &str {
        self.node.property_str("post").unwrap_or_default()
    }

    /// Current moderation status; unparsable stored values read as pending
    pub fn status(&self) -> CommentStatus {
        self.node
            .property_str("status")
            .and_then(|s| s.parse().ok())
            .unwrap_or(CommentStatus::Pending)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.node.parent_id.as_deref()
    }

    pub fn depth(&self) -> i64 {
        self.node.depth
    }

    /// Access the underlying universal node
    pub fn node(&self) -> &TreeNode {
        &self.node
    }

    /// Unwrap into the underlying universal node
    pub fn into_node(self) -> TreeNode {
        self.node
    }
}
