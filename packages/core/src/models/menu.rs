//! Type-Safe Menu Item Wrapper
//!
//! Menu items form navigation trees. Items without a URL act as pure
//! grouping headers; items with a URL must carry a non-empty target.

use crate::models::{HierarchyKind, TreeNode, ValidationError};
use serde_json::json;

/// Maximum length for menu labels
pub const MAX_LABEL_LEN: usize = 80;

/// Validate a menu label against the 1..=80 character bound
pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    let len = label.trim().chars().count();
    if len == 0 || len > MAX_LABEL_LEN {
        return Err(ValidationError::LengthOutOfRange {
            field: "label",
            max: MAX_LABEL_LEN,
        });
    }
    Ok(())
}

/// Validate a menu target URL: present means non-empty and free of
/// whitespace. Scheme checks belong to the request-validation collaborator.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::InvalidUrl(
            "url must not be empty when present".to_string(),
        ));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidUrl(format!(
            "url '{}' may not contain whitespace",
            url
        )));
    }
    Ok(())
}

/// Type-safe wrapper for menu item nodes
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    node: TreeNode,
}

impl MenuItem {
    /// Build a validated, not-yet-placed menu item node.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the label is out of bounds or a
    /// provided URL is malformed.
    pub fn draft(
        label: &str,
        url: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<TreeNode, ValidationError> {
        validate_label(label)?;
        if let Some(url) = url {
            validate_url(url)?;
        }

        let mut properties = json!({ "active": true });
        if let Some(url) = url {
            properties["url"] = json!(url);
        }

        let node = TreeNode::new(
            HierarchyKind::Menu,
            label.trim().to_string(),
            parent_id.map(str::to_string),
            properties,
        );
        node.validate()?;
        Ok(node)
    }

    /// Wrap an existing node, checking the hierarchy kind
    pub fn from_node(node: TreeNode) -> Result<Self, ValidationError> {
        if node.kind != HierarchyKind::Menu {
            return Err(ValidationError::InvalidKind(node.kind.to_string()));
        }
        Ok(Self { node })
    }

    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn label(&self) -> &str {
        &self.node.content
    }

    /// Target URL; `None` for grouping headers
    pub fn url(&self) -> Option<&str> {
        self.node.property_str("url")
    }

    pub fn is_active(&self) -> bool {
        self.node.property_bool("active", true)
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
