//! Universal Tree Node
//!
//! This module defines the `TreeNode` struct shared by every hierarchical
//! entity family in Canopy (categories, comments, menus).
//!
//! # Architecture
//!
//! - **Universal Row**: one struct represents a row in any forest; the
//!   entity family is carried by [`HierarchyKind`]
//! - **Interval Bounds**: `left`/`right`/`depth` encode the nested-set
//!   position; they are owned by the tree layer and must never be written
//!   outside a structural operation
//! - **Pure JSON Properties**: entity-specific fields (slug, status, url,
//!   active flag) live in the `properties` object, so no schema change is
//!   needed when a wrapper gains a field
//!
//! # Examples
//!
//! ```rust
//! use canopy_core::models::{HierarchyKind, TreeNode};
//! use serde_json::json;
//!
//! let node = TreeNode::new(
//!     HierarchyKind::Category,
//!     "Hardware".to_string(),
//!     None,
//!     json!({ "slug": "hardware", "active": true }),
//! );
//! assert!(node.validate().is_ok());
//! assert!(node.is_root());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for node and wrapper operations
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid hierarchy kind: {0}")]
    InvalidKind(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    #[error("Field '{field}' must be between 1 and {max} characters")]
    LengthOutOfRange { field: &'static str, max: usize },

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("Properties validation failed: {0}")]
    InvalidProperties(String),
}

/// Entity families that form independent forests.
///
/// Each kind has its own interval numbering; bounds are never compared
/// across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyKind {
    Category,
    Comment,
    Menu,
}

impl HierarchyKind {
    /// All forests, in a stable order (used to pre-build per-forest locks)
    pub const ALL: [HierarchyKind; 3] = [
        HierarchyKind::Category,
        HierarchyKind::Comment,
        HierarchyKind::Menu,
    ];

    /// Stable index into per-forest tables
    pub fn index(self) -> usize {
        match self {
            Self::Category => 0,
            Self::Comment => 1,
            Self::Menu => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Comment => "comment",
            Self::Menu => "menu",
        }
    }
}

impl FromStr for HierarchyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "comment" => Ok(Self::Comment),
            "menu" => Ok(Self::Menu),
            _ => Err(format!("Invalid hierarchy kind: {}", s)),
        }
    }
}

impl fmt::Display for HierarchyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a hierarchical forest.
///
/// # Fields
///
/// - `id`: UUID v4 string, stable for the node's lifetime
/// - `kind`: which forest the node belongs to
/// - `content`: primary text (category name, comment body, menu label)
/// - `parent_id`: optional same-kind parent; `None` means root
/// - `left` / `right`: nested-set bounds; every descendant's bounds lie
///   strictly inside, and `right = left + 2 * descendant_count + 1`
/// - `depth`: 0 for roots, parent depth + 1 otherwise
/// - `ordering`: advisory sibling tie-break (append semantics), not used
///   by the interval math
/// - `properties`: entity-specific fields as a JSON object
///
/// A freshly constructed node carries placeholder bounds `(0, 1)`; real
/// bounds are assigned when the tree layer places it into a forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,

    pub kind: HierarchyKind,

    pub content: String,

    pub parent_id: Option<String>,

    pub left: i64,

    pub right: i64,

    pub depth: i64,

    pub ordering: i64,

    pub created_at: DateTime<Utc>,

    pub modified_at: DateTime<Utc>,

    pub properties: serde_json::Value,
}

impl TreeNode {
    /// Create a new node with an auto-generated UUID and placeholder bounds
    pub fn new(
        kind: HierarchyKind,
        content: String,
        parent_id: Option<String>,
        properties: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            content,
            parent_id,
            left: 0,
            right: 1,
            depth: 0,
            ordering: 0,
            created_at: now,
            modified_at: now,
            properties,
        }
    }

    /// Validate node structure and required fields
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `id` is empty
    /// - `properties` is not a JSON object
    /// - the node references itself as parent
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if !self.properties.is_object() {
            return Err(ValidationError::InvalidProperties(
                "properties must be a JSON object".to_string(),
            ));
        }

        if let Some(parent_id) = &self.parent_id {
            if parent_id == &self.id {
                return Err(ValidationError::InvalidParent(
                    "Node cannot be its own parent".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Whether this node is a forest root
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Interval width, `right - left + 1`
    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    /// Number of descendants implied by the interval width
    pub fn descendant_count(&self) -> i64 {
        (self.right - self.left - 1) / 2
    }

    /// Strict interval containment: `other` lies fully inside this node
    pub fn encloses(&self, other: &TreeNode) -> bool {
        self.left < other.left && other.right < self.right
    }

    /// Update the node's primary content
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.modified_at = Utc::now();
    }

    /// Merge properties with existing properties (shallow merge)
    pub fn merge_properties(&mut self, updates: serde_json::Value) {
        if let (Some(existing), Some(new)) = (self.properties.as_object_mut(), updates.as_object())
        {
            for (key, value) in new {
                existing.insert(key.clone(), value.clone());
            }
            self.modified_at = Utc::now();
        }
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// String property accessor (missing or non-string yields `None`)
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    /// Boolean property accessor with a default for absent keys
    pub fn property_bool(&self, key: &str, default: bool) -> bool {
        self.properties
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_creation() {
        let node = TreeNode::new(
            HierarchyKind::Category,
            "Hardware".to_string(),
            None,
            json!({}),
        );

        assert!(!node.id.is_empty());
        assert_eq!(node.kind, HierarchyKind::Category);
        assert!(node.parent_id.is_none());
        assert!(node.is_root());
        assert_eq!(node.descendant_count(), 0);
    }

    #[test]
    fn test_node_validation_circular_parent() {
        let mut node = TreeNode::new(HierarchyKind::Menu, "Home".to_string(), None, json!({}));
        node.parent_id = Some(node.id.clone());

        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidParent(_))
        ));
    }

    #[test]
    fn test_node_validation_invalid_properties() {
        let mut node = TreeNode::new(HierarchyKind::Menu, "Home".to_string(), None, json!({}));
        node.properties = json!("not an object");

        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidProperties(_))
        ));
    }

    #[test]
    fn test_interval_helpers() {
        let mut parent = TreeNode::new(HierarchyKind::Category, "A".to_string(), None, json!({}));
        parent.left = 1;
        parent.right = 6;

        let mut child = TreeNode::new(HierarchyKind::Category, "B".to_string(), None, json!({}));
        child.left = 2;
        child.right = 5;

        assert!(parent.encloses(&child));
        assert!(!child.encloses(&parent));
        assert_eq!(parent.width(), 6);
        assert_eq!(parent.descendant_count(), 2);
        assert_eq!(child.descendant_count(), 1);
    }

    #[test]
    fn test_property_accessors() {
        let node = TreeNode::new(
            HierarchyKind::Category,
            "Hardware".to_string(),
            None,
            json!({ "slug": "hardware", "active": true }),
        );

        assert_eq!(node.property_str("slug"), Some("hardware"));
        assert_eq!(node.property_str("missing"), None);
        assert!(node.property_bool("active", false));
        assert!(node.property_bool("missing", true));
    }

    #[test]
    fn test_hierarchy_kind_roundtrip() {
        for kind in HierarchyKind::ALL {
            let parsed: HierarchyKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("post".parse::<HierarchyKind>().is_err());
    }

    #[test]
    fn test_node_serialization() {
        let node = TreeNode::new(
            HierarchyKind::Comment,
            "Nice post".to_string(),
            None,
            json!({ "status": "pending" }),
        );

        let encoded = serde_json::to_string(&node).unwrap();
        let decoded: TreeNode = serde_json::from_str(&encoded).unwrap();

        assert_eq!(node, decoded);
        assert!(encoded.contains("\"parentId\""));
    }
}
