//! Type-Safe Category Wrapper
//!
//! Provides compile-time type safety for category nodes while keeping the
//! universal `TreeNode` storage model underneath.
//!
//! # Examples
//!
//! ```rust
//! use canopy_core::models::Category;
//!
//! let draft = Category::draft("Hardware", "hardware", None).unwrap();
//! let category = Category::from_node(draft).unwrap();
//! assert_eq!(category.slug(), "hardware");
//! assert!(category.is_active());
//! ```

use crate::models::{HierarchyKind, TreeNode, ValidationError};
use serde_json::json;

/// Maximum length for category names
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length for slugs (shared with posts)
pub const MAX_SLUG_LEN: usize = 120;

/// Validate a display name against the 1..=120 character bound
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(ValidationError::LengthOutOfRange {
            field: "name",
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate a URL slug: lowercase ASCII alphanumerics and hyphens, no
/// leading/trailing hyphen, 1..=120 characters.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(ValidationError::InvalidSlug(format!(
            "slug must be 1..={} characters",
            MAX_SLUG_LEN
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::InvalidSlug(format!(
            "slug '{}' may only contain lowercase letters, digits and hyphens",
            slug
        )));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(ValidationError::InvalidSlug(format!(
            "slug '{}' may not start or end with a hyphen",
            slug
        )));
    }
    Ok(())
}

/// Type-safe wrapper for category nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    node: TreeNode,
}

impl Category {
    /// Build a validated, not-yet-placed category node.
    ///
    /// The returned `TreeNode` carries placeholder bounds; the tree layer
    /// assigns real bounds on insert.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name or slug is out of bounds.
    pub fn draft(
        name: &str,
        slug: &str,
        parent_id: Option<&str>,
    ) -> Result<TreeNode, ValidationError> {
        validate_name(name)?;
        validate_slug(slug)?;

        let node = TreeNode::new(
            HierarchyKind::Category,
            name.trim().to_string(),
            parent_id.map(str::to_string),
            json!({ "slug": slug, "active": true }),
        );
        node.validate()?;
        Ok(node)
    }

    /// Wrap an existing node, checking the hierarchy kind
    pub fn from_node(node: TreeNode) -> Result<Self, ValidationError> {
        if node.kind != HierarchyKind::Category {
            return Err(ValidationError::InvalidKind(node.kind.to_string()));
        }
        Ok(Self { node })
    }

    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn name(&self) -> &str {
        &self.node.content
    }

    pub fn slug(&self) -> &str {
        self.node.property_str("slug").unwrap_or_default()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_valid() {
        let node = Category::draft("Hardware", "hardware", None).unwrap();
        assert_eq!(node.kind, HierarchyKind::Category);
        assert_eq!(node.content, "Hardware");
        assert_eq!(node.property_str("slug"), Some("hardware"));
    }

    #[test]
    fn test_draft_trims_name() {
        let node = Category::draft("  Hardware  ", "hardware", None).unwrap();
        assert_eq!(node.content, "Hardware");
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_slug_rules() {
        assert!(validate_slug("hardware").is_ok());
        assert!(validate_slug("gpu-2024").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Hardware").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
    }

    #[test]
    fn test_from_node_rejects_wrong_kind() {
        let node = TreeNode::new(
            HierarchyKind::Menu,
            "Home".to_string(),
            None,
            serde_json::json!({}),
        );
        assert!(matches!(
            Category::from_node(node),
            Err(ValidationError::InvalidKind(_))
        ));
    }
}
