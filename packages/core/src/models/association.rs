//! Polymorphic Association Row
//!
//! Links an attachable resource (media file, tag, content block) to any
//! owning entity identified by `(owner_kind, owner_id)`, with group and
//! sort-order semantics. The association layer never interprets
//! `attachable_id` without its `attachable_kind`.
//!
//! Owner and attachable kinds are closed enums: the enum definitions in
//! this module are the single allow-list for the whole crate. Anything
//! arriving as a string (from the HTTP layer) is funneled through
//! `FromStr`, which is where unknown kinds are rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Group used when the caller does not name one
pub const DEFAULT_GROUP: &str = "default";

/// Collapse an absent or blank group to [`DEFAULT_GROUP`]
pub fn normalize_group(group: Option<&str>) -> String {
    match group {
        Some(g) if !g.trim().is_empty() => g.to_string(),
        _ => DEFAULT_GROUP.to_string(),
    }
}

/// Entity kinds that may own attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Post,
    Page,
    Category,
    Comment,
    Menu,
    User,
}

impl OwnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Category => "category",
            Self::Comment => "comment",
            Self::Menu => "menu",
            Self::User => "user",
        }
    }
}

impl FromStr for OwnerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(Self::Post),
            "page" => Ok(Self::Page),
            "category" => Ok(Self::Category),
            "comment" => Ok(Self::Comment),
            "menu" => Ok(Self::Menu),
            "user" => Ok(Self::User),
            _ => Err(format!("Invalid owner kind: {}", s)),
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource kinds that may be attached to an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachableKind {
    Media,
    Tag,
    Content,
}

impl AttachableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Tag => "tag",
            Self::Content => "content",
        }
    }
}

impl FromStr for AttachableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "media" => Ok(Self::Media),
            "tag" => Ok(Self::Tag),
            "content" => Ok(Self::Content),
            _ => Err(format!("Invalid attachable kind: {}", s)),
        }
    }
}

impl fmt::Display for AttachableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an association row.
///
/// Two attach calls with equal keys address the same row; everything else
/// (`sort_order`, timestamps) is payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationKey {
    pub owner_kind: OwnerKind,
    pub owner_id: String,
    pub attachable_kind: AttachableKind,
    pub attachable_id: String,
    pub group: String,
}

impl AssociationKey {
    pub fn new(
        owner_kind: OwnerKind,
        owner_id: impl Into<String>,
        attachable_kind: AttachableKind,
        attachable_id: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            owner_kind,
            owner_id: owner_id.into(),
            attachable_kind,
            attachable_id: attachable_id.into(),
            group: group.into(),
        }
    }
}

/// One attachment of a resource to an owner.
///
/// # Examples
///
/// ```rust
/// use canopy_core::models::{Association, AttachableKind, OwnerKind, DEFAULT_GROUP};
///
/// let assoc = Association::new(
///     OwnerKind::Post,
///     "post-1".to_string(),
///     AttachableKind::Media,
///     "media-9".to_string(),
///     None,
///     0,
/// );
/// assert_eq!(assoc.group, DEFAULT_GROUP);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub id: String,

    pub owner_kind: OwnerKind,

    pub owner_id: String,

    pub attachable_kind: AttachableKind,

    pub attachable_id: String,

    /// Named bucket within the owner ("featured", "gallery", ...)
    pub group: String,

    /// Display order within the group; ties break on `id`
    pub sort_order: i64,

    pub created_at: DateTime<Utc>,
}

impl Association {
    /// Create a new association row.
    ///
    /// An empty or absent `group` collapses to [`DEFAULT_GROUP`].
    pub fn new(
        owner_kind: OwnerKind,
        owner_id: String,
        attachable_kind: AttachableKind,
        attachable_id: String,
        group: Option<String>,
        sort_order: i64,
    ) -> Self {
        let group = normalize_group(group.as_deref());

        Self {
            id: Uuid::new_v4().to_string(),
            owner_kind,
            owner_id,
            attachable_kind,
            attachable_id,
            group,
            sort_order,
            created_at: Utc::now(),
        }
    }

    /// Identity key of this row
    pub fn key(&self) -> AssociationKey {
        AssociationKey {
            owner_kind: self.owner_kind,
            owner_id: self.owner_id.clone(),
            attachable_kind: self.attachable_kind,
            attachable_id: self.attachable_id.clone(),
            group: self.group.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_defaults() {
        let assoc = Association::new(
            OwnerKind::Post,
            "post-1".to_string(),
            AttachableKind::Tag,
            "tag-1".to_string(),
            Some("   ".to_string()),
            0,
        );
        assert_eq!(assoc.group, DEFAULT_GROUP);

        let assoc = Association::new(
            OwnerKind::Post,
            "post-1".to_string(),
            AttachableKind::Tag,
            "tag-1".to_string(),
            None,
            0,
        );
        assert_eq!(assoc.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_named_group_preserved() {
        let assoc = Association::new(
            OwnerKind::Post,
            "post-1".to_string(),
            AttachableKind::Media,
            "media-1".to_string(),
            Some("gallery".to_string()),
            3,
        );
        assert_eq!(assoc.group, "gallery");
        assert_eq!(assoc.sort_order, 3);
    }

    #[test]
    fn test_key_identity_ignores_sort_order() {
        let a = Association::new(
            OwnerKind::Comment,
            "c-1".to_string(),
            AttachableKind::Media,
            "m-1".to_string(),
            None,
            0,
        );
        let b = Association::new(
            OwnerKind::Comment,
            "c-1".to_string(),
            AttachableKind::Media,
            "m-1".to_string(),
            None,
            7,
        );
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("post".parse::<OwnerKind>().unwrap(), OwnerKind::Post);
        assert!("widget".parse::<OwnerKind>().is_err());

        assert_eq!(
            "media".parse::<AttachableKind>().unwrap(),
            AttachableKind::Media
        );
        assert!("blob".parse::<AttachableKind>().is_err());
    }

    #[test]
    fn test_association_serialization() {
        let assoc = Association::new(
            OwnerKind::Page,
            "page-1".to_string(),
            AttachableKind::Content,
            "block-1".to_string(),
            Some("sidebar".to_string()),
            1,
        );

        let encoded = serde_json::to_string(&assoc).unwrap();
        let decoded: Association = serde_json::from_str(&encoded).unwrap();

        assert_eq!(assoc, decoded);
        assert!(encoded.contains("\"ownerKind\":\"page\""));
        assert!(encoded.contains("\"attachableKind\":\"content\""));
    }
}
