//! Post Model
//!
//! Posts are not hierarchical; they participate in the core as the most
//! common attachment owner ([`OwnerKind::Post`](crate::models::OwnerKind))
//! and carry a publication state machine:
//!
//! ```text
//! draft -> published -> archived
//! published -> draft          (unpublish)
//! draft -> archived
//! ```
//!
//! Archived is terminal; no transition out of it is exposed.

use crate::models::category::{validate_name, validate_slug};
use crate::models::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Not yet visible (default)
    Draft,
    /// Publicly visible
    Published,
    /// Retired; terminal
    Archived,
}

impl PostStatus {
    /// Whether an explicit transition to `next` is legal
    pub fn can_become(self, next: PostStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published)
                | (Self::Published, Self::Draft)
                | (Self::Draft, Self::Archived)
                | (Self::Published, Self::Archived)
        )
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Invalid post status: {}", s)),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// A content post.
///
/// CRUD persistence for posts is collaborator glue; the core owns only
/// the state machine and field validation here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft post
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the title or slug is out of bounds.
    pub fn new(title: &str, slug: &str, body: String) -> Result<Self, ValidationError> {
        validate_name(title)?;
        validate_slug(slug)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            slug: slug.to_string(),
            body,
            status: PostStatus::Draft,
            created_at: now,
            modified_at: now,
        })
    }

    /// Explicit transition to an arbitrary status
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidTransition` for any edge the state
    /// machine does not expose, including same-state transitions.
    pub fn transition_to(&mut self, next: PostStatus) -> Result<(), ValidationError> {
        if !self.status.can_become(next) {
            return Err(ValidationError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.modified_at = Utc::now();
        Ok(())
    }

    /// `draft -> published`
    pub fn publish(&mut self) -> Result<(), ValidationError> {
        self.transition_to(PostStatus::Published)
    }

    /// `published -> draft`
    pub fn unpublish(&mut self) -> Result<(), ValidationError> {
        self.transition_to(PostStatus::Draft)
    }

    /// `draft | published -> archived`
    pub fn archive(&mut self) -> Result<(), ValidationError> {
        self.transition_to(PostStatus::Archived)
    }
}
