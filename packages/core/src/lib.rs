//! Canopy Core
//!
//! Hierarchy maintenance and polymorphic attachment bookkeeping for the
//! Canopy content platform. This crate is the library-level core behind
//! the HTTP, auth and persistence collaborators: it owns the nested-set
//! interval algorithm shared by categories, comments and menus, and the
//! association layer shared by tags, media and content blocks.
//!
//! # Architecture
//!
//! - **Universal Row**: one `TreeNode` struct per forest row; typed
//!   wrappers add entity semantics without new tables
//! - **Store Seams**: `TreeStore` / `AssociationStore` traits abstract
//!   the engine; the algorithms require only atomic batch writes and a
//!   per-forest writer lease
//! - **Serialized Writers**: every structural mutation runs its whole
//!   read-recompute-write cycle under the forest lease and commits in one
//!   batch
//!
//! # Modules
//!
//! - [`models`] - data structures (TreeNode, Association, typed wrappers)
//! - [`tree`] - interval-tree maintenance over a `TreeStore`
//! - [`db`] - storage seams and the in-memory reference store
//! - [`services`] - entity, association, tag and media services

pub mod db;
pub mod models;
pub mod services;
pub mod tree;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use tree::{DeleteOutcome, IntervalTree, TreeConfig, TreeError};
