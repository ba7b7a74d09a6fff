//! Storage Layer
//!
//! Persistence seams for the two shared mutable resources of the core:
//! forest rows and association rows.
//!
//! # Architecture
//!
//! The traits require exactly what the algorithms need: atomic batch
//! writes, a per-forest mutual-exclusion primitive, and
//! snapshot-consistent reads. No storage engine is named at this layer.
//! [`MemoryStore`] is the reference implementation; durable backends live
//! with their engines, not here.

mod association_store;
mod error;
mod memory;
mod tree_store;

pub use association_store::{AssociationStore, UpsertOutcome};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use tree_store::{ForestGuard, ForestLock, TreeStore};
