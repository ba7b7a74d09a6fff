//! In-Memory Store
//!
//! Reference implementation of [`TreeStore`] and [`AssociationStore`]
//! backed by `tokio::sync` primitives. Serves embedded use and the test
//! suite; durable backends implement the same traits against a database.
//!
//! # Concurrency
//!
//! - One `RwLock` guards all forests: reads clone a consistent snapshot,
//!   batch writes apply under a single write guard (the atomic-batch
//!   contract).
//! - One `tokio::sync::Mutex` per forest backs `lock_forest`; acquisition
//!   is bounded by `tokio::time::timeout`.

use crate::db::association_store::{AssociationStore, UpsertOutcome};
use crate::db::tree_store::{ForestGuard, ForestLock, TreeStore};
use crate::db::StoreError;
use crate::models::{
    Association, AssociationKey, AttachableKind, HierarchyKind, OwnerKind, TreeNode,
};
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// In-memory implementation of the storage seams
pub struct MemoryStore {
    /// One row map per forest, indexed by `HierarchyKind::index()`
    forests: RwLock<[HashMap<String, TreeNode>; 3]>,
    /// Per-forest writer locks backing `lock_forest`
    writers: [Arc<Mutex<()>>; 3],
    associations: RwLock<HashMap<AssociationKey, Association>>,
}

struct MemoryForestLock {
    _guard: OwnedMutexGuard<()>,
}

impl ForestLock for MemoryForestLock {}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            forests: RwLock::new(Default::default()),
            writers: [
                Arc::new(Mutex::new(())),
                Arc::new(Mutex::new(())),
                Arc::new(Mutex::new(())),
            ],
            associations: RwLock::new(HashMap::new()),
        }
    }

    /// Number of nodes currently held for one forest
    pub async fn forest_len(&self, kind: HierarchyKind) -> usize {
        self.forests.read().await[kind.index()].len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_left(mut nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    nodes.sort_by_key(|n| n.left);
    nodes
}

fn sorted_by_order(mut rows: Vec<Association>) -> Vec<Association> {
    rows.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.id.cmp(&b.id))
    });
    rows
}

#[async_trait]
impl TreeStore for MemoryStore {
    async fn load_node(
        &self,
        kind: HierarchyKind,
        id: &str,
    ) -> Result<Option<TreeNode>, StoreError> {
        let forests = self.forests.read().await;
        Ok(forests[kind.index()].get(id).cloned())
    }

    async fn load_children(
        &self,
        kind: HierarchyKind,
        parent_id: Option<&str>,
    ) -> Result<Vec<TreeNode>, StoreError> {
        let forests = self.forests.read().await;
        let children = forests[kind.index()]
            .values()
            .filter(|n| n.parent_id.as_deref() == parent_id)
            .cloned()
            .collect();
        Ok(sorted_by_left(children))
    }

    async fn load_forest(&self, kind: HierarchyKind) -> Result<Vec<TreeNode>, StoreError> {
        let forests = self.forests.read().await;
        Ok(sorted_by_left(
            forests[kind.index()].values().cloned().collect(),
        ))
    }

    async fn save_nodes(
        &self,
        kind: HierarchyKind,
        batch: Vec<TreeNode>,
    ) -> Result<(), StoreError> {
        let mut forests = self.forests.write().await;
        let forest = &mut forests[kind.index()];
        for node in &batch {
            if node.kind != kind {
                return Err(StoreError::Backend(anyhow!(
                    "node {} has kind '{}', batch targets forest '{}'",
                    node.id,
                    node.kind,
                    kind
                )));
            }
        }
        for node in batch {
            forest.insert(node.id.clone(), node);
        }
        Ok(())
    }

    async fn delete_nodes(&self, kind: HierarchyKind, ids: &[String]) -> Result<u64, StoreError> {
        let mut forests = self.forests.write().await;
        let forest = &mut forests[kind.index()];
        let mut removed = 0;
        for id in ids {
            if forest.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn update_payload(
        &self,
        kind: HierarchyKind,
        id: &str,
        content: Option<String>,
        properties: Option<Value>,
    ) -> Result<Option<TreeNode>, StoreError> {
        let mut forests = self.forests.write().await;
        let Some(node) = forests[kind.index()].get_mut(id) else {
            return Ok(None);
        };
        if let Some(content) = content {
            node.set_content(content);
        }
        if let Some(properties) = properties {
            node.merge_properties(properties);
        }
        Ok(Some(node.clone()))
    }

    async fn lock_forest(
        &self,
        kind: HierarchyKind,
        timeout: Duration,
    ) -> Result<ForestGuard, StoreError> {
        let mutex = Arc::clone(&self.writers[kind.index()]);
        match tokio::time::timeout(timeout, mutex.lock_owned()).await {
            Ok(guard) => Ok(Box::new(MemoryForestLock { _guard: guard })),
            Err(_) => Err(StoreError::lock_timeout(timeout)),
        }
    }
}

#[async_trait]
impl AssociationStore for MemoryStore {
    async fn upsert(&self, association: Association) -> Result<UpsertOutcome, StoreError> {
        let mut rows = self.associations.write().await;
        let key = association.key();
        match rows.get_mut(&key) {
            Some(existing) => {
                existing.sort_order = association.sort_order;
                Ok(UpsertOutcome {
                    association: existing.clone(),
                    inserted: false,
                })
            }
            None => {
                rows.insert(key, association.clone());
                Ok(UpsertOutcome {
                    association,
                    inserted: true,
                })
            }
        }
    }

    async fn remove(&self, key: &AssociationKey) -> Result<bool, StoreError> {
        let mut rows = self.associations.write().await;
        Ok(rows.remove(key).is_some())
    }

    async fn list_by_owner(
        &self,
        owner_kind: OwnerKind,
        owner_id: &str,
        group: Option<&str>,
    ) -> Result<Vec<Association>, StoreError> {
        let rows = self.associations.read().await;
        let matches = rows
            .values()
            .filter(|a| a.owner_kind == owner_kind && a.owner_id == owner_id)
            .filter(|a| group.map_or(true, |g| a.group == g))
            .cloned()
            .collect();
        Ok(sorted_by_order(matches))
    }

    async fn list_by_attachable(
        &self,
        attachable_kind: AttachableKind,
        attachable_id: &str,
    ) -> Result<Vec<Association>, StoreError> {
        let rows = self.associations.read().await;
        let matches = rows
            .values()
            .filter(|a| a.attachable_kind == attachable_kind && a.attachable_id == attachable_id)
            .cloned()
            .collect();
        Ok(sorted_by_order(matches))
    }
}
