//! Interval Tree Maintenance
//!
//! Maintains `left`/`right`/`depth`/`ordering` for a forest of nodes held
//! in a single flat table per entity family. The algorithm is pure over
//! the [`TreeStore`] abstraction; it never assumes a storage engine with
//! native tree support.
//!
//! # Numbering
//!
//! Bounds form one dense, 1-based numbering per forest. A node reserves a
//! width-2 interval on insert; every structural change recomputes the
//! affected bounds and compacts the numbering, so freed ranges never leak.
//! For every node, `right = left + 2 * descendant_count + 1`, and any two
//! intervals are either disjoint or strictly nested.
//!
//! # Concurrency
//!
//! Every structural operation runs its whole read-recompute-write cycle
//! under the store's per-forest writer lease and commits through a single
//! atomic batch. Either all affected bounds are updated or none are.
//! Read-only queries skip the lease and read a consistent snapshot.
//!
//! # Examples
//!
//! ```rust,no_run
//! use canopy_core::db::MemoryStore;
//! use canopy_core::models::{HierarchyKind, TreeNode};
//! use canopy_core::tree::IntervalTree;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let tree = IntervalTree::new(store, HierarchyKind::Category);
//!
//! let root = TreeNode::new(
//!     HierarchyKind::Category,
//!     "Hardware".to_string(),
//!     None,
//!     json!({}),
//! );
//! let placed = tree.insert(root, None).await?;
//! assert_eq!((placed.left, placed.right, placed.depth), (1, 2, 0));
//! # Ok(())
//! # }
//! ```

mod bounds;
mod error;

pub use error::TreeError;

use crate::db::TreeStore;
use crate::models::{HierarchyKind, TreeNode};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Tuning knobs for structural operations
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// How long a structural operation waits for the forest writer lease
    pub lock_timeout: Duration,

    /// Maximum node depth (roots are depth 0)
    pub max_depth: i64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            max_depth: 1000,
        }
    }
}

/// Result of a structural delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// How many nodes were removed (the target plus cascaded descendants)
    pub deleted: u64,

    /// Interval width reclaimed and compacted away
    pub removed_width: i64,
}

/// Interval-tree maintenance over one forest
pub struct IntervalTree<S> {
    store: Arc<S>,
    kind: HierarchyKind,
    config: TreeConfig,
}

impl<S> IntervalTree<S> {
    /// Create a tree over `kind` with default configuration
    pub fn new(store: Arc<S>, kind: HierarchyKind) -> Self {
        Self::with_config(store, kind, TreeConfig::default())
    }

    /// Create a tree over `kind` with explicit configuration
    pub fn with_config(store: Arc<S>, kind: HierarchyKind, config: TreeConfig) -> Self {
        Self {
            store,
            kind,
            config,
        }
    }

    /// The forest this tree maintains
    pub fn kind(&self) -> HierarchyKind {
        self.kind
    }

    /// Access the underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

/// Bounds snapshot keyed by id, used to diff out the commit batch
fn snapshot_bounds(forest: &[TreeNode]) -> HashMap<String, (i64, i64)> {
    forest
        .iter()
        .map(|n| (n.id.clone(), (n.left, n.right)))
        .collect()
}

/// Nodes whose bounds differ from the snapshot (new ids count as changed)
fn changed_since(nodes: &[TreeNode], before: &HashMap<String, (i64, i64)>) -> Vec<TreeNode> {
    nodes
        .iter()
        .filter(|n| before.get(&n.id) != Some(&(n.left, n.right)))
        .cloned()
        .collect()
}

impl<S: TreeStore> IntervalTree<S> {
    /// Insert `node` as the last child of its `parent_id` (or as a new
    /// root when `parent_id` is `None`), reserving a width-2 interval.
    ///
    /// `ordering_hint` overrides the advisory sibling ordering; the
    /// interval position is always "last child" regardless.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidParent`] when `parent_id` does not resolve
    ///   within this forest
    /// - [`TreeError::CircularReference`] when the node names itself as
    ///   parent
    /// - [`TreeError::ConcurrentModification`] when the writer lease
    ///   cannot be acquired in time (safe to retry)
    pub async fn insert(
        &self,
        mut node: TreeNode,
        ordering_hint: Option<i64>,
    ) -> Result<TreeNode, TreeError> {
        if node.kind != self.kind {
            return Err(TreeError::hierarchy_violation(format!(
                "node kind '{}' does not match forest '{}'",
                node.kind, self.kind
            )));
        }
        if node.parent_id.as_deref() == Some(node.id.as_str()) {
            return Err(TreeError::circular_reference(format!(
                "node {} cannot be its own parent",
                node.id
            )));
        }

        let _lease = self
            .store
            .lock_forest(self.kind, self.config.lock_timeout)
            .await?;
        let mut forest = self.store.load_forest(self.kind).await?;

        if forest.iter().any(|n| n.id == node.id) {
            return Err(TreeError::hierarchy_violation(format!(
                "node {} is already placed in forest '{}'",
                node.id, self.kind
            )));
        }

        let (at, depth) = match node.parent_id.as_deref() {
            Some(parent_id) => {
                let parent = forest
                    .iter()
                    .find(|n| n.id == parent_id)
                    .ok_or_else(|| TreeError::invalid_parent(parent_id))?;
                if parent.depth + 1 > self.config.max_depth {
                    return Err(TreeError::hierarchy_violation(format!(
                        "insert under {} would exceed maximum depth {}",
                        parent_id, self.config.max_depth
                    )));
                }
                (parent.right, parent.depth + 1)
            }
            None => (bounds::max_right(&forest) + 1, 0),
        };

        let ordering = ordering_hint
            .unwrap_or_else(|| bounds::next_ordering(&forest, node.parent_id.as_deref()));

        let before = snapshot_bounds(&forest);
        bounds::open_gap(&mut forest, at, 2);

        node.left = at;
        node.right = at + 1;
        node.depth = depth;
        node.ordering = ordering;
        node.touch();

        let mut batch = changed_since(&forest, &before);
        batch.push(node.clone());
        self.store.save_nodes(self.kind, batch).await?;

        tracing::debug!(
            kind = %self.kind,
            id = %node.id,
            left = node.left,
            right = node.right,
            depth = node.depth,
            "inserted node"
        );
        Ok(node)
    }

    /// Relocate the subtree rooted at `node_id` under `new_parent_id`
    /// (or to root level when `None`), preserving relative offsets inside
    /// the subtree and shifting depths uniformly.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NotFound`] when `node_id` does not exist
    /// - [`TreeError::InvalidParent`] when `new_parent_id` does not
    ///   resolve within this forest
    /// - [`TreeError::CircularReference`] when `new_parent_id` is the
    ///   node itself or lies inside the moving subtree; the forest is
    ///   left untouched
    pub async fn move_subtree(
        &self,
        node_id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<TreeNode, TreeError> {
        if new_parent_id == Some(node_id) {
            return Err(TreeError::circular_reference(format!(
                "cannot move node {} under itself",
                node_id
            )));
        }

        let _lease = self
            .store
            .lock_forest(self.kind, self.config.lock_timeout)
            .await?;
        let forest = self.store.load_forest(self.kind).await?;

        let node = forest
            .iter()
            .find(|n| n.id == node_id)
            .cloned()
            .ok_or_else(|| TreeError::not_found(node_id))?;

        if let Some(parent_id) = new_parent_id {
            let parent = forest
                .iter()
                .find(|n| n.id == parent_id)
                .ok_or_else(|| TreeError::invalid_parent(parent_id))?;
            // Containment check replaces graph traversal: a parent inside
            // the moving interval is a descendant.
            if node.encloses(parent) {
                return Err(TreeError::circular_reference(format!(
                    "cannot move node {} under its descendant {}",
                    node_id, parent_id
                )));
            }
        }

        let width = node.width();
        let old_left = node.left;
        let old_right = node.right;
        let old_depth = node.depth;
        let subtree_height = bounds::subtree_max_depth(&forest, &node) - old_depth;

        let before = snapshot_bounds(&forest);
        let (mut subtree, mut rest): (Vec<TreeNode>, Vec<TreeNode>) = forest
            .into_iter()
            .partition(|n| old_left <= n.left && n.right <= old_right);

        bounds::close_gap(&mut rest, old_right, width);

        let (at, new_depth) = match new_parent_id {
            Some(parent_id) => {
                let parent = rest
                    .iter()
                    .find(|n| n.id == parent_id)
                    .ok_or_else(|| TreeError::invalid_parent(parent_id))?;
                (parent.right, parent.depth + 1)
            }
            None => (bounds::max_right(&rest) + 1, 0),
        };

        if new_depth + subtree_height > self.config.max_depth {
            return Err(TreeError::hierarchy_violation(format!(
                "move would exceed maximum depth {}",
                self.config.max_depth
            )));
        }

        let ordering = bounds::next_ordering(&rest, new_parent_id);
        bounds::open_gap(&mut rest, at, width);

        let offset = at - old_left;
        let depth_delta = new_depth - old_depth;
        for n in subtree.iter_mut() {
            n.left += offset;
            n.right += offset;
            n.depth += depth_delta;
        }

        let root_index = subtree
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| {
                TreeError::hierarchy_violation(format!(
                    "subtree of {} lost its root during renumbering",
                    node_id
                ))
            })?;
        subtree[root_index].parent_id = new_parent_id.map(str::to_string);
        subtree[root_index].ordering = ordering;
        subtree[root_index].touch();
        let moved = subtree[root_index].clone();

        let mut batch = changed_since(&rest, &before);
        batch.extend(subtree);
        self.store.save_nodes(self.kind, batch).await?;

        tracing::debug!(
            kind = %self.kind,
            id = %node_id,
            new_parent = ?new_parent_id,
            left = moved.left,
            right = moved.right,
            depth = moved.depth,
            "moved subtree"
        );
        Ok(moved)
    }

    /// Remove the node and, when `cascade` is set, its whole subtree,
    /// then compact the numbering by the removed width.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NotFound`] when `node_id` does not exist
    /// - [`TreeError::HasChildren`] when descendants exist and `cascade`
    ///   is `false`
    pub async fn delete(&self, node_id: &str, cascade: bool) -> Result<DeleteOutcome, TreeError> {
        let _lease = self
            .store
            .lock_forest(self.kind, self.config.lock_timeout)
            .await?;
        let forest = self.store.load_forest(self.kind).await?;

        let node = forest
            .iter()
            .find(|n| n.id == node_id)
            .cloned()
            .ok_or_else(|| TreeError::not_found(node_id))?;

        let descendant_count = node.descendant_count();
        if !cascade && descendant_count > 0 {
            return Err(TreeError::has_children(node_id, descendant_count));
        }

        let width = node.width();
        let before = snapshot_bounds(&forest);
        let (subtree, mut rest): (Vec<TreeNode>, Vec<TreeNode>) = forest
            .into_iter()
            .partition(|n| node.left <= n.left && n.right <= node.right);

        bounds::close_gap(&mut rest, node.right, width);

        let ids: Vec<String> = subtree.iter().map(|n| n.id.clone()).collect();
        let deleted = self.store.delete_nodes(self.kind, &ids).await?;
        let batch = changed_since(&rest, &before);
        if !batch.is_empty() {
            self.store.save_nodes(self.kind, batch).await?;
        }

        tracing::debug!(
            kind = %self.kind,
            id = %node_id,
            deleted,
            removed_width = width,
            "deleted subtree"
        );
        Ok(DeleteOutcome {
            deleted,
            removed_width: width,
        })
    }

    /// Load a single node, failing when absent
    pub async fn node(&self, id: &str) -> Result<TreeNode, TreeError> {
        self.store
            .load_node(self.kind, id)
            .await?
            .ok_or_else(|| TreeError::not_found(id))
    }

    /// Every node whose interval strictly contains `id`'s, root first
    pub async fn ancestors(&self, id: &str) -> Result<Vec<TreeNode>, TreeError> {
        let forest = self.store.load_forest(self.kind).await?;
        let node = forest
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| TreeError::not_found(id))?;

        let mut ancestors: Vec<TreeNode> =
            forest.into_iter().filter(|n| n.encloses(&node)).collect();
        ancestors.sort_by_key(|n| n.depth);
        Ok(ancestors)
    }

    /// Every node whose interval lies strictly inside `id`'s, in interval
    /// order
    pub async fn descendants(&self, id: &str) -> Result<Vec<TreeNode>, TreeError> {
        let forest = self.store.load_forest(self.kind).await?;
        let node = forest
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| TreeError::not_found(id))?;

        Ok(forest.into_iter().filter(|n| node.encloses(n)).collect())
    }

    /// Nodes sharing `id`'s parent, excluding the node itself
    pub async fn siblings(&self, id: &str) -> Result<Vec<TreeNode>, TreeError> {
        let node = self.node(id).await?;
        let mut siblings = self
            .store
            .load_children(self.kind, node.parent_id.as_deref())
            .await?;
        siblings.retain(|n| n.id != id);
        Ok(siblings)
    }

    /// Direct children of `parent_id`, or the forest roots when `None`
    pub async fn children(&self, parent_id: Option<&str>) -> Result<Vec<TreeNode>, TreeError> {
        if let Some(parent_id) = parent_id {
            // Resolve first so a dangling id is an error, not an empty list
            self.node(parent_id).await?;
        }
        Ok(self.store.load_children(self.kind, parent_id).await?)
    }

    /// Verify the forest's structural invariants.
    ///
    /// Checks interval sanity, width vs. descendant count, pairwise
    /// non-overlap, parent resolution, containment, and depth chaining.
    /// Intended for tests and operational integrity sweeps.
    pub async fn audit(&self) -> Result<(), TreeError> {
        let forest = self.store.load_forest(self.kind).await?;
        let by_id: HashMap<&str, &TreeNode> =
            forest.iter().map(|n| (n.id.as_str(), n)).collect();

        let mut seen_bounds = HashSet::new();
        for node in &forest {
            if node.left >= node.right || node.left < 1 {
                return Err(TreeError::hierarchy_violation(format!(
                    "node {} has corrupt bounds ({}, {})",
                    node.id, node.left, node.right
                )));
            }
            for bound in [node.left, node.right] {
                if !seen_bounds.insert(bound) {
                    return Err(TreeError::hierarchy_violation(format!(
                        "bound {} is used twice",
                        bound
                    )));
                }
            }

            let inside = forest.iter().filter(|m| node.encloses(m)).count() as i64;
            if node.right != node.left + 2 * inside + 1 {
                return Err(TreeError::hierarchy_violation(format!(
                    "node {} spans ({}, {}) but contains {} node(s)",
                    node.id, node.left, node.right, inside
                )));
            }

            match node.parent_id.as_deref() {
                Some(parent_id) => {
                    let parent = by_id.get(parent_id).ok_or_else(|| {
                        TreeError::hierarchy_violation(format!(
                            "node {} references missing parent {}",
                            node.id, parent_id
                        ))
                    })?;
                    if !parent.encloses(node) {
                        return Err(TreeError::hierarchy_violation(format!(
                            "node {} lies outside its parent {}",
                            node.id, parent_id
                        )));
                    }
                    if node.depth != parent.depth + 1 {
                        return Err(TreeError::hierarchy_violation(format!(
                            "node {} has depth {}, parent has {}",
                            node.id, node.depth, parent.depth
                        )));
                    }
                }
                None => {
                    if node.depth != 0 {
                        return Err(TreeError::hierarchy_violation(format!(
                            "root {} has depth {}",
                            node.id, node.depth
                        )));
                    }
                }
            }
        }

        for (i, a) in forest.iter().enumerate() {
            for b in &forest[i + 1..] {
                let disjoint = a.right < b.left || b.right < a.left;
                let nested = a.encloses(b) || b.encloses(a);
                if !disjoint && !nested {
                    return Err(TreeError::hierarchy_violation(format!(
                        "intervals of {} and {} partially overlap",
                        a.id, b.id
                    )));
                }
            }
        }

        Ok(())
    }
}
