//! Interval arithmetic for nested-set renumbering.
//!
//! Pure helpers over in-memory forest snapshots; the operation logic in
//! the parent module decides what to shift and commits the result.

use crate::models::TreeNode;

/// Shift every bound at or beyond `at` up by `width` (opens a gap)
pub(crate) fn open_gap(nodes: &mut [TreeNode], at: i64, width: i64) {
    for node in nodes.iter_mut() {
        if node.left >= at {
            node.left += width;
        }
        if node.right >= at {
            node.right += width;
        }
    }
}

/// Shift every bound strictly beyond `after` down by `width` (closes a gap)
pub(crate) fn close_gap(nodes: &mut [TreeNode], after: i64, width: i64) {
    for node in nodes.iter_mut() {
        if node.left > after {
            node.left -= width;
        }
        if node.right > after {
            node.right -= width;
        }
    }
}

/// Highest `right` bound across the forest, 0 when empty
pub(crate) fn max_right(nodes: &[TreeNode]) -> i64 {
    nodes.iter().map(|n| n.right).max().unwrap_or(0)
}

/// Next advisory ordering among the children of `parent_id` (append
/// semantics: `max + 1`, starting at 1)
pub(crate) fn next_ordering(nodes: &[TreeNode], parent_id: Option<&str>) -> i64 {
    nodes
        .iter()
        .filter(|n| n.parent_id.as_deref() == parent_id)
        .map(|n| n.ordering)
        .max()
        .map_or(1, |m| m + 1)
}

/// Deepest depth found inside `root`'s interval (at least `root.depth`)
pub(crate) fn subtree_max_depth(nodes: &[TreeNode], root: &TreeNode) -> i64 {
    nodes
        .iter()
        .filter(|n| root.left <= n.left && n.right <= root.right)
        .map(|n| n.depth)
        .max()
        .unwrap_or(root.depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HierarchyKind;
    use serde_json::json;

    fn node(id: &str, left: i64, right: i64, depth: i64, parent: Option<&str>) -> TreeNode {
        let mut n = TreeNode::new(
            HierarchyKind::Category,
            id.to_string(),
            parent.map(str::to_string),
            json!({}),
        );
        n.id = id.to_string();
        n.left = left;
        n.right = right;
        n.depth = depth;
        n
    }

    fn bounds_of(nodes: &[TreeNode], id: &str) -> (i64, i64) {
        let n = nodes.iter().find(|n| n.id == id).unwrap();
        (n.left, n.right)
    }

    #[test]
    fn test_open_gap_shifts_bounds_at_point() {
        // A(1,4) with child B(2,3); opening width 2 at A's right bound
        let mut forest = vec![node("a", 1, 4, 0, None), node("b", 2, 3, 1, Some("a"))];
        open_gap(&mut forest, 4, 2);

        assert_eq!(bounds_of(&forest, "a"), (1, 6));
        assert_eq!(bounds_of(&forest, "b"), (2, 3));
    }

    #[test]
    fn test_close_gap_shifts_only_beyond() {
        let mut forest = vec![
            node("a", 1, 2, 0, None),
            node("b", 3, 6, 0, None),
            node("c", 7, 8, 0, None),
        ];
        // Remove b's interval (width 4)
        forest.remove(1);
        close_gap(&mut forest, 6, 4);

        assert_eq!(bounds_of(&forest, "a"), (1, 2));
        assert_eq!(bounds_of(&forest, "c"), (3, 4));
    }

    #[test]
    fn test_max_right() {
        assert_eq!(max_right(&[]), 0);
        let forest = vec![node("a", 1, 4, 0, None), node("b", 5, 6, 0, None)];
        assert_eq!(max_right(&forest), 6);
    }

    #[test]
    fn test_next_ordering_appends() {
        let mut a = node("a", 1, 2, 0, None);
        a.ordering = 1;
        let mut b = node("b", 3, 4, 0, None);
        b.ordering = 4;
        let forest = vec![a, b];

        assert_eq!(next_ordering(&forest, None), 5);
        assert_eq!(next_ordering(&forest, Some("a")), 1);
    }

    #[test]
    fn test_subtree_max_depth() {
        let forest = vec![
            node("a", 1, 6, 0, None),
            node("b", 2, 5, 1, Some("a")),
            node("c", 3, 4, 2, Some("b")),
        ];
        assert_eq!(subtree_max_depth(&forest, &forest[0]), 2);
        assert_eq!(subtree_max_depth(&forest, &forest[2]), 2);
    }
}
