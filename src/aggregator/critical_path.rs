//! Critical path selection over a built span forest.
//!
//! For each root, one path is walked down to a leaf: at every node the child
//! finishing last (without finishing after its parent) is followed. Children
//! that overrun their parent come from noisy timestamps and are ignored; if
//! no child qualifies the first child is taken, so every root yields a path.

use crate::model::{SpanForest, SpanNode};
use log::debug;
use std::collections::HashSet;

/// Compute and mark the critical path
///
/// **Public** - main entry point for critical path analysis
///
/// # Arguments
/// * `forest` - Built forest; visited nodes get `on_critical_path = true`
///
/// # Returns
/// Span ids on the path, one root-to-leaf path per root in forest order
pub fn compute_critical_path(forest: &mut SpanForest) -> Vec<String> {
    let mut path = Vec::new();

    for root in &mut forest.roots {
        walk_dominant(root, &mut path);
    }

    debug!(
        "Critical path covers {} spans across {} roots",
        path.len(),
        forest.roots.len()
    );

    path
}

/// Follow the dominant child from `node` down to a leaf
fn walk_dominant(node: &mut SpanNode, path: &mut Vec<String>) {
    let mut current = node;

    loop {
        current.on_critical_path = true;
        path.push(current.id.clone());

        let Some(next) = select_dominant_child(current) else {
            break;
        };
        current = &mut current.children[next];
    }
}

/// Index of the child to follow, `None` at a leaf
///
/// Ties on end time keep the earlier child.
fn select_dominant_child(node: &SpanNode) -> Option<usize> {
    if node.is_leaf() {
        return None;
    }

    let parent_end = node.end_offset_ms();
    let mut best: Option<(usize, i64)> = None;

    for (i, child) in node.children.iter().enumerate() {
        let end = child.end_offset_ms();
        if end > parent_end {
            continue;
        }
        if best.map_or(true, |(_, best_end)| end > best_end) {
            best = Some((i, end));
        }
    }

    Some(best.map_or(0, |(i, _)| i))
}

/// Re-apply critical path flags from a known id set
///
/// Every node in the forest is visited; its flag is set to whether its id
/// is in `path_ids`. Used when a tree is rebuilt separately from the path.
pub fn mark_critical_path<S: AsRef<str>>(forest: &mut SpanForest, path_ids: &[S]) {
    let ids: HashSet<&str> = path_ids.iter().map(|id| id.as_ref()).collect();

    let mut stack: Vec<&mut SpanNode> = forest.roots.iter_mut().collect();
    while let Some(node) = stack.pop() {
        node.on_critical_path = ids.contains(node.id.as_str());
        stack.extend(node.children.iter_mut());
    }
}

/// Share of `total_duration_ms` taken by `node`, as a percentage
///
/// Returns 0 when the total is 0.
pub fn compute_critical_path_contribution(node: &SpanNode, total_duration_ms: u64) -> f64 {
    if total_duration_ms == 0 {
        return 0.0;
    }
    (node.duration_ms as f64 / total_duration_ms as f64) * 100.0
}
