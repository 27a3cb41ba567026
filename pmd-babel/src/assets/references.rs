//! Asset reference extraction
//!
//! Before a post is persisted, the caller needs the ids of the uploaded files it still uses so
//! the storage side can keep them and release the rest.

use std::collections::HashSet;

use crate::tree::Node;

/// Unique positive asset ids referenced by custom nodes, in depth-first pre-order of first
/// occurrence. Custom nodes without an id, or with id 0, contribute nothing.
pub fn extract_asset_ids(root: &Node) -> Vec<u64> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    collect(root, &mut seen, &mut ids);
    ids
}

fn collect(node: &Node, seen: &mut HashSet<u64>, ids: &mut Vec<u64>) {
    if let Node::Custom(custom) = node {
        if let Some(id) = custom.attrs.asset_id() {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }
    for child in node.children() {
        collect(child, seen, ids);
    }
}

/// Ids from `previous` that `root` no longer references, in `previous` order without repeats.
pub fn orphaned_assets(previous: &[u64], root: &Node) -> Vec<u64> {
    let current: HashSet<u64> = extract_asset_ids(root).into_iter().collect();
    let mut reported = HashSet::new();
    previous
        .iter()
        .copied()
        .filter(|id| !current.contains(id) && reported.insert(*id))
        .collect()
}
