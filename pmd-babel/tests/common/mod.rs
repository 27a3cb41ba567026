//! Shared helpers for the integration tests.

use std::path::PathBuf;

use pmd_babel::{AssetAttrs, CustomKind, Mark, MarkKind, Marks, Node};

/// Read a file from tests/fixtures.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

pub fn para(text: &str) -> Node {
    Node::paragraph(vec![Node::text(text)])
}

pub fn item(text: &str) -> Node {
    Node::list_item(vec![para(text)])
}

pub fn marked(text: &str, kinds: &[MarkKind]) -> Node {
    let marks: Marks = kinds.iter().map(|kind| Mark::new(*kind)).collect();
    Node::marked_text(text, marks)
}

pub fn image(id: u64, url: &str, file_name: &str, size: u64, alt: Option<&str>) -> Node {
    Node::custom(
        CustomKind::Image,
        AssetAttrs {
            id: Some(id),
            url: Some(url.to_string()),
            file_name: Some(file_name.to_string()),
            size_bytes: Some(size),
            alt_text: alt.map(str::to_string),
            mime_type: None,
        },
    )
}

/// Custom nodes of `root`, depth-first.
pub fn custom_nodes(root: &Node) -> Vec<&Node> {
    let mut found = Vec::new();
    collect_custom(root, &mut found);
    found
}

fn collect_custom<'a>(node: &'a Node, found: &mut Vec<&'a Node>) {
    if matches!(node, Node::Custom(_)) {
        found.push(node);
    }
    for child in node.children() {
        collect_custom(child, found);
    }
}
