//! Round trip tests: tree → portable text → tree, and text → tree → text.

use pmd_babel::{AssetAttrs, Converter, CustomKind, Node};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::{fixture, image};

fn normalize(converter: &Converter, text: &str) -> String {
    converter.to_portable_text(&converter.from_portable_text(text))
}

#[test]
fn test_custom_image_exact() {
    let converter = Converter::default();
    let doc = Node::document(vec![image(
        7,
        "https://x/a.png",
        "a.png",
        1024,
        Some("A"),
    )]);

    let text = converter.to_portable_text(&doc);
    assert_eq!(
        text,
        r#":::image[src="https://x/a.png" name="a.png" size="1024" fileId="7" alt="A"]:::"#
    );
    assert_eq!(converter.from_portable_text(&text), doc);
}

#[test]
fn test_canonical_text_is_preserved() {
    let converter = Converter::default();
    for text in [
        "# Title\n\nBody text",
        "## Sub\n\n### Third",
        "- a\n- b\n  - c",
        "1. one\n2. two",
        "**bold** and *italic* and `code`",
        "see [the docs](https://example.com/docs)",
        "line one\nline two",
        "> quoted\n> twice",
        "```rust\nfn main() {}\n```",
    ] {
        assert_eq!(normalize(&converter, text), text, "for input {text:?}");
    }
}

#[test]
fn test_kitchensink_is_stable() {
    let converter = Converter::default();
    let once = normalize(&converter, &fixture("kitchensink.md"));
    let twice = normalize(&converter, &once);
    assert_eq!(twice, once);
}

#[test]
fn test_editor_fixture_is_stable() {
    let converter = Converter::default();
    let source = fixture("editor.md");
    let source = source.trim_end();
    assert_eq!(normalize(&converter, source), source);
}

#[test]
fn test_tree_is_stable() {
    let converter = Converter::default();
    let tree = converter.from_portable_text(&fixture("kitchensink.md"));
    let again = converter.from_portable_text(&converter.to_portable_text(&tree));
    assert_eq!(again, tree);
}

#[test]
fn test_custom_node_in_table_cell_keeps_its_id() {
    let converter = Converter::default();
    let cell = |children: Vec<Node>| Node::TableCell {
        header: false,
        children,
    };
    let doc = Node::document(vec![Node::Table {
        children: vec![
            Node::TableRow {
                children: vec![cell(vec![Node::paragraph(vec![Node::text("h")])])],
            },
            Node::TableRow {
                children: vec![cell(vec![image(42, "u", "n.png", 1, None)])],
            },
        ],
    }]);

    let parsed = converter.from_portable_text(&converter.to_portable_text(&doc));
    assert_eq!(converter.extract_asset_ids(&doc), vec![42]);
    assert_eq!(converter.extract_asset_ids(&parsed), vec![42]);

    let Node::Table { children: rows } = &parsed.children()[0] else {
        panic!("expected table, got {parsed:?}");
    };
    assert_eq!(rows[1].children()[0], cell(vec![image(42, "u", "n.png", 1, None)]));
}

fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ._/:-]{1,24}"
}

fn custom_node() -> impl Strategy<Value = Node> {
    (
        prop::sample::select(CustomKind::ALL.to_vec()),
        1u64..u64::MAX,
        value(),
        value(),
        0u64..u64::MAX,
        prop::option::of(value()),
        "[a-z]{1,12}/[a-z0-9.+-]{1,16}",
    )
        .prop_map(|(kind, id, url, file_name, size, alt, mime)| {
            Node::custom(
                kind,
                AssetAttrs {
                    id: Some(id),
                    url: Some(url),
                    file_name: Some(file_name),
                    size_bytes: Some(size),
                    alt_text: match kind {
                        CustomKind::Image => alt,
                        CustomKind::Video | CustomKind::File => None,
                    },
                    mime_type: match kind {
                        CustomKind::File => Some(mime),
                        CustomKind::Image | CustomKind::Video => None,
                    },
                },
            )
        })
}

proptest! {
    #[test]
    fn custom_nodes_survive_round_trip(nodes in prop::collection::vec(custom_node(), 1..5)) {
        let converter = Converter::default();
        let doc = Node::document(nodes);
        let text = converter.to_portable_text(&doc);
        prop_assert_eq!(converter.from_portable_text(&text), doc);
    }

    #[test]
    fn asset_ids_survive_round_trip(nodes in prop::collection::vec(custom_node(), 0..5)) {
        let converter = Converter::default();
        let doc = Node::document(nodes);
        let parsed = converter.from_portable_text(&converter.to_portable_text(&doc));
        prop_assert_eq!(
            converter.extract_asset_ids(&parsed),
            converter.extract_asset_ids(&doc)
        );
    }
}
