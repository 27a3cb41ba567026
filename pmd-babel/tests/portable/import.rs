//! Import tests for portable text (portable text → tree)
//!
//! These tests verify the tree structure the editor receives for stored documents.

use pmd_babel::{Converter, ConverterOptions, CustomKind, MarkKind, Node};
use pretty_assertions::assert_eq;

use crate::common::{custom_nodes, fixture, image, item, marked, para};

fn import(text: &str) -> Node {
    Converter::default().from_portable_text(text)
}

#[test]
fn test_empty_input() {
    assert_eq!(import(""), Node::document(vec![]));
}

#[test]
fn test_custom_image_exact() {
    let doc = import(
        r#":::image[src="https://x/a.png" name="a.png" size="1024" fileId="7" alt="A"]:::"#,
    );
    assert_eq!(
        doc,
        Node::document(vec![image(7, "https://x/a.png", "a.png", 1024, Some("A"))])
    );
}

#[test]
fn test_kitchensink_structure() {
    let doc = import(&fixture("kitchensink.md"));
    let blocks = doc.children();

    assert_eq!(blocks[0], Node::heading(1, vec![Node::text("Release notes")]));
    assert!(matches!(&blocks[1], Node::Paragraph { children } if children.contains(&Node::HardBreak)));
    assert_eq!(blocks[2], Node::heading(2, vec![Node::text("Media")]));

    let kinds: Vec<_> = custom_nodes(&doc)
        .into_iter()
        .map(|node| match node {
            Node::Custom(custom) => custom.kind,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![CustomKind::Image, CustomKind::Video, CustomKind::File]
    );

    assert!(blocks
        .iter()
        .any(|block| matches!(block, Node::OrderedList { children } if children.len() == 3)));
    assert!(blocks
        .iter()
        .any(|block| matches!(block, Node::Blockquote { .. })));
    assert!(matches!(blocks.last(), Some(Node::Table { children }) if children.len() == 2));
}

#[test]
fn test_fenced_directive_stays_code() {
    let doc = import(&fixture("kitchensink.md"));
    let code = doc
        .children()
        .iter()
        .find(|block| matches!(block, Node::CodeBlock { .. }))
        .expect("kitchensink has a code block");

    assert_eq!(
        code,
        &Node::CodeBlock {
            language: Some("text".to_string()),
            children: vec![Node::text(
                r#":::image[src="x" name="x.png" size="1" fileId="99"]:::"#
            )],
        }
    );
}

#[test]
fn test_directive_between_lines_splits_paragraph() {
    let doc = import(
        "first line\n:::video[src=\"v\" name=\"v.mp4\" size=\"2\" fileId=\"4\"]:::\nlast line",
    );
    let blocks = doc.children();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0], para("first line"));
    assert!(matches!(&blocks[1], Node::Custom(custom) if custom.kind == CustomKind::Video));
    assert_eq!(blocks[2], para("last line"));
}

#[test]
fn test_directive_inside_list_item() {
    let doc = import("- intro\n- :::image[src=\"u\" name=\"n.png\" size=\"1\" fileId=\"8\"]:::");
    let Node::BulletList { children } = &doc.children()[0] else {
        panic!("expected bullet list, got {doc:?}");
    };
    assert_eq!(children[0], item("intro"));
    assert_eq!(
        children[1],
        Node::list_item(vec![image(8, "u", "n.png", 1, None)])
    );
}

#[test]
fn test_malformed_directive_is_literal() {
    let text = r#":::image[src="u" name="n.png" size="1"]:::"#;
    assert_eq!(import(text), Node::document(vec![para(text)]));

    let unknown = r#":::audio[src="u"]:::"#;
    assert_eq!(import(unknown), Node::document(vec![para(unknown)]));
}

#[test]
fn test_directive_in_table_cell_becomes_custom_node() {
    let text = "| a |\n| --- |\n| see :::video[src=\"v\" name=\"v.mp4\" size=\"1\" fileId=\"2\"]::: |";
    let doc = import(text);
    let Node::Table { children: rows } = &doc.children()[0] else {
        panic!("expected table, got {doc:?}");
    };
    let cell = &rows[1].children()[0];
    assert_eq!(cell.children()[0], para("see"));
    assert!(matches!(&cell.children()[1], Node::Custom(custom) if custom.kind == CustomKind::Video));
}

#[test]
fn test_strikethrough_text_is_kept_unmarked() {
    let converter = Converter::with_options(ConverterOptions {
        strikethrough: true,
        ..Default::default()
    });
    let doc = converter.from_portable_text("~~gone~~ **kept**");
    assert_eq!(
        doc,
        Node::document(vec![Node::paragraph(vec![
            Node::text("gone "),
            marked("kept", &[MarkKind::Bold]),
        ])])
    );
}

#[test]
fn test_image_markdown_is_literal() {
    assert_eq!(
        import("![alt text](https://x/p.png)"),
        Node::document(vec![para("![alt text](https://x/p.png)")])
    );
}
