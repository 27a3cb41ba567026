//! Export tests for portable text (tree → portable text)
//!
//! The exported text is parsed back with comrak to check that Markdown readers see the
//! intended structure, not just the expected characters.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use insta::assert_snapshot;
use pmd_babel::{AssetAttrs, Converter, CustomKind, Mark, MarkKind, Marks, Node};

use crate::common::{image, item, marked, para};

fn export(doc: &Node) -> String {
    Converter::default().to_portable_text(doc)
}

fn first_block<'a>(root: &'a AstNode<'a>) -> NodeValue {
    root.first_child()
        .map(|node| node.data.borrow().value.clone())
        .expect("document has a block")
}

#[test]
fn test_empty_document() {
    assert_eq!(export(&Node::document(vec![])), "");
}

#[test]
fn test_custom_image_exact() {
    let doc = Node::document(vec![image(
        7,
        "https://x/a.png",
        "a.png",
        1024,
        Some("A"),
    )]);
    assert_eq!(
        export(&doc),
        r#":::image[src="https://x/a.png" name="a.png" size="1024" fileId="7" alt="A"]:::"#
    );
}

#[test]
fn test_custom_defaults() {
    let doc = Node::document(vec![
        Node::custom(CustomKind::Image, AssetAttrs::default()),
        Node::custom(CustomKind::Video, AssetAttrs::default()),
        Node::custom(CustomKind::File, AssetAttrs::default()),
    ]);
    assert_snapshot!(export(&doc), @r#"
    :::image[src="" name="image.png" size="0" fileId="0"]:::

    :::video[src="" name="video.mp4" size="0" fileId="0"]:::

    :::file[src="" name="file.pdf" size="0" fileId="0" type="application/octet-stream"]:::
    "#);
}

#[test]
fn test_ordered_list_renumbering() {
    let doc = Node::document(vec![Node::OrderedList {
        children: vec![item("a"), item("b"), item("c")],
    }]);
    let md = export(&doc);
    assert_eq!(md, "1. a\n2. b\n3. c");

    let arena = Arena::new();
    let root = parse_document(&arena, &md, &ComrakOptions::default());
    match first_block(root) {
        NodeValue::List(list) => assert_eq!(list.list_type, ListType::Ordered),
        other => panic!("Expected ordered list, got {other:?}"),
    }
    assert_eq!(root.first_child().unwrap().children().count(), 3);
}

#[test]
fn test_inline_marks() {
    let doc = Node::document(vec![Node::paragraph(vec![
        Node::text("plain "),
        marked("bold", &[MarkKind::Bold]),
        Node::text(" "),
        marked("both", &[MarkKind::Italic, MarkKind::Bold]),
        Node::text(" "),
        marked("code", &[MarkKind::Code]),
        Node::text(" "),
        Node::marked_text("home", Marks::new().with(Mark::link("https://e.com"))),
    ])]);
    assert_snapshot!(export(&doc), @"plain **bold** ***both*** `code` [home](https://e.com)");
}

#[test]
fn test_heading_and_blockquote() {
    let doc = Node::document(vec![
        Node::heading(3, vec![Node::text("Notes")]),
        Node::Blockquote {
            children: vec![para("quoted"), para("again")],
        },
    ]);
    let md = export(&doc);
    assert_eq!(md, "### Notes\n\n> quoted\n> again");

    let arena = Arena::new();
    let root = parse_document(&arena, &md, &ComrakOptions::default());
    match first_block(root) {
        NodeValue::Heading(heading) => assert_eq!(heading.level, 3),
        other => panic!("Expected heading, got {other:?}"),
    }
    let quote = root.last_child().unwrap();
    assert!(matches!(quote.data.borrow().value, NodeValue::BlockQuote));
}

#[test]
fn test_table_parses_as_table() {
    let cell = |header: bool, text: &str| Node::TableCell {
        header,
        children: vec![para(text)],
    };
    let doc = Node::document(vec![
        para("Sizes:"),
        Node::Table {
            children: vec![
                Node::TableRow {
                    children: vec![cell(true, "File"), cell(true, "Size")],
                },
                Node::TableRow {
                    children: vec![cell(false, "a.png"), cell(false, "1 KB")],
                },
            ],
        },
    ]);
    let md = export(&doc);
    assert_eq!(
        md,
        "Sizes:\n\n\n| File | Size |\n| --- | --- |\n| a.png | 1 KB |\n"
    );

    let arena = Arena::new();
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    let root = parse_document(&arena, &md, &options);
    let table = root.last_child().unwrap();
    assert!(matches!(table.data.borrow().value, NodeValue::Table(_)));
    assert_eq!(table.children().count(), 2);
}

#[test]
fn test_nested_list_under_bullet() {
    let doc = Node::document(vec![Node::BulletList {
        children: vec![Node::list_item(vec![
            para("parent"),
            Node::BulletList {
                children: vec![item("child")],
            },
        ])],
    }]);
    let md = export(&doc);
    assert_eq!(md, "- parent\n  - child");

    let arena = Arena::new();
    let root = parse_document(&arena, &md, &ComrakOptions::default());
    let outer_item = root.first_child().unwrap().first_child().unwrap();
    let nested = outer_item.last_child().unwrap();
    assert!(matches!(nested.data.borrow().value, NodeValue::List(_)));
}

#[test]
fn test_code_block_uses_configured_default_language() {
    let converter = Converter::with_options(pmd_babel::ConverterOptions {
        default_code_language: "text".to_string(),
        ..Default::default()
    });
    let doc = Node::document(vec![Node::CodeBlock {
        language: None,
        children: vec![Node::text("echo hi")],
    }]);
    assert_eq!(converter.to_portable_text(&doc), "```text\necho hi\n```");
}
