//! Export tests for the HTML format
//!
//! These render stored portable text and check the custom node elements and the comrak output
//! around them.

use pmd_babel::format::Format;
use pmd_babel::formats::HtmlFormat;
use pmd_babel::{Converter, ConverterOptions, CustomKind, MarkKind, Node};

use crate::common::{fixture, image, marked, para};

#[test]
fn test_kitchensink_elements() {
    let html = Converter::default().to_html(&fixture("kitchensink.md"));

    assert!(html.contains("<h1>Release notes</h1>"));
    assert!(html.contains(
        r#"<div data-type="custom-image" data-src="https://cdn.example.com/cover.png" data-filename="cover.png" data-size="204800" data-file-id="11" data-alt="Cover"></div>"#
    ));
    assert!(html.contains(r#"<div data-type="custom-video""#));
    assert!(html.contains(r#"data-file-type="application/pdf""#));
    assert!(html.contains("<table>"));
    assert!(html.contains("<blockquote>"));
}

#[test]
fn test_fenced_directive_is_rendered_as_code() {
    let html = Converter::default().to_html(&fixture("kitchensink.md"));

    assert!(!html.contains(r#"data-file-id="99""#));
    assert!(html.contains("<code class=\"language-text\">:::image[src=&quot;x&quot;"));
}

#[test]
fn test_quoted_code_block_directive_is_rendered_as_code() {
    let converter = Converter::default();
    let directive = r#":::image[src="x" name="x.png" size="1" fileId="7"]:::"#;
    let doc = Node::document(vec![Node::Blockquote {
        children: vec![Node::CodeBlock {
            language: Some("text".to_string()),
            children: vec![Node::text(directive)],
        }],
    }]);

    let text = converter.to_portable_text(&doc);
    assert_eq!(text, format!("> ```text\n> {directive}\n> ```"));

    let html = converter.to_html(&text);
    assert!(!html.contains("data-type"));
    assert!(html.contains("<blockquote>"));
    assert!(html.contains("<code class=\"language-text\">:::image[src=&quot;x&quot;"));
    assert!(converter
        .extract_asset_ids(&converter.from_portable_text(&text))
        .is_empty());
}

#[test]
fn test_code_marked_directive_is_rendered_as_code() {
    let converter = Converter::default();
    let directive = r#":::video[src="v" name="v.mp4" size="1" fileId="8"]:::"#;
    let doc = Node::document(vec![Node::paragraph(vec![
        Node::text("type "),
        marked(directive, &[MarkKind::Code]),
    ])]);

    let html = converter.to_html(&converter.to_portable_text(&doc));
    assert_eq!(
        html,
        "<p>type <code>:::video[src=&quot;v&quot; name=&quot;v.mp4&quot; size=&quot;1&quot; fileId=&quot;8&quot;]:::</code></p>\n"
    );
}

#[test]
fn test_directive_paragraph_is_replaced() {
    let html = Converter::default()
        .to_html(r#":::video[src="v.mp4" name="v.mp4" size="1" fileId="2"]:::"#);
    assert_eq!(
        html,
        "<div data-type=\"custom-video\" data-src=\"v.mp4\" data-filename=\"v.mp4\" data-size=\"1\" data-file-id=\"2\"></div>\n"
    );
}

#[test]
fn test_inline_directive_keeps_surrounding_text() {
    let html = Converter::default()
        .to_html(r#"see :::file[src="f" name="f.txt" size="1" fileId="3" type="text/plain"]::: here"#);
    assert!(html.starts_with("<p>see <div data-type=\"custom-file\""));
    assert!(html.ends_with("</div> here</p>\n"));
}

#[test]
fn test_legacy_global_extraction_reaches_into_code() {
    let converter = Converter::with_options(ConverterOptions {
        fence_aware_directives: false,
        ..Default::default()
    });
    let html = converter.to_html(&fixture("kitchensink.md"));
    assert!(html.contains(r#"data-file-id="99""#));
}

#[test]
fn test_format_renders_tree_through_portable_text() {
    let doc = Node::document(vec![
        para("Hello"),
        image(5, "https://x/a.png", "a.png", 10, None),
    ]);
    let html = HtmlFormat::default().serialize(&doc).unwrap();

    assert_eq!(
        html,
        "<p>Hello</p>\n<div data-type=\"custom-image\" data-src=\"https://x/a.png\" data-filename=\"a.png\" data-size=\"10\" data-file-id=\"5\"></div>\n"
    );
    assert_eq!(CustomKind::Image.html_type(), "custom-image");
}

#[test]
fn test_raw_html_is_not_passed_through() {
    let html = Converter::default().to_html("<script>alert(1)</script>");
    assert!(!html.contains("<script>"));
}
