//! Editor JSON snapshot tests.

use pmd_babel::formats::json::{from_editor_json, to_editor_json};
use pmd_babel::{Converter, FormatError, FormatRegistry, Node};
use pretty_assertions::assert_eq;

use crate::common::fixture;

#[test]
fn test_editor_snapshot_to_portable_text() {
    let converter = Converter::default();
    let doc = from_editor_json(&fixture("editor.json")).unwrap();
    assert_eq!(
        converter.to_portable_text(&doc),
        fixture("editor.md").trim_end()
    );
}

#[test]
fn test_editor_snapshot_asset_ids() {
    let converter = Converter::default();
    let doc = from_editor_json(&fixture("editor.json")).unwrap();
    assert_eq!(converter.extract_asset_ids(&doc), vec![21, 22]);
}

#[test]
fn test_json_survives_portable_round_trip() {
    let converter = Converter::default();
    let doc = converter.from_portable_text(fixture("editor.md").trim_end());
    let json = to_editor_json(&doc).unwrap();
    let decoded = from_editor_json(&json).unwrap();
    assert_eq!(decoded, doc);
    assert_eq!(
        converter.to_portable_text(&decoded),
        fixture("editor.md").trim_end()
    );
}

#[test]
fn test_registry_converts_json_to_portable() {
    let registry = FormatRegistry::default();
    let doc = registry.parse(&fixture("editor.json"), "json").unwrap();
    let text = registry.serialize(&doc, "portable").unwrap();
    assert!(text.starts_with("## Trip report\n\n"));
}

#[test]
fn test_invalid_json_is_parse_error() {
    assert!(matches!(
        from_editor_json("{\"type\": "),
        Err(FormatError::ParseError(_))
    ));
    assert!(matches!(
        from_editor_json("42"),
        Err(FormatError::ParseError(_))
    ));
}

#[test]
fn test_empty_doc() {
    let doc = from_editor_json(r#"{"type": "doc"}"#).unwrap();
    assert_eq!(doc, Node::document(vec![]));
}
