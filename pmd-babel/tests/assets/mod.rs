//! Asset reference tests on parsed documents.

use pmd_babel::assets::{validate_upload, AssetCategory, UploadedAsset};
use pmd_babel::{orphaned_assets, Converter, Node};
use pretty_assertions::assert_eq;

use crate::common::fixture;

#[test]
fn test_kitchensink_ids_skip_fenced_directive() {
    let converter = Converter::default();
    let doc = converter.from_portable_text(&fixture("kitchensink.md"));
    assert_eq!(converter.extract_asset_ids(&doc), vec![11, 12, 13]);
}

#[test]
fn test_duplicates_reported_once() {
    let converter = Converter::default();
    let doc = converter.from_portable_text(concat!(
        ":::image[src=\"a\" name=\"a.png\" size=\"1\" fileId=\"5\"]:::\n\n",
        ":::video[src=\"b\" name=\"b.mp4\" size=\"2\" fileId=\"9\"]:::\n\n",
        "- :::image[src=\"a\" name=\"a.png\" size=\"1\" fileId=\"5\"]:::",
    ));
    assert_eq!(converter.extract_asset_ids(&doc), vec![5, 9]);
}

#[test]
fn test_zero_and_malformed_ids_are_skipped() {
    let converter = Converter::default();
    let doc = converter.from_portable_text(concat!(
        ":::file[src=\"a\" name=\"a.pdf\" size=\"1\" fileId=\"0\"]:::\n\n",
        ":::file[src=\"b\" name=\"b.pdf\" size=\"1\" fileId=\"abc\"]:::\n\n",
        ":::file[src=\"c\" name=\"c.pdf\" size=\"1\" fileId=\"3\"]:::",
    ));
    assert_eq!(converter.extract_asset_ids(&doc), vec![3]);
}

#[test]
fn test_empty_document_has_no_ids() {
    let converter = Converter::default();
    assert!(converter
        .extract_asset_ids(&converter.from_portable_text(""))
        .is_empty());
}

#[test]
fn test_orphaned_after_edit() {
    let converter = Converter::default();
    let edited = converter.from_portable_text(&fixture("kitchensink.md"));
    assert_eq!(orphaned_assets(&[11, 40, 13, 41, 40], &edited), vec![40, 41]);
    assert!(orphaned_assets(&[], &edited).is_empty());
}

#[test]
fn test_upload_becomes_referenced_node() {
    let converter = Converter::default();
    let asset: UploadedAsset = serde_json::from_str(
        r#"{"id": 77, "url": "https://cdn/p.png", "fileName": "p.png",
            "sizeBytes": 4096, "mimeType": "image/png"}"#,
    )
    .unwrap();

    assert_eq!(
        validate_upload(&asset.file_name, asset.size_bytes, "image/png"),
        Ok(AssetCategory::Image)
    );

    let doc = Node::document(vec![Node::Custom(asset.to_custom_node())]);
    let text = converter.to_portable_text(&doc);
    assert_eq!(
        text,
        r#":::image[src="https://cdn/p.png" name="p.png" size="4096" fileId="77"]:::"#
    );
    assert_eq!(
        converter.extract_asset_ids(&converter.from_portable_text(&text)),
        vec![77]
    );
}
