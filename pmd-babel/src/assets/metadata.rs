//! Upload metadata
//!
//! Validation rules and helpers for files before and after they reach the upload service:
//! category detection, allowed extensions, size limits, human readable sizes, and turning the
//! service's response into a custom node ready to be inserted in the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::tree::{AssetAttrs, CustomKind, CustomNode};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv"];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "zip", "rar", "7z",
];

/// Storage category of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetCategory {
    Image,
    Video,
    Document,
}

impl AssetCategory {
    /// Category from a MIME type: `image/*`, `video/*`, anything else is a document.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            AssetCategory::Image
        } else if mime_type.starts_with("video/") {
            AssetCategory::Video
        } else {
            AssetCategory::Document
        }
    }

    /// Allowed file extensions, lowercase and without the dot.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            AssetCategory::Image => IMAGE_EXTENSIONS,
            AssetCategory::Video => VIDEO_EXTENSIONS,
            AssetCategory::Document => DOCUMENT_EXTENSIONS,
        }
    }

    /// Largest accepted upload, in bytes.
    pub fn max_size(&self) -> u64 {
        match self {
            AssetCategory::Image => 5 * MIB,
            AssetCategory::Video => 100 * MIB,
            AssetCategory::Document => GIB,
        }
    }

    /// The custom node kind this category is embedded as.
    pub fn custom_kind(&self) -> CustomKind {
        match self {
            AssetCategory::Image => CustomKind::Image,
            AssetCategory::Video => CustomKind::Video,
            AssetCategory::Document => CustomKind::File,
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetCategory::Image => "image",
            AssetCategory::Video => "video",
            AssetCategory::Document => "document",
        })
    }
}

/// Lowercase extension of `file_name`, empty when it has none.
fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Check a file before upload. Returns its category when extension and size are acceptable.
pub fn validate_upload(
    file_name: &str,
    size_bytes: u64,
    mime_type: &str,
) -> Result<AssetCategory, AssetError> {
    let category = AssetCategory::from_mime(mime_type);

    let extension = extension_of(file_name);
    if !category.allowed_extensions().contains(&extension.as_str()) {
        return Err(AssetError::ExtensionNotAllowed {
            extension,
            category,
        });
    }

    if size_bytes > category.max_size() {
        return Err(AssetError::TooLarge {
            size: size_bytes,
            limit: category.max_size(),
            category,
        });
    }

    Ok(category)
}

/// Human readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `100 MB`, `1 GB`.
///
/// Values are rounded to two decimals; units stop at GB.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes >= KIB.pow(unit as u32 + 1) {
        unit += 1;
    }
    let value = bytes as f64 / KIB.pow(unit as u32) as f64;
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

/// What the upload service returns for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub id: u64,
    pub url: String,
    #[serde(alias = "originalName")]
    pub file_name: String,
    #[serde(default, alias = "fileSize")]
    pub size_bytes: u64,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, alias = "fileMetadataType")]
    pub category: Option<AssetCategory>,
}

impl UploadedAsset {
    /// Category reported by the service, else derived from the MIME type.
    pub fn category(&self) -> AssetCategory {
        self.category.unwrap_or_else(|| {
            AssetCategory::from_mime(self.mime_type.as_deref().unwrap_or_default())
        })
    }

    /// The custom node to insert into the editor tree for this upload.
    pub fn to_custom_node(&self) -> CustomNode {
        let kind = self.category().custom_kind();
        CustomNode {
            kind,
            attrs: AssetAttrs {
                id: Some(self.id),
                url: Some(self.url.clone()),
                file_name: Some(self.file_name.clone()),
                size_bytes: Some(self.size_bytes),
                alt_text: None,
                mime_type: match kind {
                    CustomKind::File => self.mime_type.clone(),
                    CustomKind::Image | CustomKind::Video => None,
                },
            },
        }
    }
}
