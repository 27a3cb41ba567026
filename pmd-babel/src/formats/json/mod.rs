//! Editor JSON interchange
//!
//! The editing surface hands documents over as JSON snapshots:
//!
//!     {"type": "doc", "content": [{"type": "paragraph", "content": [
//!         {"type": "text", "text": "hi", "marks": [{"type": "bold"}]}]}]}
//!
//! Decoding is tolerant: unknown node types become [`Node::Unknown`], unknown marks are dropped,
//! and attributes that are missing or malformed are treated as absent. Custom node attributes
//! are read under both their canonical names and the editor's own names:
//!
//! | Field      | Canonical   | Editor     |
//! |------------|-------------|------------|
//! | id         | `id`        | `fileId`   |
//! | url        | `url`       | `src`      |
//! | file name  | `fileName`  | `filename` |
//! | size       | `sizeBytes` | `size`     |
//! | alt text   | `altText`   | `alt`      |
//! | MIME type  | `mimeType`  | `fileType` |
//!
//! Numbers may be JSON numbers or numeric strings. Encoding writes the editor's names, so the
//! output can be loaded straight back into the editor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::FormatError;
use crate::format::Format;
use crate::tree::{AssetAttrs, CustomKind, Mark, MarkKind, Marks, Node};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct JsonNode {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<Vec<JsonNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    marks: Option<Vec<JsonMark>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonMark {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,
}

/// Decode an editor snapshot.
pub fn from_editor_json(source: &str) -> Result<Node, FormatError> {
    let root: JsonNode = serde_json::from_str(source)
        .map_err(|e| FormatError::ParseError(format!("Invalid editor JSON: {e}")))?;
    Ok(decode(&root))
}

/// Encode a tree as an editor snapshot.
pub fn to_editor_json(root: &Node) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&encode(root))
        .map_err(|e| FormatError::SerializationError(format!("JSON encoding failed: {e}")))
}

fn decode(node: &JsonNode) -> Node {
    let children = || -> Vec<Node> {
        node.content
            .iter()
            .flatten()
            .map(decode)
            .collect()
    };
    let attrs = node.attrs.as_ref();

    match node.kind.as_str() {
        "doc" => Node::Document {
            children: children(),
        },
        "paragraph" => Node::Paragraph {
            children: children(),
        },
        "heading" => {
            let level = read_u64(attrs, &["level"])
                .and_then(|level| u8::try_from(level).ok())
                .unwrap_or(1);
            Node::heading(level, children())
        }
        "bulletList" => Node::BulletList {
            children: children(),
        },
        "orderedList" => Node::OrderedList {
            children: children(),
        },
        "listItem" => Node::ListItem {
            children: children(),
        },
        "blockquote" => Node::Blockquote {
            children: children(),
        },
        "codeBlock" | "customCodeBlock" => Node::CodeBlock {
            language: read_string(attrs, &["language"]).filter(|lang| !lang.is_empty()),
            children: children(),
        },
        "table" => Node::Table {
            children: children(),
        },
        "tableRow" => Node::TableRow {
            children: children(),
        },
        "tableCell" => Node::TableCell {
            header: false,
            children: children(),
        },
        "tableHeader" => Node::TableCell {
            header: true,
            children: children(),
        },
        "text" => Node::Text {
            text: node.text.clone().unwrap_or_default(),
            marks: decode_marks(node.marks.as_deref().unwrap_or_default()),
        },
        "hardBreak" => Node::HardBreak,
        other => match CustomKind::from_node_type(other) {
            Some(kind) => Node::custom(kind, decode_asset_attrs(attrs)),
            None => {
                debug!(kind = other, "keeping unknown editor node type");
                Node::Unknown {
                    kind: other.to_string(),
                    children: children(),
                }
            }
        },
    }
}

fn decode_marks(marks: &[JsonMark]) -> Marks {
    marks
        .iter()
        .filter_map(|mark| {
            let Some(kind) = MarkKind::from_name(&mark.kind) else {
                debug!(mark = %mark.kind, "dropping unsupported mark");
                return None;
            };
            Some(match kind {
                MarkKind::Link => Mark {
                    kind,
                    href: read_string(mark.attrs.as_ref(), &["href"]),
                },
                _ => Mark::new(kind),
            })
        })
        .collect()
}

fn decode_asset_attrs(attrs: Option<&Map<String, Value>>) -> AssetAttrs {
    AssetAttrs {
        id: read_u64(attrs, &["id", "fileId"]),
        url: read_string(attrs, &["url", "src"]),
        file_name: read_string(attrs, &["fileName", "filename"]),
        size_bytes: read_u64(attrs, &["sizeBytes", "size"]),
        alt_text: read_string(attrs, &["altText", "alt"]),
        mime_type: read_string(attrs, &["mimeType", "fileType"]),
    }
}

/// Values stored under `keys`, in key order, nulls skipped.
fn lookup<'a>(attrs: Option<&'a Map<String, Value>>, keys: &[&str]) -> Vec<&'a Value> {
    let Some(attrs) = attrs else {
        return Vec::new();
    };
    keys.iter()
        .filter_map(|key| attrs.get(*key))
        .filter(|value| !value.is_null())
        .collect()
}

fn read_u64(attrs: Option<&Map<String, Value>>, keys: &[&str]) -> Option<u64> {
    lookup(attrs, keys).into_iter().find_map(|value| match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn read_string(attrs: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
    lookup(attrs, keys).into_iter().find_map(|value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn encode(node: &Node) -> JsonNode {
    let content = |children: &[Node]| Some(children.iter().map(encode).collect());
    let mut attrs = Map::new();

    let mut json = match node {
        Node::Text { text, marks } => JsonNode {
            kind: "text".to_string(),
            text: Some(text.clone()),
            marks: (!marks.is_empty()).then(|| marks.iter().map(encode_mark).collect()),
            ..Default::default()
        },
        Node::HardBreak => JsonNode {
            kind: "hardBreak".to_string(),
            ..Default::default()
        },
        Node::Custom(custom) => {
            let a = &custom.attrs;
            insert(&mut attrs, "fileId", a.id.map(Value::from));
            insert(&mut attrs, "src", a.url.clone().map(Value::from));
            insert(&mut attrs, "filename", a.file_name.clone().map(Value::from));
            insert(&mut attrs, "size", a.size_bytes.map(Value::from));
            insert(&mut attrs, "alt", a.alt_text.clone().map(Value::from));
            insert(&mut attrs, "fileType", a.mime_type.clone().map(Value::from));
            JsonNode {
                kind: custom.kind.node_type().to_string(),
                ..Default::default()
            }
        }
        other => {
            match other {
                Node::Heading { level, .. } => {
                    insert(&mut attrs, "level", Some(Value::from(*level)))
                }
                Node::CodeBlock { language, .. } => {
                    insert(&mut attrs, "language", language.clone().map(Value::from))
                }
                _ => {}
            }
            JsonNode {
                kind: other.kind_name().to_string(),
                content: content(other.children()),
                ..Default::default()
            }
        }
    };

    if !attrs.is_empty() {
        json.attrs = Some(attrs);
    }
    json
}

fn encode_mark(mark: &Mark) -> JsonMark {
    let attrs = mark.href.as_ref().map(|href| {
        let mut attrs = Map::new();
        attrs.insert("href".to_string(), Value::from(href.clone()));
        attrs
    });
    JsonMark {
        kind: mark.kind.name().to_string(),
        attrs,
    }
}

fn insert(attrs: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        attrs.insert(key.to_string(), value);
    }
}

/// Format implementation for editor JSON snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Editor JSON snapshot"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        from_editor_json(source)
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        to_editor_json(doc)
    }
}
