//! Custom node registry
//!
//!     Custom nodes (image, video and file attachments) have no Markdown representation, so the
//!     portable text carries them as single-line directives:
//!
//!         :::image[src="<url>" name="<fileName>" size="<sizeBytes>" fileId="<id>" alt="<altText>"]:::
//!         :::video[src="<url>" name="<fileName>" size="<sizeBytes>" fileId="<id>"]:::
//!         :::file[src="<url>" name="<fileName>" size="<sizeBytes>" fileId="<id>" type="<mimeType>"]:::
//!
//!     Each kind is described once by a [`DirectiveSpec`]: an ordered attribute list from which
//!     the emitted directive, the matcher regex and the rendered HTML element are all derived.
//!     Adding or renaming an attribute therefore changes every direction at once.
//!
//!     The matcher accepts any run of whitespace between attributes, and optional attributes may
//!     be missing. Values cannot contain `"` or `]`.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::tree::{AssetAttrs, CustomKind, CustomNode};

/// Default MIME type for file attachments.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Loose directive shape used to locate candidates before the per-kind matcher validates them.
static DIRECTIVE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":::(?P<name>[A-Za-z][A-Za-z0-9_-]*)\[(?P<body>[^\]\n]*)\]:::")
        .expect("directive candidate pattern is valid")
});

/// The `AssetAttrs` field an attribute maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetField {
    Url,
    FileName,
    SizeBytes,
    Id,
    AltText,
    MimeType,
}

impl AssetField {
    /// Current value of this field, rendered as directive text.
    pub fn read(&self, attrs: &AssetAttrs) -> Option<String> {
        match self {
            AssetField::Url => attrs.url.clone(),
            AssetField::FileName => attrs.file_name.clone(),
            AssetField::SizeBytes => attrs.size_bytes.map(|n| n.to_string()),
            AssetField::Id => attrs.id.map(|n| n.to_string()),
            AssetField::AltText => attrs.alt_text.clone(),
            AssetField::MimeType => attrs.mime_type.clone(),
        }
    }

    /// Store a parsed directive value. Non-numeric values for numeric fields leave the field empty.
    pub fn write(&self, attrs: &mut AssetAttrs, value: &str) {
        match self {
            AssetField::Url => attrs.url = Some(value.to_string()),
            AssetField::FileName => attrs.file_name = Some(value.to_string()),
            AssetField::SizeBytes => attrs.size_bytes = value.trim().parse().ok(),
            AssetField::Id => attrs.id = value.trim().parse().ok(),
            AssetField::AltText => attrs.alt_text = Some(value.to_string()),
            AssetField::MimeType => attrs.mime_type = Some(value.to_string()),
        }
    }
}

/// One attribute of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Attribute name inside the directive (`src`, `fileId`, ...).
    pub name: &'static str,
    pub field: AssetField,
    /// Required attributes are always emitted and must be present for the matcher to accept.
    pub required: bool,
    /// Attribute name on the rendered HTML element (`data-src`, ...).
    pub html_name: &'static str,
    /// Value used when the node does not carry the field.
    pub default: Option<&'static str>,
}

impl AttributeSpec {
    pub fn required(
        name: &'static str,
        field: AssetField,
        html_name: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            field,
            required: true,
            html_name,
            default: Some(default),
        }
    }

    pub fn optional(
        name: &'static str,
        field: AssetField,
        html_name: &'static str,
        default: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            field,
            required: false,
            html_name,
            default,
        }
    }

    /// Value to emit for `attrs`, `None` when the attribute is left out.
    pub fn value_for(&self, attrs: &AssetAttrs) -> Option<String> {
        self.field
            .read(attrs)
            .or_else(|| self.default.map(str::to_string))
    }
}

/// Schema of one custom node kind.
#[derive(Debug, Clone)]
pub struct DirectiveSpec {
    /// Directive name (`image`, `video`, `file`).
    pub name: String,
    pub kind: CustomKind,
    pub attributes: Vec<AttributeSpec>,
    matcher: Regex,
}

impl DirectiveSpec {
    /// Build a spec, generating its matcher from the attribute list.
    pub fn new(
        name: impl Into<String>,
        kind: CustomKind,
        attributes: Vec<AttributeSpec>,
    ) -> Result<Self, regex::Error> {
        let name = name.into();
        let matcher = Regex::new(&matcher_pattern(&name, &attributes))?;
        Ok(Self {
            name,
            kind,
            attributes,
            matcher,
        })
    }

    pub fn image() -> Self {
        let mut attributes = common_attributes("image.png");
        attributes.push(AttributeSpec::optional(
            "alt",
            AssetField::AltText,
            "data-alt",
            None,
        ));
        Self::new("image", CustomKind::Image, attributes).expect("image directive pattern is valid")
    }

    pub fn video() -> Self {
        Self::new("video", CustomKind::Video, common_attributes("video.mp4"))
            .expect("video directive pattern is valid")
    }

    pub fn file() -> Self {
        let mut attributes = common_attributes("file.pdf");
        attributes.push(AttributeSpec::optional(
            "type",
            AssetField::MimeType,
            "data-file-type",
            Some(DEFAULT_MIME_TYPE),
        ));
        Self::new("file", CustomKind::File, attributes).expect("file directive pattern is valid")
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Emit the directive line for `attrs`.
    pub fn emit(&self, attrs: &AssetAttrs) -> String {
        let mut out = format!(":::{}[", self.name);
        let mut first = true;
        for attribute in &self.attributes {
            let Some(value) = attribute.value_for(attrs) else {
                continue;
            };
            if !first {
                out.push(' ');
            }
            first = false;
            let _ = write!(out, "{}=\"{}\"", attribute.name, value);
        }
        out.push_str("]:::");
        out
    }

    /// Parse a complete directive. Returns `None` when the matcher rejects it.
    pub fn parse(&self, directive: &str) -> Option<CustomNode> {
        let captures = self.matcher.captures(directive)?;
        let mut attrs = AssetAttrs::default();
        for (index, attribute) in self.attributes.iter().enumerate() {
            if let Some(value) = captures.name(&group_name(index)) {
                attribute.field.write(&mut attrs, value.as_str());
            }
        }
        Some(CustomNode {
            kind: self.kind,
            attrs,
        })
    }

    /// `(html attribute, value)` pairs for the rendered element, in schema order.
    pub fn html_attributes(&self, attrs: &AssetAttrs) -> Vec<(&'static str, String)> {
        self.attributes
            .iter()
            .filter_map(|attribute| {
                attribute
                    .value_for(attrs)
                    .map(|value| (attribute.html_name, value))
            })
            .collect()
    }
}

fn common_attributes(default_file_name: &'static str) -> Vec<AttributeSpec> {
    vec![
        AttributeSpec::required("src", AssetField::Url, "data-src", ""),
        AttributeSpec::required(
            "name",
            AssetField::FileName,
            "data-filename",
            default_file_name,
        ),
        AttributeSpec::required("size", AssetField::SizeBytes, "data-size", "0"),
        AttributeSpec::required("fileId", AssetField::Id, "data-file-id", "0"),
    ]
}

fn group_name(index: usize) -> String {
    format!("a{index}")
}

fn matcher_pattern(name: &str, attributes: &[AttributeSpec]) -> String {
    let mut pattern = format!(r"^:::{}\[", regex::escape(name));
    for (index, attribute) in attributes.iter().enumerate() {
        let group = format!(
            r#"\s*{}="(?P<{}>[^"\]]*)""#,
            regex::escape(attribute.name),
            group_name(index)
        );
        if attribute.required {
            pattern.push_str(&group);
        } else {
            let _ = write!(pattern, "(?:{group})?");
        }
    }
    pattern.push_str(r"\s*\]:::$");
    pattern
}

/// A directive found in text, with its byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMatch {
    pub start: usize,
    pub end: usize,
    pub node: CustomNode,
}

/// The set of custom node kinds a converter knows about.
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
    specs: Vec<DirectiveSpec>,
}

impl DirectiveRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Registry with the image, video and file kinds.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DirectiveSpec::image());
        registry.register(DirectiveSpec::video());
        registry.register(DirectiveSpec::file());
        registry
    }

    /// Register a spec, replacing any existing spec with the same directive name or kind.
    pub fn register(&mut self, spec: DirectiveSpec) {
        self.specs
            .retain(|existing| existing.name != spec.name && existing.kind != spec.kind);
        self.specs.push(spec);
    }

    pub fn get(&self, name: &str) -> Option<&DirectiveSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn for_kind(&self, kind: CustomKind) -> Option<&DirectiveSpec> {
        self.specs.iter().find(|spec| spec.kind == kind)
    }

    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name.as_str()).collect()
    }

    /// Emit the directive line for a custom node. Kinds without a spec emit nothing.
    pub fn emit(&self, node: &CustomNode) -> String {
        match self.for_kind(node.kind) {
            Some(spec) => spec.emit(&node.attrs),
            None => {
                debug!(kind = %node.kind, "no directive registered for custom node kind");
                String::new()
            }
        }
    }

    /// Every directive in `text` that a registered matcher accepts, in order.
    ///
    /// Candidates with an unknown name or rejected attributes are skipped and stay literal text.
    pub fn find_all(&self, text: &str) -> Vec<DirectiveMatch> {
        DIRECTIVE_CANDIDATE
            .captures_iter(text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let name = captures.name("name")?.as_str();
                let Some(spec) = self.get(name) else {
                    debug!(name, "skipping directive with unregistered name");
                    return None;
                };
                match spec.parse(whole.as_str()) {
                    Some(node) => Some(DirectiveMatch {
                        start: whole.start(),
                        end: whole.end(),
                        node,
                    }),
                    None => {
                        debug!(
                            directive = whole.as_str(),
                            "directive rejected by its matcher, keeping literal text"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}
