//! Document tree model shared by the editor and the converters.
//!
//!     The tree is the canonical in-memory form of a post body. It is built either by the
//!     editing surface (and handed over as an editor JSON snapshot, see formats/json) or by the
//!     portable text parser. It is never persisted directly: only its portable text form is.
//!
//!     Node kinds form a closed set, so every converter matches exhaustively. Foreign kinds coming
//!     from an editor snapshot land in [`Node::Unknown`], which converters treat as a plain
//!     container of its children.

use std::fmt;

/// Highest heading level the tree carries. Anything outside `1..=MAX_HEADING_LEVEL` is clamped to 1.
pub const MAX_HEADING_LEVEL: u8 = 3;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document { children: Vec<Node> },
    Paragraph { children: Vec<Node> },
    Heading { level: u8, children: Vec<Node> },
    BulletList { children: Vec<Node> },
    OrderedList { children: Vec<Node> },
    ListItem { children: Vec<Node> },
    Blockquote { children: Vec<Node> },
    CodeBlock {
        language: Option<String>,
        children: Vec<Node>,
    },
    Table { children: Vec<Node> },
    TableRow { children: Vec<Node> },
    TableCell { header: bool, children: Vec<Node> },
    /// Atomic asset node (image, video or file attachment).
    Custom(CustomNode),
    Text { text: String, marks: Marks },
    HardBreak,
    /// A kind this crate does not know about. Serialized as its children.
    Unknown { kind: String, children: Vec<Node> },
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document { children }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Node::Heading {
            level: clamp_heading_level(level),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn marked_text(text: impl Into<String>, marks: Marks) -> Self {
        Node::Text {
            text: text.into(),
            marks,
        }
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem { children }
    }

    pub fn custom(kind: CustomKind, attrs: AssetAttrs) -> Self {
        Node::Custom(CustomNode { kind, attrs })
    }

    /// The editor's name for this node kind (`doc`, `paragraph`, `customImage`, ...).
    pub fn kind_name(&self) -> &str {
        match self {
            Node::Document { .. } => "doc",
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::BulletList { .. } => "bulletList",
            Node::OrderedList { .. } => "orderedList",
            Node::ListItem { .. } => "listItem",
            Node::Blockquote { .. } => "blockquote",
            Node::CodeBlock { .. } => "codeBlock",
            Node::Table { .. } => "table",
            Node::TableRow { .. } => "tableRow",
            Node::TableCell { header: true, .. } => "tableHeader",
            Node::TableCell { header: false, .. } => "tableCell",
            Node::Custom(custom) => custom.kind.node_type(),
            Node::Text { .. } => "text",
            Node::HardBreak => "hardBreak",
            Node::Unknown { kind, .. } => kind,
        }
    }

    /// Child nodes, empty for leaves and atomic nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children }
            | Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::BulletList { children }
            | Node::OrderedList { children }
            | Node::ListItem { children }
            | Node::Blockquote { children }
            | Node::CodeBlock { children, .. }
            | Node::Table { children }
            | Node::TableRow { children }
            | Node::TableCell { children, .. }
            | Node::Unknown { children, .. } => children,
            Node::Custom(_) | Node::Text { .. } | Node::HardBreak => &[],
        }
    }

    /// Concatenated raw text of this node and its descendants, hard breaks as newlines.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_plain_text(self, &mut out);
        out
    }
}

fn collect_plain_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { text, .. } => out.push_str(text),
        Node::HardBreak => out.push('\n'),
        _ => {
            for child in node.children() {
                collect_plain_text(child, out);
            }
        }
    }
}

/// Clamp a heading level into the range the tree supports.
pub fn clamp_heading_level(level: u8) -> u8 {
    if (1..=MAX_HEADING_LEVEL).contains(&level) {
        level
    } else {
        1
    }
}

/// The three custom asset kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CustomKind {
    Image,
    Video,
    File,
}

impl CustomKind {
    pub const ALL: [CustomKind; 3] = [CustomKind::Image, CustomKind::Video, CustomKind::File];

    /// Node type used by the editor (`customImage`, ...).
    pub fn node_type(&self) -> &'static str {
        match self {
            CustomKind::Image => "customImage",
            CustomKind::Video => "customVideo",
            CustomKind::File => "customFile",
        }
    }

    /// Value of the `data-type` attribute on the rendered HTML element.
    pub fn html_type(&self) -> &'static str {
        match self {
            CustomKind::Image => "custom-image",
            CustomKind::Video => "custom-video",
            CustomKind::File => "custom-file",
        }
    }

    pub fn from_node_type(node_type: &str) -> Option<Self> {
        CustomKind::ALL
            .into_iter()
            .find(|kind| kind.node_type() == node_type)
    }
}

impl fmt::Display for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node_type())
    }
}

/// An atomic asset node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomNode {
    pub kind: CustomKind,
    pub attrs: AssetAttrs,
}

/// Attributes carried by custom nodes. Every field may be missing; converters fall back to the
/// per-kind defaults of the directive registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetAttrs {
    /// Asset identifier assigned by the upload service (`fileId` in directives).
    pub id: Option<u64>,
    pub url: Option<String>,
    pub file_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub alt_text: Option<String>,
    pub mime_type: Option<String>,
}

impl AssetAttrs {
    /// The referenced asset id, if any. Zero means "no reference".
    pub fn asset_id(&self) -> Option<u64> {
        self.id.filter(|id| *id > 0)
    }
}

/// Inline decoration kinds, declared in the order marks are applied when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkKind {
    Bold,
    Italic,
    Code,
    Link,
}

impl MarkKind {
    pub fn name(&self) -> &'static str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Code => "code",
            MarkKind::Link => "link",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" | "strong" => Some(MarkKind::Bold),
            "italic" | "em" => Some(MarkKind::Italic),
            "code" => Some(MarkKind::Code),
            "link" => Some(MarkKind::Link),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub kind: MarkKind,
    /// Only meaningful for links.
    pub href: Option<String>,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self { kind, href: None }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self {
            kind: MarkKind::Link,
            href: Some(href.into()),
        }
    }
}

/// The marks of a text run: at most one per kind, kept in [`MarkKind`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks(Vec<Mark>);

impl Marks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mark, replacing any existing mark of the same kind.
    pub fn insert(&mut self, mark: Mark) {
        match self.0.binary_search_by(|m| m.kind.cmp(&mark.kind)) {
            Ok(index) => self.0[index] = mark,
            Err(index) => self.0.insert(index, mark),
        }
    }

    /// Copy of these marks with `mark` added.
    pub fn with(&self, mark: Mark) -> Self {
        let mut marks = self.clone();
        marks.insert(mark);
        marks
    }

    pub fn contains(&self, kind: MarkKind) -> bool {
        self.0.iter().any(|m| m.kind == kind)
    }

    pub fn get(&self, kind: MarkKind) -> Option<&Mark> {
        self.0.iter().find(|m| m.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.0.iter()
    }
}

impl FromIterator<Mark> for Marks {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut marks = Marks::new();
        for mark in iter {
            marks.insert(mark);
        }
        marks
    }
}
