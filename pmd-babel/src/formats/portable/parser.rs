//! Portable text parsing (portable text → tree / HTML)
//!
//! Pipeline, shared by both outputs:
//!     1. Directive extraction: accepted directives are swapped for placeholder tokens
//!        (fence-aware unless configured otherwise, see common/fences.rs)
//!     2. Markdown parse with comrak
//!     3. Placeholder restoration: into custom nodes (tree) or custom elements (HTML)
//!
//! Tree output splits paragraphs and table cells at placeholders so every custom node becomes a
//! block of its own. Placeholders that land anywhere a block cannot go (headings, code, link
//! text) are restored to their original directive text. HTML output does the same for code:
//! placeholders inside `<code>` come back as escaped directive text.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{markdown_to_html, parse_document, Arena, ComrakOptions};
use tracing::{debug, trace};

use crate::common::placeholders::{extract, Placeholders, Segment};
use crate::converter::ConverterOptions;
use crate::directives::DirectiveRegistry;
use crate::formats::html::render_custom;
use crate::tree::{CustomNode, Mark, MarkKind, Marks, Node};

/// Parse portable text into a tree. Never fails: unparseable regions stay literal text.
pub fn deserialize_to_tree(
    source: &str,
    registry: &DirectiveRegistry,
    options: &ConverterOptions,
) -> Node {
    if source.is_empty() {
        return Node::document(vec![]);
    }

    let (text, placeholders) = extract(source, registry, options.fence_aware_directives);
    debug!(directives = placeholders.len(), "extracted directives");

    let arena = Arena::new();
    let root = parse_document(&arena, &text, &comrak_options(options));

    let builder = TreeBuilder {
        placeholders: &placeholders,
        hard_breaks: options.hard_breaks,
    };
    Node::document(builder.blocks(root))
}

/// Render portable text as an HTML fragment, custom nodes as their elements.
pub fn deserialize_to_html(
    source: &str,
    registry: &DirectiveRegistry,
    options: &ConverterOptions,
) -> String {
    if source.is_empty() {
        return String::new();
    }

    let (text, placeholders) = extract(source, registry, options.fence_aware_directives);
    let html = markdown_to_html(&text, &comrak_options(options));
    placeholders.restore_html(&html, options.fence_aware_directives, |node| {
        render_custom(registry, node)
    })
}

pub(crate) fn comrak_options(options: &ConverterOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = options.tables;
    comrak.extension.strikethrough = options.strikethrough;
    comrak.extension.autolink = options.autolink;
    comrak.render.hardbreaks = options.hard_breaks;
    comrak
}

/// An inline item collected from a paragraph, before it is split at custom nodes.
enum Inline {
    Node(Node),
    Custom(CustomNode),
}

/// Whether placeholders in inline text become custom nodes or literal directive text.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Placement {
    Block,
    Literal,
}

struct TreeBuilder<'p> {
    placeholders: &'p Placeholders,
    hard_breaks: bool,
}

impl TreeBuilder<'_> {
    fn blocks<'a>(&self, parent: &'a AstNode<'a>) -> Vec<Node> {
        parent
            .children()
            .flat_map(|child| self.block(child))
            .collect()
    }

    fn block<'a>(&self, node: &'a AstNode<'a>) -> Vec<Node> {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Paragraph => self.paragraph(node),
            NodeValue::Heading(heading) => {
                vec![Node::heading(heading.level, self.literal_inlines(node))]
            }
            NodeValue::List(list) => {
                let children = self.blocks(node);
                vec![match list.list_type {
                    ListType::Ordered => Node::OrderedList { children },
                    ListType::Bullet => Node::BulletList { children },
                }]
            }
            NodeValue::Item(_) => vec![Node::list_item(self.blocks(node))],
            NodeValue::BlockQuote => vec![Node::Blockquote {
                children: self.blocks(node),
            }],
            NodeValue::CodeBlock(code) => {
                let language = code
                    .info
                    .split_whitespace()
                    .next()
                    .map(str::to_string);
                let literal = code.literal.strip_suffix('\n').unwrap_or(&code.literal);
                let literal = self.placeholders.restore_literal(literal);
                let children = if literal.is_empty() {
                    vec![]
                } else {
                    vec![Node::text(literal)]
                };
                vec![Node::CodeBlock { language, children }]
            }
            NodeValue::HtmlBlock(html) => {
                let literal = self.placeholders.restore_literal(html.literal.trim_end());
                vec![Node::paragraph(vec![Node::text(literal)])]
            }
            NodeValue::Table(_) => vec![Node::Table {
                children: node.children().map(|row| self.table_row(row)).collect(),
            }],
            NodeValue::ThematicBreak => vec![Node::Unknown {
                kind: "horizontalRule".to_string(),
                children: vec![],
            }],
            other => {
                trace!(?other, "flattening unsupported block into its children");
                self.blocks(node)
            }
        }
    }

    fn table_row<'a>(&self, row: &'a AstNode<'a>) -> Node {
        let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let children = row
            .children()
            .map(|cell| {
                let mut children = self.paragraph(cell);
                if children.is_empty() {
                    children.push(Node::paragraph(vec![]));
                }
                Node::TableCell { header, children }
            })
            .collect();
        Node::TableRow { children }
    }

    /// Inline content where custom nodes cannot live.
    fn literal_inlines<'a>(&self, node: &'a AstNode<'a>) -> Vec<Node> {
        let mut items = Vec::new();
        for child in node.children() {
            self.inline(child, &Marks::new(), Placement::Literal, &mut items);
        }
        merge_texts(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Inline::Node(node) => Some(node),
                    Inline::Custom(_) => None,
                })
                .collect(),
        )
    }

    /// A paragraph, split into several blocks at custom nodes.
    fn paragraph<'a>(&self, node: &'a AstNode<'a>) -> Vec<Node> {
        let mut items = Vec::new();
        for child in node.children() {
            self.inline(child, &Marks::new(), Placement::Block, &mut items);
        }

        let mut blocks = Vec::new();
        let mut pending = Vec::new();
        for item in items {
            match item {
                Inline::Node(node) => pending.push(node),
                Inline::Custom(custom) => {
                    flush_paragraph(&mut blocks, std::mem::take(&mut pending));
                    blocks.push(Node::Custom(custom));
                }
            }
        }
        flush_paragraph(&mut blocks, pending);
        blocks
    }

    fn inline<'a>(
        &self,
        node: &'a AstNode<'a>,
        marks: &Marks,
        placement: Placement,
        out: &mut Vec<Inline>,
    ) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Text(text) => self.text(&text, marks, placement, out),
            NodeValue::SoftBreak => {
                if self.hard_breaks {
                    out.push(Inline::Node(Node::HardBreak));
                } else {
                    out.push(Inline::Node(Node::marked_text(" ", marks.clone())));
                }
            }
            NodeValue::LineBreak => out.push(Inline::Node(Node::HardBreak)),
            NodeValue::Strong => {
                self.inline_children(node, &marks.with(Mark::new(MarkKind::Bold)), placement, out)
            }
            NodeValue::Emph => self.inline_children(
                node,
                &marks.with(Mark::new(MarkKind::Italic)),
                placement,
                out,
            ),
            NodeValue::Code(code) => out.push(Inline::Node(Node::marked_text(
                self.placeholders.restore_literal(&code.literal),
                marks.with(Mark::new(MarkKind::Code)),
            ))),
            NodeValue::Link(link) => self.inline_children(
                node,
                &marks.with(Mark::link(link.url)),
                Placement::Literal,
                out,
            ),
            NodeValue::Image(image) => {
                let mut alt = String::new();
                collect_text(node, &mut alt);
                let literal = format!("![{}]({})", alt, image.url);
                out.push(Inline::Node(Node::marked_text(
                    self.placeholders.restore_literal(&literal),
                    marks.clone(),
                )));
            }
            NodeValue::HtmlInline(html) => out.push(Inline::Node(Node::marked_text(
                self.placeholders.restore_literal(&html),
                marks.clone(),
            ))),
            _ => self.inline_children(node, marks, placement, out),
        }
    }

    fn inline_children<'a>(
        &self,
        node: &'a AstNode<'a>,
        marks: &Marks,
        placement: Placement,
        out: &mut Vec<Inline>,
    ) {
        for child in node.children() {
            self.inline(child, marks, placement, out);
        }
    }

    fn text(&self, text: &str, marks: &Marks, placement: Placement, out: &mut Vec<Inline>) {
        if placement == Placement::Literal {
            let restored = self.placeholders.restore_literal(text);
            if restored != text {
                debug!("directive in inline-only context restored as literal text");
            }
            out.push(Inline::Node(Node::marked_text(restored, marks.clone())));
            return;
        }
        for segment in self.placeholders.segments(text) {
            match segment {
                Segment::Text(piece) => {
                    out.push(Inline::Node(Node::marked_text(piece, marks.clone())))
                }
                Segment::Custom(custom) => out.push(Inline::Custom(custom.clone())),
            }
        }
    }
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            _ => collect_text(child, out),
        }
    }
}

/// Join adjacent text runs that carry the same marks.
fn merge_texts(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (
            Some(Node::Text {
                text: previous,
                marks: previous_marks,
            }),
            Node::Text { text, marks },
        ) = (merged.last_mut(), &node)
        {
            if *previous_marks == *marks {
                previous.push_str(text);
                continue;
            }
        }
        merged.push(node);
    }
    merged
        .into_iter()
        .filter(|node| !matches!(node, Node::Text { text, .. } if text.is_empty()))
        .collect()
}

/// Push the inline run as a paragraph, trimming whitespace and breaks left at split points.
fn flush_paragraph(blocks: &mut Vec<Node>, inlines: Vec<Node>) {
    let mut inlines = merge_texts(inlines);

    while inlines.first().is_some_and(is_blank_edge) {
        inlines.remove(0);
    }
    while inlines.last().is_some_and(is_blank_edge) {
        inlines.pop();
    }
    if let Some(Node::Text { text, .. }) = inlines.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Node::Text { text, .. }) = inlines.last_mut() {
        *text = text.trim_end().to_string();
    }

    if !inlines.is_empty() {
        blocks.push(Node::paragraph(inlines));
    }
}

fn is_blank_edge(node: &Node) -> bool {
    match node {
        Node::HardBreak => true,
        Node::Text { text, .. } => text.trim().is_empty(),
        _ => false,
    }
}
