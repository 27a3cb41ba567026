//! Portable text serialization (tree → portable text)
//!
//! The output is written by hand rather than through comrak's CommonMark formatter: the stored
//! form must stay byte-stable across library upgrades, and custom nodes have to come out as
//! directive lines comrak knows nothing about.

use tracing::trace;

use crate::directives::DirectiveRegistry;
use crate::tree::{clamp_heading_level, MarkKind, Marks, Node};

/// Serialize a tree to portable text.
///
/// Total over every node kind and never fails. An empty document serializes to `""`.
pub fn serialize_to_portable(
    root: &Node,
    registry: &DirectiveRegistry,
    default_language: &str,
) -> String {
    PortableWriter {
        registry,
        default_language,
    }
    .node(root, 0)
}

struct PortableWriter<'a> {
    registry: &'a DirectiveRegistry,
    default_language: &'a str,
}

impl PortableWriter<'_> {
    /// `depth` is the list nesting depth, only meaningful below list items.
    fn node(&self, node: &Node, depth: usize) -> String {
        match node {
            Node::Document { children } => self.join(children, 0, "\n\n"),
            Node::Paragraph { children } => self.join(children, 0, ""),
            Node::Text { text, marks } => apply_marks(text, marks),
            Node::Heading { level, children } => {
                let level = clamp_heading_level(*level) as usize;
                format!("{} {}", "#".repeat(level), self.join(children, 0, ""))
            }
            Node::BulletList { children } => self.list(children, depth, |_| "- ".to_string()),
            Node::OrderedList { children } => {
                self.list(children, depth, |index| format!("{}. ", index + 1))
            }
            // A list item outside of a list gets a bullet.
            Node::ListItem { .. } => self.list_item(node, depth, "- "),
            Node::CodeBlock { language, children } => {
                let language = language
                    .as_deref()
                    .filter(|lang| !lang.is_empty())
                    .unwrap_or(self.default_language);
                let code: String = children.iter().map(Node::plain_text).collect();
                format!("```{language}\n{code}\n```")
            }
            Node::Custom(custom) => self.registry.emit(custom),
            Node::Table { children } => self.table(children),
            // Rows and cells outside of a table are flattened to their content.
            Node::TableRow { children } | Node::TableCell { children, .. } => {
                self.join(children, 0, " ")
            }
            Node::Blockquote { children } => self
                .join(children, 0, "\n")
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Node::HardBreak => "\n".to_string(),
            Node::Unknown { kind, children } => {
                trace!(kind = %kind, "serializing unknown node kind as its children");
                self.join(children, depth, "")
            }
        }
    }

    fn join(&self, children: &[Node], depth: usize, separator: &str) -> String {
        children
            .iter()
            .map(|child| self.node(child, depth))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn list<F>(&self, items: &[Node], depth: usize, marker: F) -> String
    where
        F: Fn(usize) -> String,
    {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.list_item(item, depth, &marker(index)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn list_item(&self, item: &Node, depth: usize, marker: &str) -> String {
        let content = match item {
            Node::ListItem { children } => self.join(children, depth + 1, "\n"),
            other => self.node(other, depth + 1),
        };
        format!("{}{}{}", "  ".repeat(depth), marker, content)
    }

    fn table(&self, rows: &[Node]) -> String {
        let mut out = String::from("\n");
        for (index, row) in rows.iter().enumerate() {
            let cells: Vec<String> = row
                .children()
                .iter()
                .map(|cell| self.join(cell.children(), 0, " "))
                .collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
            if index == 0 {
                let separator = vec!["---"; cells.len()];
                out.push_str(&format!("| {} |\n", separator.join(" | ")));
            }
        }
        out
    }
}

/// Wrap `text` with its marks, innermost first: bold, italic, code, then link.
fn apply_marks(text: &str, marks: &Marks) -> String {
    let mut out = text.to_string();
    for mark in marks.iter() {
        out = match mark.kind {
            MarkKind::Bold => format!("**{out}**"),
            MarkKind::Italic => format!("*{out}*"),
            MarkKind::Code => format!("`{out}`"),
            MarkKind::Link => format!("[{out}]({})", mark.href.as_deref().unwrap_or("#")),
        };
    }
    out
}
