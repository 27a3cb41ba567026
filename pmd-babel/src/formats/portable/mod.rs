//! Portable text format
//!
//! Portable text is Markdown plus single-line directives for custom nodes. It is the form
//! documents are stored and transmitted in.
//!
//! # Library Choice
//!
//! Parsing goes through `comrak` (tables, hard breaks, fenced code with `language-*` classes).
//! Serialization is written by hand so the stored form stays byte-stable, see serializer.rs.
//!
//! # Element Mapping Table
//!
//! | Tree node        | Portable text                         | Import notes                           |
//! |------------------|---------------------------------------|----------------------------------------|
//! | Document         | blocks joined by a blank line         |                                        |
//! | Paragraph        | inline content                        | split at directives                    |
//! | Heading          | `#`, `##`, `###`                      | levels 4 to 6 clamp to 1               |
//! | BulletList       | `- item`, two spaces per depth        |                                        |
//! | OrderedList      | `1. item`, renumbered                 |                                        |
//! | Blockquote       | `> ` on every line                    |                                        |
//! | CodeBlock        | fenced, language or default           | first word of the info string          |
//! | Table            | pipe table, first row is the header   | cells split at directives              |
//! | Custom           | `:::kind[...]:::` directive           | rejected directives stay literal       |
//! | Text marks       | `**b**`, `*i*`, `` `c` ``, `[t](href)`| strikethrough is dropped               |
//! | HardBreak        | newline                               | soft breaks too, when hard_breaks      |
//!
//! # Lossy Conversions
//!
//! - Nested lists under ordered items are indented by two spaces, which Markdown reads as a
//!   sibling list rather than a child
//! - Several blocks in one list item or table cell merge into one paragraph
//! - Images, thematic breaks and raw HTML come back as literal text or unknown nodes
//! - Marks are not escaped, so text containing `*` or `` ` `` may reparse differently

pub mod parser;
pub mod serializer;

use crate::converter::Converter;
use crate::error::FormatError;
use crate::format::Format;
use crate::tree::Node;

/// Format implementation for portable text
#[derive(Debug, Clone, Default)]
pub struct PortableFormat {
    converter: Converter,
}

impl PortableFormat {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }
}

impl Format for PortableFormat {
    fn name(&self) -> &str {
        "portable"
    }

    fn description(&self) -> &str {
        "Markdown with custom node directives (storage format)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown", "pmd"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        Ok(self.converter.from_portable_text(source))
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        Ok(self.converter.to_portable_text(doc))
    }
}
