//! HTML format implementation
//!
//! HTML is an output-only format for read-only views of a post. A tree is first serialized to
//! portable text and then rendered from it, so the HTML of an unsaved tree is exactly what the
//! stored document will render to.
//!
//! # Library Choice
//!
//! - `comrak` renders the Markdown part
//! - `html5ever` + `markup5ever_rcdom` build and serialize the custom node elements
//!
//! # Element Mapping Table
//!
//! | Tree node   | HTML                                                    |
//! |-------------|---------------------------------------------------------|
//! | CustomImage | `<div data-type="custom-image" data-src data-filename data-size data-file-id [data-alt]>` |
//! | CustomVideo | `<div data-type="custom-video" data-src data-filename data-size data-file-id>` |
//! | CustomFile  | `<div data-type="custom-file" data-src data-filename data-size data-file-id data-file-type>` |
//! | CodeBlock   | `<pre><code class="language-x">`                        |
//! | everything else | as rendered by comrak                               |
//!
//! A directive alone in its paragraph replaces the whole `<p>`. Raw HTML in the source is not
//! passed through.

mod element;

pub use element::render_custom;

use crate::converter::Converter;
use crate::error::FormatError;
use crate::format::Format;
use crate::tree::Node;

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    converter: Converter,
}

impl HtmlFormat {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragment for read-only views"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        let text = self.converter.to_portable_text(doc);
        Ok(self.converter.to_html(&text))
    }
}
