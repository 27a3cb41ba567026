//! Conversion facade
//!
//!     [`Converter`] bundles the options and the directive registry behind the four operations
//!     the editor needs: tree to portable text, portable text to tree, portable text to HTML,
//!     and asset reference extraction.
//!
//!     A converter is immutable once built. There is no process-wide instance: callers that need
//!     differently configured conversions (another directive set, another default code language)
//!     build their own and may share them freely across threads.

use crate::assets::references;
use crate::directives::DirectiveRegistry;
use crate::formats::portable::{parser, serializer};
use crate::tree::Node;

/// Default language tag for code blocks without one.
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// Markdown and directive behaviour of a [`Converter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Single newlines inside paragraphs are hard breaks.
    pub hard_breaks: bool,
    pub tables: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    /// Leave directive-shaped text inside fenced code blocks alone.
    pub fence_aware_directives: bool,
    pub default_code_language: String,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            hard_breaks: true,
            tables: true,
            strikethrough: false,
            autolink: false,
            fence_aware_directives: true,
            default_code_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Converter {
    options: ConverterOptions,
    registry: DirectiveRegistry,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterOptions::default(), DirectiveRegistry::with_defaults())
    }
}

impl Converter {
    pub fn new(options: ConverterOptions, registry: DirectiveRegistry) -> Self {
        Self { options, registry }
    }

    /// Default directives, custom options.
    pub fn with_options(options: ConverterOptions) -> Self {
        Self::new(options, DirectiveRegistry::with_defaults())
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    /// Serialize an editor tree for storage.
    pub fn to_portable_text(&self, root: &Node) -> String {
        serializer::serialize_to_portable(
            root,
            &self.registry,
            &self.options.default_code_language,
        )
    }

    /// Rebuild an editor tree from stored portable text.
    pub fn from_portable_text(&self, text: &str) -> Node {
        parser::deserialize_to_tree(text, &self.registry, &self.options)
    }

    /// Render stored portable text as an HTML fragment for read-only views.
    pub fn to_html(&self, text: &str) -> String {
        parser::deserialize_to_html(text, &self.registry, &self.options)
    }

    /// Unique asset ids referenced by the tree, in first-seen order.
    pub fn extract_asset_ids(&self, root: &Node) -> Vec<u64> {
        references::extract_asset_ids(root)
    }
}
