//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing documents.

use crate::error::FormatError;
use crate::tree::Node;

/// Trait for document formats
///
/// Implementors provide conversion between a string representation and the document tree.
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
///         Ok(doc.plain_text())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "portable", "json", "html")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["json"], ["md", "markdown"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → tree)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (tree → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a document tree
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Node, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a document tree into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &Node) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
