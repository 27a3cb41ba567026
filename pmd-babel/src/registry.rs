//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name.

use std::collections::HashMap;

use crate::converter::Converter;
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{HtmlFormat, JsonFormat, PortableFormat};
use crate::tree::Node;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
///
/// let doc = registry.parse("# Title", "portable")?;
/// let json = registry.serialize(&doc, "json")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Returns the format name if a matching extension is found, or None otherwise.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<Node, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Node, format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(doc)
    }

    /// Create a registry with the default formats, all sharing `converter`
    pub fn with_converter(converter: Converter) -> Self {
        let mut registry = Self::new();

        registry.register(PortableFormat::new(converter.clone()));
        registry.register(HtmlFormat::new(converter));
        registry.register(JsonFormat);

        registry
    }

    /// Create a registry with default formats and a default converter
    pub fn with_defaults() -> Self {
        Self::with_converter(Converter::default())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
