//! Error types for format and asset operations
//!
//! The conversion engine itself has no error paths. These errors only surface at the outer
//! layers: format lookup, editor JSON decoding and upload validation.

use thiserror::Error;

use crate::assets::metadata::{format_file_size, AssetCategory};

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Upload validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("File extension '{extension}' is not allowed for {category} uploads")]
    ExtensionNotAllowed {
        extension: String,
        category: AssetCategory,
    },
    #[error(
        "File size {} exceeds the {category} limit of {}",
        format_file_size(*size),
        format_file_size(*limit)
    )]
    TooLarge {
        size: u64,
        limit: u64,
        category: AssetCategory,
    },
}
