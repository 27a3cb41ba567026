//! Format implementations
//!
//! This module contains the format implementations that convert between the document tree and
//! its text representations.

pub mod html;
pub mod json;
pub mod portable;

pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use portable::PortableFormat;
