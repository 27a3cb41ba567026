//! Portable text format tests
//!
//! Tests for tree ↔ portable text conversion.

mod export;
mod import;
mod roundtrip;
