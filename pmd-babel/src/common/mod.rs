//! Text-level helpers shared by the portable text parser and the HTML renderer.

pub mod fences;
pub mod placeholders;
