//! HTML output tests (portable text → HTML)

mod export;
