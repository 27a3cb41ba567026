//! Fenced code block pre-scan
//!
//!     Directive extraction runs before Markdown parsing, on raw text. To keep directive-shaped
//!     text inside code samples literal, the text is first split into spans that are inside a
//!     fenced code block and spans that are not. Only the latter are scanned for directives.
//!
//!     The scan follows the CommonMark fence rules closely enough for portable text:
//!         - an opening fence is a line indented by at most three spaces, followed by three or
//!           more backticks or tildes (a backtick fence's info string may not contain backticks)
//!         - the closing fence uses the same character, at least as many of them, and nothing
//!           but whitespace after
//!         - an unclosed fence runs to the end of the document
//!
//!     Indented code blocks are not recognized.

use std::ops::Range;

/// A contiguous region of the source, either inside a fenced code block or outside of any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub fenced: bool,
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

/// Split `text` into alternating fenced and unfenced spans covering the whole input.
pub fn split_fenced(text: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut open: Option<Fence> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let fenced = match open {
            None => {
                open = opening_fence(line);
                open.is_some()
            }
            Some(fence) => {
                if closes(line, fence) {
                    open = None;
                }
                true
            }
        };

        push_span(&mut spans, start..offset, fenced);
    }

    spans
}

/// Byte ranges of `text` that lie outside fenced code blocks.
pub fn unfenced_ranges(text: &str) -> Vec<Range<usize>> {
    split_fenced(text)
        .into_iter()
        .filter(|span| !span.fenced)
        .map(|span| span.range)
        .collect()
}

fn push_span(spans: &mut Vec<Span>, range: Range<usize>, fenced: bool) {
    if let Some(last) = spans.last_mut() {
        if last.fenced == fenced && last.range.end == range.start {
            last.range.end = range.end;
            return;
        }
    }
    spans.push(Span { range, fenced });
}

/// Strip up to three spaces of indentation, `None` if the line is indented further.
fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        None
    } else {
        Some(&line[indent..])
    }
}

fn marker_run(line: &str) -> Option<Fence> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some(Fence { marker, len })
}

fn opening_fence(line: &str) -> Option<Fence> {
    let body = strip_indent(line)?;
    let fence = marker_run(body)?;
    // marker chars are ASCII, so len counts bytes too
    let info = &body[fence.len..];
    if fence.marker == '`' && info.contains('`') {
        return None;
    }
    Some(fence)
}

fn closes(line: &str, open: Fence) -> bool {
    let Some(body) = strip_indent(line) else {
        return false;
    };
    match marker_run(body) {
        Some(fence) => {
            fence.marker == open.marker
                && fence.len >= open.len
                && body[fence.len..].trim().is_empty()
        }
        None => false,
    }
}
