//! Directive placeholders
//!
//!     Directives are swapped for opaque tokens before the Markdown parser sees the text, so the
//!     parser cannot mangle them (escape quotes, autolink the url, split the line). After parsing,
//!     each token is resolved back into either the custom node, its HTML element, or the original
//!     directive text, depending on where it ended up.
//!
//!     Tokens have the form `<sentinel><index><sentinel>`. The sentinel is alphanumeric, so
//!     Markdown leaves it alone, and it is chosen so that it never occurs in the source text.

use std::ops::Range;

use crate::common::fences::unfenced_ranges;
use crate::directives::DirectiveRegistry;
use crate::tree::CustomNode;

const BASE_SENTINEL: &str = "PMDDIRECTIVE";

#[derive(Debug, Clone)]
struct Entry {
    node: CustomNode,
    literal: String,
}

/// A piece of text after placeholder splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Custom(&'a CustomNode),
}

/// The placeholder table produced by [`extract`].
#[derive(Debug, Clone)]
pub struct Placeholders {
    sentinel: String,
    entries: Vec<Entry>,
}

impl Placeholders {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn token(&self, index: usize) -> String {
        format!("{0}{index}{0}", self.sentinel)
    }

    /// Every known token in `text`, as `(byte range, entry index)`.
    fn tokens(&self, text: &str) -> Vec<(Range<usize>, usize)> {
        let mut found = Vec::new();
        if self.entries.is_empty() {
            return found;
        }
        let sentinel = self.sentinel.as_str();
        let mut search = 0;
        while let Some(pos) = text[search..].find(sentinel) {
            let start = search + pos;
            let digits_start = start + sentinel.len();
            let digits_len = text[digits_start..]
                .bytes()
                .take_while(|b| b.is_ascii_digit())
                .count();
            let digits_end = digits_start + digits_len;
            let index = text[digits_start..digits_end]
                .parse::<usize>()
                .ok()
                .filter(|index| *index < self.entries.len());
            match index {
                Some(index) if text[digits_end..].starts_with(sentinel) => {
                    let end = digits_end + sentinel.len();
                    found.push((start..end, index));
                    search = end;
                }
                _ => search = digits_start,
            }
        }
        found
    }

    #[cfg(test)]
    fn contains_token(&self, text: &str) -> bool {
        !self.tokens(text).is_empty()
    }

    /// Split `text` at placeholder tokens.
    pub fn segments<'a>(&'a self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut last = 0;
        for (range, index) in self.tokens(text) {
            if range.start > last {
                segments.push(Segment::Text(&text[last..range.start]));
            }
            segments.push(Segment::Custom(&self.entries[index].node));
            last = range.end;
        }
        if last < text.len() {
            segments.push(Segment::Text(&text[last..]));
        }
        segments
    }

    /// Replace every token in `text` by the directive text it stood for.
    pub fn restore_literal(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (range, index) in self.tokens(text) {
            out.push_str(&text[last..range.start]);
            out.push_str(&self.entries[index].literal);
            last = range.end;
        }
        out.push_str(&text[last..]);
        out
    }

    /// Replace tokens in rendered HTML. A paragraph holding only a token is replaced as a whole.
    ///
    /// With `code_aware` set, tokens inside `<code>` elements come back as escaped directive text
    /// instead of elements.
    pub fn restore_html<F>(&self, html: &str, code_aware: bool, render: F) -> String
    where
        F: Fn(&CustomNode) -> String,
    {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        let mut in_code = false;
        for (mut range, index) in self.tokens(html) {
            let entry = &self.entries[index];
            in_code = code_state_after(&html[last..range.start], in_code);
            if code_aware && in_code {
                out.push_str(&html[last..range.start]);
                out.push_str(&escape_html(&entry.literal));
                last = range.end;
                continue;
            }
            if html[last..range.start].ends_with("<p>") && html[range.end..].starts_with("</p>") {
                range = range.start - "<p>".len()..range.end + "</p>".len();
            }
            out.push_str(&html[last..range.start]);
            out.push_str(&render(&entry.node));
            last = range.end;
        }
        out.push_str(&html[last..]);
        out
    }
}

/// Whether rendered HTML is inside a `<code>` element after `segment`, given the state before it.
fn code_state_after(segment: &str, in_code: bool) -> bool {
    match (segment.rfind("<code"), segment.rfind("</code>")) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => in_code,
    }
}

/// Escape directive text the way comrak escapes code content.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Choose a sentinel that does not occur in `text`.
fn sentinel_for(text: &str) -> String {
    let mut sentinel = BASE_SENTINEL.to_string();
    while text.contains(&sentinel) {
        sentinel.push('X');
    }
    sentinel
}

/// Swap every accepted directive in `text` for a placeholder token.
///
/// With `fence_aware` set, directives inside fenced code blocks are left untouched.
pub fn extract(
    text: &str,
    registry: &DirectiveRegistry,
    fence_aware: bool,
) -> (String, Placeholders) {
    let mut placeholders = Placeholders {
        sentinel: sentinel_for(text),
        entries: Vec::new(),
    };

    let ranges: Vec<Range<usize>> = if fence_aware {
        unfenced_ranges(text)
    } else {
        vec![0..text.len()]
    };

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for range in ranges {
        for found in registry.find_all(&text[range.clone()]) {
            let start = range.start + found.start;
            let end = range.start + found.end;
            out.push_str(&text[copied..start]);
            out.push_str(&placeholders.token(placeholders.entries.len()));
            placeholders.entries.push(Entry {
                node: found.node,
                literal: text[start..end].to_string(),
            });
            copied = end;
        }
    }
    out.push_str(&text[copied..]);

    (out, placeholders)
}
