//! Comment- and string-aware text scanning.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! Shared by the bundler, which must never interpret directives inside
//! block comments, and the selector nester, which must find the end of a
//! declaration block even when it contains nested brace groups or braces
//! inside string literals.

use std::ops::Range;

/// Locate every block comment span in `text`.
///
/// Spans cover the full `/* ... */` sequence, terminator included. An
/// unterminated comment runs to the end of the text.
pub fn comment_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'/' && bytes[i + 1] == b'*' {
            let end = match text[i + 2..].find("*/") {
                Some(rel) => i + 2 + rel + 2,
                None => text.len(),
            };
            spans.push(i..end);
            i = end;
        } else {
            i += 1;
        }
    }
    spans
}

/// True when `pos` falls inside any of the given spans.
pub fn in_span(spans: &[Range<usize>], pos: usize) -> bool {
    spans.iter().any(|span| span.contains(&pos))
}

/// True when `range` overlaps any of the given spans.
pub fn overlaps_span(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans
        .iter()
        .any(|span| span.start < range.end && range.start < span.end)
}

/// Find the `}` matching the `{` at byte offset `open`.
///
/// Tracks brace depth so blocks may contain nested brace groups, and skips
/// string literals (single or double quoted, backslash escapes honored) and
/// block comments so braces inside them never count. Returns the offset of
/// the matching `}`, or `None` when the block is unterminated.
pub fn block_end(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => match text[i + 2..].find("*/") {
                // Land on the closing '/' so the increment below steps past it.
                Some(rel) => i += 2 + rel + 1,
                None => return None,
            },
            _ => {}
        }
        i += 1;
    }
    None
}
