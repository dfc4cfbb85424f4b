//! Variant-selector nesting rewrite.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! Rewrites flat rules of the form
//!
//! ```text
//! .card .dark\:bg{background:#000}
//! .card .dark\:text{color:#fff}
//! ```
//!
//! into one nested block per distinct parent selector:
//!
//! ```text
//! .card {
//!   .dark\:bg {
//!     background:#000
//!   }
//!
//!   .dark\:text {
//!     color:#fff
//!   }
//! }
//! ```
//!
//! This is a text-range transform, not a CSS parse. Candidate rule heads
//! are found with a line-anchored pattern; each declaration block is then
//! delimited by a depth-counting scanner that skips strings and comments,
//! so blocks may contain nested brace groups. Matched ranges are removed in
//! one ascending strip pass and the nested blocks inserted in one
//! descending rebuild pass, leaving all non-matching text untouched and in
//! original relative order.

use std::ops::Range;

use regex::Regex;

use crate::scan::{block_end, comment_spans, in_span};

/// Default variant class prefix. The full marker in source text is the
/// prefix preceded by a class dot and followed by an escaped colon, e.g.
/// `.dark\:bg`.
pub const DEFAULT_VARIANT_PREFIX: &str = "dark";

/// All matches for one parent selector, in source order.
struct SelectorGroup {
    parent: String,
    /// Start of the group's first match, in pre-strip coordinates.
    first_index: usize,
    /// Child selector and trimmed declaration lines, per match.
    children: Vec<(String, Vec<String>)>,
    /// Every matched byte range belonging to this group.
    ranges: Vec<Range<usize>>,
}

/// Rewrites flat variant-marked rules into nested blocks.
pub struct SelectorNester {
    head: Regex,
}

impl Default for SelectorNester {
    fn default() -> Self {
        Self::new(DEFAULT_VARIANT_PREFIX)
    }
}

impl SelectorNester {
    /// Build a nester for the given variant class prefix.
    pub fn new(variant_prefix: &str) -> Self {
        let marker = regex::escape(variant_prefix);
        // Parent selector text plus separating whitespace, then a child
        // selector carrying the variant marker (class dot, prefix, escaped
        // colon), then the opening brace of the declaration block. The
        // parent group is optional so bare variant rules are still seen and
        // can be discarded; the mandatory whitespace inside it keeps
        // compound selectors like `.x.dark\:y` from being split.
        let head = Regex::new(&format!(
            r"(?m)^[ \t]*(?:([^{{}}\n]*?)[ \t]+)?(\.{marker}\\:[^ \t{{}}\n]+)[ \t]*\{{"
        ))
        .expect("nester head pattern is valid");
        Self { head }
    }

    /// Rewrite matched flat rules into nested blocks.
    ///
    /// Returns the input unchanged when nothing matches. Idempotent:
    /// rewritten output nests every child under its parent, where the
    /// parent-selector text preceding the marker is empty, so a second run
    /// finds nothing to do.
    pub fn rewrite(&self, text: &str) -> String {
        let groups = self.collect_groups(text);
        if groups.is_empty() {
            return text.to_string();
        }

        let (stripped, insert_at) = strip_ranges(text, &groups);
        rebuild(stripped, &groups, &insert_at)
    }

    /// Scan `text` for flat variant rules and group them by parent.
    ///
    /// Candidates inside comment spans, with an empty or at-rule parent, or
    /// starting inside a previously accepted match's block are discarded;
    /// the last rule is what keeps matched ranges non-overlapping across
    /// groups.
    fn collect_groups(&self, text: &str) -> Vec<SelectorGroup> {
        let comments = comment_spans(text);
        let mut groups: Vec<SelectorGroup> = Vec::new();
        let mut last_end = 0usize;

        for caps in self.head.captures_iter(text) {
            let whole = caps.get(0).expect("regex match has a whole capture");
            if whole.start() < last_end || in_span(&comments, whole.start()) {
                continue;
            }
            let parent = caps.get(1).map_or("", |m| m.as_str()).trim();
            if parent.is_empty() || parent.starts_with('@') {
                continue;
            }
            let open = whole.end() - 1;
            let Some(close) = block_end(text, open) else {
                continue;
            };
            let child = caps
                .get(2)
                .expect("head match has a child capture")
                .as_str()
                .to_string();
            let declarations: Vec<String> = text[open + 1..close]
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            let range = whole.start()..close + 1;
            last_end = range.end;

            match groups.iter_mut().find(|group| group.parent == parent) {
                Some(group) => {
                    group.children.push((child, declarations));
                    group.ranges.push(range);
                }
                None => groups.push(SelectorGroup {
                    parent: parent.to_string(),
                    first_index: range.start,
                    children: vec![(child, declarations)],
                    ranges: vec![range],
                }),
            }
        }
        groups
    }
}

/// Remove every matched range in ascending order, skipping line breaks left
/// behind by removed rules, and record where each group's first match lands
/// in the stripped text.
fn strip_ranges(text: &str, groups: &[SelectorGroup]) -> (String, Vec<(usize, usize)>) {
    let mut ranges: Vec<Range<usize>> = groups
        .iter()
        .flat_map(|group| group.ranges.iter().cloned())
        .collect();
    ranges.sort_by_key(|range| range.start);
    for pair in ranges.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "matched ranges must not overlap across groups"
        );
    }

    let first_indices: Vec<usize> = groups.iter().map(|group| group.first_index).collect();
    let bytes = text.as_bytes();
    let mut stripped = String::with_capacity(text.len());
    let mut insert_at = Vec::with_capacity(groups.len());
    let mut cursor = 0usize;

    for range in &ranges {
        stripped.push_str(&text[cursor..range.start]);
        if first_indices.contains(&range.start) {
            insert_at.push((range.start, stripped.len()));
        }
        let mut end = range.end;
        while end < bytes.len() && (bytes[end] == b'\n' || bytes[end] == b'\r') {
            end += 1;
        }
        cursor = end;
    }
    stripped.push_str(&text[cursor..]);

    (stripped, insert_at)
}

/// Insert each group's nested block, highest first offset first, so earlier
/// insertions never shift offsets still to be processed.
fn rebuild(stripped: String, groups: &[SelectorGroup], insert_at: &[(usize, usize)]) -> String {
    let mut ordered: Vec<&SelectorGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| b.first_index.cmp(&a.first_index));

    let mut result = stripped;
    for group in ordered {
        let pos = insert_at
            .iter()
            .find(|(first, _)| *first == group.first_index)
            .map(|(_, at)| *at)
            .expect("every group records its first match position");

        let mut block = String::new();
        // Conditional newlines keep repeated runs from accumulating blank
        // lines around the inserted block.
        if pos > 0 && !result[..pos].ends_with('\n') {
            block.push('\n');
        }
        block.push_str(&render_group(group));
        if !result[pos..].starts_with('\n') {
            block.push('\n');
        }
        result.insert_str(pos, &block);
    }
    result
}

/// Render one nested block: the parent selector heading a sub-block per
/// child rule, sub-blocks separated by one blank line, declaration lines
/// re-indented.
fn render_group(group: &SelectorGroup) -> String {
    let mut block = String::new();
    block.push_str(&group.parent);
    block.push_str(" {\n");
    for (index, (child, declarations)) in group.children.iter().enumerate() {
        if index > 0 {
            block.push('\n');
        }
        block.push_str("  ");
        block.push_str(child);
        block.push_str(" {\n");
        for line in declarations {
            block.push_str("    ");
            block.push_str(line);
            block.push('\n');
        }
        block.push_str("  }\n");
    }
    block.push('}');
    block
}

/// Rewrite with the default variant prefix.
pub fn rewrite(text: &str) -> String {
    SelectorNester::default().rewrite(text)
}
