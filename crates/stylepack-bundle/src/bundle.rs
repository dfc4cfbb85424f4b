//! Import-graph bundling.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! `Bundler::expand` flattens an entry file and its transitive `@import`s
//! into one text. The traversal is an explicit frame stack rather than
//! call-stack recursion: each frame owns one file's text plus the directive
//! and literal segments scanned out of it. A per-call visited set keyed by
//! canonical path guarantees each file contributes its content at most
//! once per bundle, which is also what makes cyclic graphs terminate.

use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::BundleError;
use crate::resolve::PathResolver;
use crate::scan::{comment_spans, overlaps_span};

/// Leading filename character reserving a file for inclusion only.
pub const PARTIAL_MARKER: char = '_';

/// Line-anchored import directive: keyword, quoted relative path, statement
/// terminator, optional trailing whitespace. The line terminator is part of
/// the match so substituted content replaces the whole line.
static IMPORT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^@import[ \t]+['"]([^'"]+)['"][ \t]*;[ \t]*(?:\r?\n|\z)"#).unwrap()
});

/// One scanned piece of a source file: literal text to copy through, or an
/// import directive to substitute.
enum Segment {
    Text(Range<usize>),
    Directive(Range<usize>),
}

/// One file on the traversal stack.
struct Frame {
    path: PathBuf,
    text: String,
    segments: Vec<Segment>,
    next: usize,
    /// Nested frames separate their content from what follows by a newline.
    newline_on_pop: bool,
}

impl Frame {
    fn read(path: PathBuf, newline_on_pop: bool) -> Result<Self, BundleError> {
        let text = fs::read_to_string(&path).map_err(|source| BundleError::Read {
            path: path.clone(),
            source,
        })?;
        let segments = scan_segments(&text);
        Ok(Self {
            path,
            text,
            segments,
            next: 0,
            newline_on_pop,
        })
    }
}

/// Split `text` into literal and directive segments.
///
/// Block-comment spans are located first; a directive match touching one is
/// not interpreted, so comment interiors stay inside ordinary literal
/// segments and are copied through byte-for-byte.
fn scan_segments(text: &str) -> Vec<Segment> {
    let comments = comment_spans(text);
    let mut segments = Vec::new();
    let mut cursor = 0;
    for caps in IMPORT_DIRECTIVE.captures_iter(text) {
        let whole = caps.get(0).expect("regex match has a whole capture");
        if overlaps_span(&comments, &(whole.start()..whole.end())) {
            continue;
        }
        if whole.start() > cursor {
            segments.push(Segment::Text(cursor..whole.start()));
        }
        let path = caps.get(1).expect("directive match has a path capture");
        segments.push(Segment::Directive(path.start()..path.end()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        segments.push(Segment::Text(cursor..text.len()));
    }
    segments
}

/// True when the directive target's filename carries the partial marker.
fn is_partial(raw: &str) -> bool {
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(PARTIAL_MARKER))
}

/// Expands import directives into a single flattened text.
#[derive(Debug, Default)]
pub struct Bundler {
    resolver: PathResolver,
}

enum Step {
    Pop,
    Directive { raw: String, from: PathBuf },
}

impl Bundler {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Flatten `entry` and everything it transitively imports.
    ///
    /// Each file's content appears at most once, at its first pre-order
    /// depth-first position. Directives targeting partial-marked filenames
    /// are dropped silently; unresolvable directives are elided with a
    /// warning. Only a missing entry or an unreadable source file is fatal.
    /// The result is trimmed and carries exactly one trailing newline.
    pub fn expand(&self, entry: &Path) -> Result<String, BundleError> {
        let entry = fs::canonicalize(entry).map_err(|_| BundleError::EntryNotFound {
            path: entry.to_path_buf(),
        })?;
        let mut visited: HashSet<PathBuf> = HashSet::new();
        visited.insert(entry.clone());

        let mut out = String::new();
        let mut stack = vec![Frame::read(entry, false)?];

        loop {
            let step = match stack.last_mut() {
                None => break,
                Some(frame) => {
                    if frame.next == frame.segments.len() {
                        Step::Pop
                    } else {
                        let index = frame.next;
                        frame.next += 1;
                        match &frame.segments[index] {
                            Segment::Text(range) => {
                                out.push_str(&frame.text[range.clone()]);
                                continue;
                            }
                            Segment::Directive(range) => Step::Directive {
                                raw: frame.text[range.clone()].to_string(),
                                from: frame.path.clone(),
                            },
                        }
                    }
                }
            };

            match step {
                Step::Pop => {
                    let finished = stack.pop().expect("frame present on pop");
                    if finished.newline_on_pop && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                Step::Directive { raw, from } => {
                    if is_partial(&raw) {
                        continue;
                    }
                    match self.resolver.resolve(&raw, &from) {
                        Some(resolved) => {
                            // First reference wins; later references to the
                            // same file substitute nothing.
                            if visited.insert(resolved.clone()) {
                                stack.push(Frame::read(resolved, true)?);
                            }
                        }
                        None => {
                            warn!("skipped missing import: {raw} (from {})", from.display());
                        }
                    }
                }
            }
        }

        let mut bundled = out.trim().to_string();
        bundled.push('\n');
        Ok(bundled)
    }
}
