//! Import path resolution.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! Raw import paths are resolved relative to the referencing file. The
//! candidate order is deterministic: the path as written, then its
//! extension-normalized variants, and only when none of those exist the
//! fixup table is consulted, in table order. The first candidate found on
//! disk wins, so resolution ambiguity is impossible by construction.

use std::fs;
use std::path::{Path, PathBuf};

/// Canonical extension of bundled style sources.
pub const CANONICAL_EXT: &str = "css";

/// Higher-level syntax extensions that lower to the canonical extension.
pub const SOURCE_EXTS: &[&str] = &["scss", "sass"];

/// One legacy-filename correction: a suffix imports may request
/// (`requested`) mapped to the suffix actually present on disk (`on_disk`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixup {
    pub requested: String,
    pub on_disk: String,
}

impl Fixup {
    pub fn new(requested: impl Into<String>, on_disk: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            on_disk: on_disk.into(),
        }
    }
}

/// Corrections carried over from the legacy build script.
pub fn default_fixups() -> Vec<Fixup> {
    vec![
        Fixup::new("forms.css", "froms.css"),
        Fixup::new("paddings.css", "padding.css"),
    ]
}

/// Resolves raw import paths to absolute file paths.
#[derive(Debug, Clone)]
pub struct PathResolver {
    fixups: Vec<Fixup>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self {
            fixups: default_fixups(),
        }
    }
}

impl PathResolver {
    /// Build a resolver with a caller-supplied fixup table. Order matters:
    /// earlier entries are tried first.
    pub fn new(fixups: Vec<Fixup>) -> Self {
        Self { fixups }
    }

    /// Resolve a raw import path relative to the file that references it.
    ///
    /// Returns the canonicalized path of the first existing candidate, or
    /// `None` when nothing matches. `None` is not a fatal condition; the
    /// caller decides disposition. Only read-only existence checks are
    /// performed.
    pub fn resolve(&self, raw: &str, referencing_file: &Path) -> Option<PathBuf> {
        let dir = referencing_file.parent().unwrap_or_else(|| Path::new("."));
        let candidates = candidates(raw);

        for candidate in &candidates {
            if let Some(hit) = probe(dir, candidate) {
                return Some(hit);
            }
        }

        for fixup in &self.fixups {
            for candidate in &candidates {
                let Some(stem) = candidate.strip_suffix(fixup.requested.as_str()) else {
                    continue;
                };
                let corrected = format!("{stem}{}", fixup.on_disk);
                if let Some(hit) = probe(dir, &corrected) {
                    return Some(hit);
                }
            }
        }

        None
    }
}

/// Ordered direct candidates for a raw import path: as given, then with a
/// higher-level extension swapped for the canonical one, then with the
/// canonical extension appended when there is none at all.
fn candidates(raw: &str) -> Vec<String> {
    let mut list = vec![raw.to_string()];
    match Path::new(raw).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if SOURCE_EXTS.contains(&ext) => {
            let stem = &raw[..raw.len() - ext.len() - 1];
            list.push(format!("{stem}.{CANONICAL_EXT}"));
        }
        Some(_) => {}
        None => list.push(format!("{raw}.{CANONICAL_EXT}")),
    }
    list
}

fn probe(dir: &Path, candidate: &str) -> Option<PathBuf> {
    let joined = dir.join(candidate);
    if joined.is_file() {
        // Canonical form keeps visited-set keys stable across `../` spellings.
        fs::canonicalize(&joined).ok()
    } else {
        None
    }
}
