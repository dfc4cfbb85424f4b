//! CSS import bundling and selector nesting for stylepack.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! This crate provides:
//! - Import path resolution with legacy-filename fixups (`PathResolver`)
//! - Import-graph flattening with per-bundle deduplication (`Bundler`)
//! - The variant-selector nesting rewrite (`SelectorNester`)
//!
//! Everything here works at the textual level: the bundler and the nester
//! scan and splice byte ranges rather than parsing a CSS syntax tree.

mod bundle;
mod error;
mod nest;
mod resolve;
mod scan;

pub use bundle::{Bundler, PARTIAL_MARKER};
pub use error::BundleError;
pub use nest::{DEFAULT_VARIANT_PREFIX, SelectorNester, rewrite};
pub use resolve::{CANONICAL_EXT, Fixup, PathResolver, SOURCE_EXTS, default_fixups};
