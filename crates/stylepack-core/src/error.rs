//! Error types for the build pipeline.
//!
//! Copyright (c) 2025 Stylepack contributors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use stylepack_bundle::BundleError;

/// Errors raised by the build pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The required entry file is missing. Always fatal.
    #[error("entry file not found: {}", .path.display())]
    EntryNotFound { path: PathBuf },

    /// Two source files would flatten to the same dist basename.
    #[error("duplicate file name detected for dist output: {name}")]
    DuplicateBasename { name: String },

    /// Import expansion failed.
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// The config file could not be read or parsed.
    #[error("failed to load config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Sass compilation (lowering or minification) failed.
    #[error("sass compilation failed: {message}")]
    Sass { message: String },

    /// File I/O error outside the bundler.
    #[error(transparent)]
    Io(#[from] io::Error),
}
