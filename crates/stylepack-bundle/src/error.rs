//! Error types for bundling operations.
//!
//! Copyright (c) 2025 Stylepack contributors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while expanding an import graph.
///
/// Unresolvable import directives are deliberately not represented here:
/// they degrade to omitted content plus a logged diagnostic, and the bundle
/// proceeds. Only a missing entry file or an unreadable source file aborts
/// an expansion.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The entry file could not be located.
    #[error("entry file not found: {}", .path.display())]
    EntryNotFound { path: PathBuf },

    /// A source file resolved but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
