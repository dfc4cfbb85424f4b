//! Sass wrappers.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! Thin stateless wrappers over `grass`. Lowering compiles an SCSS entry to
//! expanded CSS; minification runs plain CSS back through the compiler with
//! compressed output.

use std::path::Path;

use crate::error::CoreError;

/// Compile an SCSS or Sass file to expanded CSS.
pub fn lower_scss(path: &Path) -> Result<String, CoreError> {
    let options = grass::Options::default().style(grass::OutputStyle::Expanded);
    grass::from_path(path, &options).map_err(|err| CoreError::Sass {
        message: err.to_string(),
    })
}

/// Minify a CSS string.
///
/// CSS is a syntactic subset of SCSS, so compressed-output compilation
/// doubles as the minifier.
pub fn minify_css(css: &str) -> Result<String, CoreError> {
    let options = grass::Options::default().style(grass::OutputStyle::Compressed);
    grass::from_string(css.to_string(), &options).map_err(|err| CoreError::Sass {
        message: err.to_string(),
    })
}
