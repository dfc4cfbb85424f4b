//! Build pipeline and collaborators for stylepack.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! This crate provides:
//! - Explicit build configuration with merge-with-defaults (`BuildConfig`)
//! - The dist assembly pipeline (`pipeline::run`)
//! - Stateless sass wrappers for SCSS lowering and minification
//!
//! The algorithmic core (import bundling, selector nesting) lives in
//! `stylepack-bundle`; this crate orchestrates it around plain file I/O.

pub mod config;
mod error;
pub mod lower;
pub mod pipeline;

pub use config::{AliasRule, BuildConfig, CONFIG_FILE_NAME, ConfigFile, FixupRule};
pub use error::CoreError;
pub use pipeline::{BuildReport, run};
