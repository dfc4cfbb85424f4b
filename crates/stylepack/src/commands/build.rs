//! Build command implementation.
//!
//! Loads the config (explicit path, `stylepack.toml` in the working
//! directory, or built-in defaults), applies CLI overrides, and runs the
//! dist assembly pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use stylepack_core::{BuildConfig, CONFIG_FILE_NAME, ConfigFile, pipeline};

/// Arguments for the build command
#[derive(Debug)]
pub struct BuildArgs {
    /// Explicit config file path
    pub config: Option<String>,
    /// Source directory override
    pub src_dir: Option<String>,
    /// Dist directory override
    pub dist_dir: Option<String>,
    /// Skip .min.css copies
    pub no_minify: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let file = load_config(args.config.as_deref())?;
    let mut config = BuildConfig::merged(file);

    if let Some(src_dir) = args.src_dir {
        config.src_dir = PathBuf::from(src_dir);
    }
    if let Some(dist_dir) = args.dist_dir {
        config.dist_dir = PathBuf::from(dist_dir);
    }
    if args.no_minify {
        config.minify = false;
    }

    let report = pipeline::run(&config).context("build failed")?;
    info!(
        artifacts = report.artifacts.len(),
        dist = %config.dist_dir.display(),
        "done"
    );
    Ok(())
}

/// Load the config file. An explicit path must exist and parse; the default
/// path is only loaded when present, otherwise defaults apply.
pub(crate) fn load_config(explicit: Option<&str>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            let path = Path::new(path);
            ConfigFile::load(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let default = Path::new(CONFIG_FILE_NAME);
            if default.is_file() {
                ConfigFile::load(default)
                    .with_context(|| format!("reading {}", default.display()))
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}
