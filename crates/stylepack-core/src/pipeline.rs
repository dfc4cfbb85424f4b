//! Dist assembly pipeline.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! [`run`] recreates the dist directory and assembles every artifact in a
//! fixed order: individual file copies, legacy aliases, the utils bundle,
//! the flattened entry bundle, and finally minified siblings. Each step is
//! a plain function taking the config by reference.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use stylepack_bundle::{Bundler, CANONICAL_EXT, PathResolver, SOURCE_EXTS, SelectorNester};

use crate::config::BuildConfig;
use crate::error::CoreError;
use crate::lower;

/// What a pipeline run produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Every file written into the dist directory, in write order.
    pub artifacts: Vec<PathBuf>,
}

/// Run the full build: recreate dist and write every artifact.
pub fn run(config: &BuildConfig) -> Result<BuildReport, CoreError> {
    info!(src = %config.src_dir.display(), dist = %config.dist_dir.display(), "building");

    recreate_dist(&config.dist_dir)?;
    let sources = collect_sources(&config.src_dir);
    let nester = SelectorNester::new(&config.variant_prefix);

    let mut report = BuildReport::default();
    let basenames = write_individual_files(config, &sources, &mut report)?;
    write_alias_files(config, &basenames, &mut report)?;
    write_utils_bundle(config, &sources, &nester, &mut report)?;
    write_entry_bundle(config, &nester, &mut report)?;
    if config.minify {
        write_minified_copies(config, &mut report)?;
    }

    info!(artifacts = report.artifacts.len(), "build complete");
    Ok(report)
}

/// Delete and recreate the dist directory so stale artifacts never survive.
fn recreate_dist(dist_dir: &Path) -> Result<(), CoreError> {
    if dist_dir.exists() {
        fs::remove_dir_all(dist_dir)?;
    }
    fs::create_dir_all(dist_dir)?;
    Ok(())
}

/// Every `*.css` file under the source dir, sorted by path.
fn collect_sources(src_dir: &Path) -> Vec<PathBuf> {
    let mut sources: Vec<PathBuf> = WalkDir::new(src_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CANONICAL_EXT))
        })
        .collect();
    sources.sort();
    sources
}

/// Copy each source into dist under its bare basename, skipping the entry
/// file. The flattening makes duplicate basenames ambiguous, so those are
/// fatal.
fn write_individual_files(
    config: &BuildConfig,
    sources: &[PathBuf],
    report: &mut BuildReport,
) -> Result<BTreeMap<String, PathBuf>, CoreError> {
    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    for source in sources {
        let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name == config.entry {
            continue;
        }
        if seen.contains_key(name) {
            return Err(CoreError::DuplicateBasename {
                name: name.to_string(),
            });
        }
        let dest = config.dist_dir.join(name);
        fs::copy(source, &dest)?;
        debug!(file = name, "copied");
        seen.insert(name.to_string(), dest.clone());
        report.artifacts.push(dest);
    }
    Ok(seen)
}

/// Write each alias target from the first of its sources that was copied.
fn write_alias_files(
    config: &BuildConfig,
    basenames: &BTreeMap<String, PathBuf>,
    report: &mut BuildReport,
) -> Result<(), CoreError> {
    for alias in &config.aliases {
        let Some(found) = alias.sources.iter().find_map(|name| basenames.get(name)) else {
            debug!(target = %alias.target, "no alias source present, skipping");
            continue;
        };
        let dest = config.dist_dir.join(&alias.target);
        fs::copy(found, &dest)?;
        debug!(target = %alias.target, from = %found.display(), "aliased");
        report.artifacts.push(dest);
    }
    Ok(())
}

/// Concatenate every source under a `utils/` path component into one bundle
/// and run the selector nester over it.
fn write_utils_bundle(
    config: &BuildConfig,
    sources: &[PathBuf],
    nester: &SelectorNester,
    report: &mut BuildReport,
) -> Result<(), CoreError> {
    let mut parts = Vec::new();
    for source in sources {
        let in_utils = source
            .components()
            .any(|component| component.as_os_str() == "utils");
        if !in_utils {
            continue;
        }
        if source
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name == config.entry)
        {
            continue;
        }
        parts.push(fs::read_to_string(source)?);
    }

    let joined = parts.join("\n");
    let trimmed = joined.trim();
    let content = if trimmed.is_empty() {
        String::new()
    } else {
        nester.rewrite(&format!("{trimmed}\n"))
    };

    let dest = config.dist_dir.join(&config.utils_bundle);
    fs::write(&dest, content)?;
    debug!(files = parts.len(), bundle = %config.utils_bundle, "utils bundle written");
    report.artifacts.push(dest);
    Ok(())
}

/// Flatten the entry's import graph (or lower an SCSS entry), nest variant
/// selectors, and write the result under the configured bundle name.
fn write_entry_bundle(
    config: &BuildConfig,
    nester: &SelectorNester,
    report: &mut BuildReport,
) -> Result<(), CoreError> {
    let entry = config.src_dir.join(&config.entry);
    if !entry.is_file() {
        return Err(CoreError::EntryNotFound { path: entry });
    }

    let is_sass_entry = entry
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTS.contains(&ext));
    let flat = if is_sass_entry {
        lower::lower_scss(&entry)?
    } else {
        let bundler = Bundler::new(PathResolver::new(config.fixups.clone()));
        bundler.expand(&entry)?
    };

    let nested = nester.rewrite(&flat);
    let dest = config.dist_dir.join(&config.bundle_name);
    fs::write(&dest, nested)?;
    info!(bundle = %config.bundle_name, "entry bundle written");
    report.artifacts.push(dest);
    Ok(())
}

/// Write a `.min.css` sibling for every non-minified `.css` in dist. A file
/// the minifier rejects is skipped with a warning rather than failing the
/// whole build.
fn write_minified_copies(config: &BuildConfig, report: &mut BuildReport) -> Result<(), CoreError> {
    let mut targets = Vec::new();
    for entry in fs::read_dir(&config.dist_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(&format!(".{CANONICAL_EXT}")) && !name.ends_with(".min.css") {
            targets.push(path);
        }
    }
    targets.sort();

    for path in targets {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let css = fs::read_to_string(&path)?;
        let minified = match lower::minify_css(&css) {
            Ok(minified) => minified,
            Err(err) => {
                warn!(file = %path.display(), %err, "minification failed, skipping");
                continue;
            }
        };
        let dest = config.dist_dir.join(format!("{stem}.min.css"));
        fs::write(&dest, minified)?;
        report.artifacts.push(dest);
    }
    Ok(())
}
