//! Purge command implementation.
//!
//! Issues jsDelivr cache purge requests for every `.css` file in the dist
//! directory, for the `latest` ref plus the configured version (with and
//! without a `v` prefix). All requests are fired concurrently and settled
//! before the command reports failure.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use stylepack_core::BuildConfig;

use crate::commands::build::load_config;

static GITHUB_REPO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)github\.com[/:]([^/]+)/([^/.]+?)(?:\.git)?/?$").unwrap()
});

/// Arguments for the purge command
#[derive(Debug)]
pub struct PurgeArgs {
    /// Explicit config file path
    pub config: Option<String>,
    /// Repository override (owner/name or GitHub URL)
    pub repository: Option<String>,
    /// Version override
    pub version: Option<String>,
    /// Dist directory override
    pub dist_dir: Option<String>,
}

/// Execute the purge command
pub fn execute(args: PurgeArgs) -> Result<()> {
    let file = load_config(args.config.as_deref())?;
    let mut config = BuildConfig::merged(file);

    if let Some(repository) = args.repository {
        config.repository = Some(repository);
    }
    if let Some(version) = args.version {
        config.version = Some(version);
    }
    if let Some(dist_dir) = args.dist_dir {
        config.dist_dir = PathBuf::from(dist_dir);
    }

    let Some(repository) = config.repository.as_deref() else {
        bail!("no repository configured; set `repository` in stylepack.toml or pass --repository");
    };
    let (owner, repo) = parse_repository(repository)
        .with_context(|| format!("unrecognized repository: {repository}"))?;

    let files = dist_css_files(&config.dist_dir)
        .with_context(|| format!("reading {}", config.dist_dir.display()))?;
    if files.is_empty() {
        bail!("no .css files under {}", config.dist_dir.display());
    }

    let mut refs = vec!["latest".to_string()];
    if let Some(version) = config.version.as_deref() {
        refs.push(version.to_string());
        refs.push(format!("v{version}"));
    }

    let mut urls = Vec::with_capacity(refs.len() * files.len());
    for git_ref in &refs {
        for file in &files {
            urls.push(format!(
                "https://purge.jsdelivr.net/gh/{owner}/{repo}@{git_ref}/dist/{file}"
            ));
        }
    }

    info!(urls = urls.len(), repo = %format!("{owner}/{repo}"), "purging jsDelivr cache");

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let failed = runtime.block_on(purge_all(&urls));

    if !failed.is_empty() {
        bail!("{} of {} purge requests failed", failed.len(), urls.len());
    }
    info!("cache purged");
    Ok(())
}

/// Extract `(owner, repo)` from a bare `owner/name` or a GitHub URL.
fn parse_repository(repository: &str) -> Option<(String, String)> {
    if let Some(caps) = GITHUB_REPO.captures(repository) {
        return Some((caps[1].to_string(), caps[2].to_string()));
    }
    let (owner, repo) = repository.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Basenames of the `.css` files in the dist directory, sorted.
fn dist_css_files(dist_dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dist_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && name.ends_with(".css")
        {
            files.push(name.to_string());
        }
    }
    files.sort();
    Ok(files)
}

/// Fire one GET per purge URL, wait for all to settle, and return the URLs
/// that failed.
async fn purge_all(urls: &[String]) -> Vec<String> {
    let client = reqwest::Client::new();
    let requests = urls.iter().map(|url| {
        let client = client.clone();
        async move {
            let outcome = client.get(url).send().await;
            match outcome {
                Ok(response) if response.status().is_success() => Ok(()),
                Ok(response) => Err(format!("status {}", response.status())),
                Err(err) => Err(err.to_string()),
            }
        }
    });

    let settled = futures::future::join_all(requests).await;
    let mut failed = Vec::new();
    for (url, outcome) in urls.iter().zip(settled) {
        if let Err(reason) = outcome {
            warn!(%url, %reason, "purge request failed");
            failed.push(url.clone());
        }
    }
    failed
}
