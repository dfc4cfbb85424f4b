//! Build configuration.
//!
//! Copyright (c) 2025 Stylepack contributors
//!
//! Configuration is an explicit value, never ambient state: `ConfigFile` is
//! the all-optional shape read from `stylepack.toml`, `BuildConfig` the
//! fully-populated form produced by [`BuildConfig::merged`]. Components
//! receive the config by reference.
//!
//! ```toml
//! src_dir = "src"
//! dist_dir = "dist"
//! entry = "index.css"
//! bundle_name = "uifx.css"
//! minify = true
//! variant_prefix = "dark"
//!
//! [[fixups]]
//! requested = "forms.css"
//! on_disk = "froms.css"
//!
//! [[aliases]]
//! target = "form-elements.css"
//! sources = ["forms.css", "froms.css"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use stylepack_bundle::{DEFAULT_VARIANT_PREFIX, Fixup, default_fixups};

use crate::error::CoreError;

/// Default name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "stylepack.toml";

/// A dist alias: `target` is written from the first of `sources` that
/// exists among the collected basenames.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasRule {
    pub target: String,
    pub sources: Vec<String>,
}

/// One fixup entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FixupRule {
    pub requested: String,
    pub on_disk: String,
}

/// The config file shape: every field optional, absent fields fall back to
/// the built-in defaults during merge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub src_dir: Option<PathBuf>,
    pub dist_dir: Option<PathBuf>,
    pub entry: Option<String>,
    pub bundle_name: Option<String>,
    pub utils_bundle: Option<String>,
    pub minify: Option<bool>,
    pub variant_prefix: Option<String>,
    pub fixups: Option<Vec<FixupRule>>,
    pub aliases: Option<Vec<AliasRule>>,
    pub repository: Option<String>,
    pub version: Option<String>,
}

impl ConfigFile {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path).map_err(|err| CoreError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        toml::from_str(&text).map_err(|err| CoreError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

/// Fully-populated build configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub src_dir: PathBuf,
    pub dist_dir: PathBuf,
    /// Entry file name, relative to `src_dir`.
    pub entry: String,
    /// Name of the flattened bundle written into the dist dir.
    pub bundle_name: String,
    /// Name of the utils concatenation bundle.
    pub utils_bundle: String,
    /// Whether to write `.min.css` siblings for every dist artifact.
    pub minify: bool,
    /// Variant class prefix recognized by the selector nester.
    pub variant_prefix: String,
    /// Legacy-filename corrections, in priority order.
    pub fixups: Vec<Fixup>,
    pub aliases: Vec<AliasRule>,
    /// GitHub repository URL or `owner/name`, for cache purging.
    pub repository: Option<String>,
    /// Published version, for cache purging.
    pub version: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            dist_dir: PathBuf::from("dist"),
            entry: "index.css".to_string(),
            bundle_name: "bundle.css".to_string(),
            utils_bundle: "utils.css".to_string(),
            minify: true,
            variant_prefix: DEFAULT_VARIANT_PREFIX.to_string(),
            fixups: default_fixups(),
            aliases: vec![AliasRule {
                target: "form-elements.css".to_string(),
                sources: vec!["forms.css".to_string(), "froms.css".to_string()],
            }],
            repository: None,
            version: None,
        }
    }
}

impl BuildConfig {
    /// Merge a config file over the defaults: present fields win, absent
    /// fields keep their default value.
    pub fn merged(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            src_dir: file.src_dir.unwrap_or(defaults.src_dir),
            dist_dir: file.dist_dir.unwrap_or(defaults.dist_dir),
            entry: file.entry.unwrap_or(defaults.entry),
            bundle_name: file.bundle_name.unwrap_or(defaults.bundle_name),
            utils_bundle: file.utils_bundle.unwrap_or(defaults.utils_bundle),
            minify: file.minify.unwrap_or(defaults.minify),
            variant_prefix: file.variant_prefix.unwrap_or(defaults.variant_prefix),
            fixups: file
                .fixups
                .map(|rules| {
                    rules
                        .into_iter()
                        .map(|rule| Fixup::new(rule.requested, rule.on_disk))
                        .collect()
                })
                .unwrap_or(defaults.fixups),
            aliases: file.aliases.unwrap_or(defaults.aliases),
            repository: file.repository,
            version: file.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_empty_file_is_all_defaults() {
        let config = BuildConfig::merged(ConfigFile::default());
        assert_eq!(config.src_dir, PathBuf::from("src"));
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.entry, "index.css");
        assert_eq!(config.bundle_name, "bundle.css");
        assert_eq!(config.utils_bundle, "utils.css");
        assert!(config.minify);
        assert_eq!(config.variant_prefix, "dark");
        assert_eq!(config.fixups, default_fixups());
        assert_eq!(config.aliases.len(), 1);
        assert!(config.repository.is_none());
    }

    #[test]
    fn test_merged_present_fields_win() {
        let file = ConfigFile {
            src_dir: Some(PathBuf::from("styles")),
            bundle_name: Some("uifx.css".to_string()),
            minify: Some(false),
            ..Default::default()
        };
        let config = BuildConfig::merged(file);
        assert_eq!(config.src_dir, PathBuf::from("styles"));
        assert_eq!(config.bundle_name, "uifx.css");
        assert!(!config.minify);
        // Untouched fields keep their defaults.
        assert_eq!(config.entry, "index.css");
        assert_eq!(config.fixups, default_fixups());
    }

    #[test]
    fn test_parse_full_config_file() {
        let toml = r#"
src_dir = "styles"
dist_dir = "out"
entry = "main.css"
bundle_name = "site.css"
minify = false
variant_prefix = "hover"
repository = "https://github.com/acme/uifx"
version = "1.2.3"

[[fixups]]
requested = "forms.css"
on_disk = "froms.css"

[[aliases]]
target = "form-elements.css"
sources = ["forms.css", "froms.css"]
"#;
        let file: ConfigFile = toml::from_str(toml).unwrap();
        let config = BuildConfig::merged(file);
        assert_eq!(config.dist_dir, PathBuf::from("out"));
        assert_eq!(config.variant_prefix, "hover");
        assert_eq!(config.fixups, vec![Fixup::new("forms.css", "froms.css")]);
        assert_eq!(config.aliases[0].target, "form-elements.css");
        assert_eq!(config.repository.as_deref(), Some("https://github.com/acme/uifx"));
        assert_eq!(config.version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("no_such_field = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = ConfigFile::load(Path::new("/nonexistent/stylepack.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
