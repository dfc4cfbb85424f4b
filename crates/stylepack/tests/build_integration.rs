//! Integration tests for the build pipeline.
//!
//! These tests exercise the full dist assembly from a realistic source tree,
//! verifying that bundling, fixups, aliases, the utils bundle, selector
//! nesting, and minification work together correctly.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use stylepack_core::{BuildConfig, CoreError, pipeline};

/// A populated source tree plus its build config.
struct Fixture {
    temp: TempDir,
    config: BuildConfig,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let config = BuildConfig {
            src_dir: temp.path().join("src"),
            dist_dir: temp.path().join("dist"),
            ..BuildConfig::default()
        };
        Self { temp, config }
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.temp.path().join("src").join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source directory");
        }
        fs::write(path, content).expect("Failed to write source file");
    }

    fn dist(&self, name: &str) -> PathBuf {
        self.config.dist_dir.join(name)
    }

    fn read_dist(&self, name: &str) -> String {
        fs::read_to_string(self.dist(name)).expect("Failed to read dist file")
    }
}

fn populate_site(fixture: &Fixture) {
    fixture.write(
        "index.css",
        "/* entry */\n\
         @import 'base/reset.css';\n\
         @import 'base/card.scss';\n\
         @import 'forms.css';\n\
         @import '_draft.css';\n\
         @import 'missing.css';\n\
         .site{margin:0}\n",
    );
    fixture.write("base/reset.css", "*{box-sizing:border-box}\n");
    // Referenced as base/card.scss but only the lowered .css exists on disk.
    fixture.write("base/card.css", ".card{color:red}\n");
    // Referenced as forms.css, present under the misspelled legacy name.
    fixture.write("froms.css", ".form input{border:1px solid}\n");
    fixture.write("_draft.css", ".draft{display:none}\n");
    fixture.write(
        "utils/spacing.css",
        ".m-0{margin:0}\n.card .dark\\:muted{opacity:.5}\n",
    );
    fixture.write("utils/text.css", ".bold{font-weight:700}\n");
}

#[test]
fn test_full_build_produces_expected_artifacts() {
    let fixture = Fixture::new();
    populate_site(&fixture);

    let report = pipeline::run(&fixture.config).expect("build failed");

    for name in [
        "reset.css",
        "card.css",
        "froms.css",
        "_draft.css",
        "spacing.css",
        "text.css",
        "form-elements.css",
        "utils.css",
        "bundle.css",
    ] {
        assert!(fixture.dist(name).is_file(), "missing artifact: {name}");
        assert!(report.artifacts.contains(&fixture.dist(name)));
    }
    // The entry itself is never copied as an individual file.
    assert!(!fixture.dist("index.css").exists());
}

#[test]
fn test_bundle_flattens_with_fixups_and_drops_partials() {
    let fixture = Fixture::new();
    populate_site(&fixture);

    pipeline::run(&fixture.config).expect("build failed");

    let bundle = fixture.read_dist("bundle.css");
    // Imports are inlined in order. The directive on base/card.css arrives
    // via an .scss path that resolves to the sibling .css file, forms.css
    // resolves through the fixup table, the partial and the unresolvable
    // import are dropped.
    assert!(bundle.contains("/* entry */"));
    assert!(bundle.contains("*{box-sizing:border-box}"));
    assert!(bundle.contains(".card{color:red}"));
    assert!(bundle.contains(".form input{border:1px solid}"));
    assert!(!bundle.contains(".draft"));
    assert!(!bundle.contains("@import"));
    assert!(bundle.ends_with(".site{margin:0}\n"));

    let reset = bundle.find("box-sizing").expect("reset missing");
    let card = bundle.find(".card").expect("card missing");
    let form = bundle.find(".form input").expect("form missing");
    assert!(reset < card && card < form, "import order not preserved");
}

#[test]
fn test_alias_written_from_legacy_name() {
    let fixture = Fixture::new();
    populate_site(&fixture);

    pipeline::run(&fixture.config).expect("build failed");

    assert_eq!(
        fixture.read_dist("form-elements.css"),
        ".form input{border:1px solid}\n"
    );
}

#[test]
fn test_utils_bundle_is_nested_and_sorted() {
    let fixture = Fixture::new();
    populate_site(&fixture);

    pipeline::run(&fixture.config).expect("build failed");

    let utils = fixture.read_dist("utils.css");
    // spacing.css sorts before text.css; the variant rule is regrouped
    // under its parent selector.
    assert!(utils.contains(".m-0{margin:0}"));
    assert!(utils.contains(".card {"));
    assert!(utils.contains(".dark\\:muted {"));
    assert!(!utils.contains(".card .dark\\:muted{"));
    let spacing = utils.find(".m-0").expect("spacing missing");
    let text = utils.find(".bold").expect("text missing");
    assert!(spacing < text, "utils files not sorted");
    assert!(utils.ends_with('\n'));
}

#[test]
fn test_minified_siblings_written_for_every_artifact() {
    let fixture = Fixture::new();
    populate_site(&fixture);

    pipeline::run(&fixture.config).expect("build failed");

    for name in ["reset", "card", "bundle", "utils", "form-elements"] {
        assert!(
            fixture.dist(&format!("{name}.min.css")).is_file(),
            "missing minified copy for {name}"
        );
    }
    let min = fixture.read_dist("card.min.css");
    assert!(min.contains(".card{color:red}"));
    // Minified copies are never re-minified.
    assert!(!fixture.dist("card.min.min.css").exists());
}

#[test]
fn test_no_minify_config_skips_min_copies() {
    let fixture = Fixture::new();
    populate_site(&fixture);
    let config = BuildConfig {
        minify: false,
        ..fixture.config.clone()
    };

    pipeline::run(&config).expect("build failed");

    assert!(fixture.dist("bundle.css").is_file());
    assert!(!fixture.dist("bundle.min.css").exists());
}

#[test]
fn test_missing_entry_fails_the_build() {
    let fixture = Fixture::new();
    fixture.write("card.css", ".card{}\n");

    let err = pipeline::run(&fixture.config).expect_err("build should fail");
    assert!(matches!(err, CoreError::EntryNotFound { .. }));
}

#[test]
fn test_rebuild_is_reproducible() {
    let fixture = Fixture::new();
    populate_site(&fixture);

    pipeline::run(&fixture.config).expect("first build failed");
    let first = fixture.read_dist("bundle.css");
    pipeline::run(&fixture.config).expect("second build failed");
    let second = fixture.read_dist("bundle.css");

    assert_eq!(first, second);
}

#[test]
fn test_stale_dist_content_removed() {
    let fixture = Fixture::new();
    populate_site(&fixture);
    let stale = fixture.config.dist_dir.join("stale.css");
    fs::create_dir_all(&fixture.config.dist_dir).expect("Failed to create dist");
    fs::write(&stale, ".stale{}\n").expect("Failed to write stale file");

    pipeline::run(&fixture.config).expect("build failed");

    assert!(!stale.exists());
}

#[test]
fn test_scss_entry_is_lowered() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let config = BuildConfig {
        src_dir: temp.path().join("src"),
        dist_dir: temp.path().join("dist"),
        entry: "index.scss".to_string(),
        minify: false,
        ..BuildConfig::default()
    };
    fs::create_dir_all(&config.src_dir).expect("Failed to create src");
    fs::write(
        config.src_dir.join("index.scss"),
        ".card { .title { color: red; } }\n",
    )
    .expect("Failed to write entry");

    pipeline::run(&config).expect("build failed");

    let bundle =
        fs::read_to_string(config.dist_dir.join("bundle.css")).expect("Failed to read bundle");
    assert!(bundle.contains(".card .title"));
}

#[test]
fn test_comment_interiors_survive_bundling_verbatim() {
    let fixture = Fixture::new();
    fixture.write(
        "index.css",
        "/* keep: @import 'phantom.css'; */\n@import 'real.css';\n",
    );
    fixture.write("real.css", ".real{}\n");

    pipeline::run(&fixture.config).expect("build failed");

    let bundle = fixture.read_dist("bundle.css");
    assert!(bundle.contains("/* keep: @import 'phantom.css'; */"));
    assert!(bundle.contains(".real{}"));
    assert!(!fixture.dist("phantom.css").exists());
}

#[test]
fn test_duplicate_basenames_across_directories_fail() {
    let fixture = Fixture::new();
    fixture.write("index.css", "");
    fixture.write("a/button.css", ".a{}\n");
    fixture.write("b/button.css", ".b{}\n");

    let err = pipeline::run(&fixture.config).expect_err("build should fail");
    assert!(
        matches!(err, CoreError::DuplicateBasename { ref name } if name == "button.css"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_dist_dir_created_when_absent() {
    let fixture = Fixture::new();
    fixture.write("index.css", ".site{}\n");
    assert!(!fixture.config.dist_dir.exists());

    pipeline::run(&fixture.config).expect("build failed");

    assert!(fixture.dist("bundle.css").is_file());
}
