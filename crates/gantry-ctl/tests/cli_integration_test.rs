//! End-to-end tests for the `gantry` binary.
//!
//! Each test works in its own temp project. Schema checks point at a local schema file
//! so no network access is required.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const SCHEMA: &str = r#"{
  "type": "object",
  "required": ["name", "on", "jobs"],
  "properties": {
    "name": { "type": "string" },
    "jobs": { "type": "object" }
  }
}"#;

const LOCAL_CONFIG: &str = r#"
[workflows.defaults.checks.schema]
uri = "schema.json"
"#;

/// Get the path to the compiled gantry binary.
fn gantry_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gantry"))
}

/// Run gantry with the given args from a working directory.
fn run_gantry(work_dir: &Path, args: &[&str]) -> Output {
    Command::new(gantry_bin())
        .args(args)
        .arg("--no-color")
        .current_dir(work_dir)
        .env("HOME", work_dir.to_str().unwrap()) // Isolate dependency cache
        .env_remove("XDG_CACHE_HOME")
        .env_remove("GANTRY_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute gantry")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A project with a local schema and a single `test` template.
fn project_with_template(template: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "schema.json", SCHEMA);
    write(dir.path(), ".gantry/config.toml", LOCAL_CONFIG);
    write(dir.path(), ".gantry/workflows/test.jsonnet", template);
    dir
}

const TEST_TEMPLATE: &str =
    "std.manifestYamlDoc({ name: 'test', on: 'push', jobs: { build: { 'runs-on': 'ubuntu-latest' } } })";

#[test]
fn test_init_update_check_round_trip() {
    let dir = TempDir::new().unwrap();

    let init = run_gantry(dir.path(), &["init"]);
    assert!(init.status.success(), "init failed: {}", stderr(&init));
    assert!(dir.path().join(".gantry/config.toml").is_file());
    assert!(dir.path().join(".gantry/workflows/build.jsonnet").is_file());

    // Swap the remote schema for the local one
    write(dir.path(), "schema.json", SCHEMA);
    let config = fs::read_to_string(dir.path().join(".gantry/config.toml")).unwrap();
    let config = config.replace(
        "https://json.schemastore.org/github-workflow.json",
        "schema.json",
    );
    write(dir.path(), ".gantry/config.toml", &config);

    let check = run_gantry(dir.path(), &["check"]);
    assert!(!check.status.success());
    assert!(stdout(&check).contains("Checking build ... FAILED"));
    assert!(stdout(&check).contains("Workflow missing for \"build\""));

    let update = run_gantry(dir.path(), &["update"]);
    assert!(update.status.success(), "update failed: {}", stderr(&update));
    assert!(stdout(&update).contains("create"));
    assert!(stdout(&update).contains(".github/workflows/build.yml"));

    let generated = fs::read_to_string(dir.path().join(".github/workflows/build.yml")).unwrap();
    assert!(generated.starts_with(
        "# File generated by gantry, do not modify\n# Source: .gantry/workflows/build.jsonnet\n"
    ));

    let check = run_gantry(dir.path(), &["check"]);
    assert!(check.status.success(), "check failed: {}", stdout(&check));
    assert!(stdout(&check).contains("Checking build ... OK"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    assert!(run_gantry(dir.path(), &["init"]).status.success());

    let again = run_gantry(dir.path(), &["init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("refusing to overwrite"));
}

#[test]
fn test_check_reports_drift_and_update_fixes_it() {
    let dir = project_with_template(TEST_TEMPLATE);
    assert!(run_gantry(dir.path(), &["update"]).status.success());

    let destination = dir.path().join(".github/workflows/test.yml");
    fs::write(&destination, "name: edited by hand\n").unwrap();

    let check = run_gantry(dir.path(), &["check"]);
    assert!(!check.status.success());
    assert!(stdout(&check).contains("Checking test ... FAILED"));
    assert!(stdout(&check).contains("Content is out of date for \"test\""));

    let update = run_gantry(dir.path(), &["update"]);
    assert!(update.status.success());
    assert!(stdout(&update).contains("update"));

    let update = run_gantry(dir.path(), &["update"]);
    assert!(stdout(&update).contains("identical"));
    assert!(run_gantry(dir.path(), &["check"]).status.success());
}

#[test]
fn test_check_show_diffs_prints_differing_lines() {
    let dir = project_with_template(TEST_TEMPLATE);
    assert!(run_gantry(dir.path(), &["update"]).status.success());

    let destination = dir.path().join(".github/workflows/test.yml");
    let generated = fs::read_to_string(&destination).unwrap();
    let edited = generated.replacen("# File generated by gantry, do not modify\n", "", 1);
    fs::write(&destination, format!("{edited}# edited by hand\n")).unwrap();

    let plain = run_gantry(dir.path(), &["check"]);
    assert!(!stdout(&plain).contains("- # edited by hand"));

    let check = run_gantry(dir.path(), &["check", "--show-diffs"]);
    assert!(!check.status.success());
    let out = stdout(&check);
    assert!(out.contains("Content is out of date for \"test\""));
    assert!(out.contains("    - # edited by hand"), "{out}");
    assert!(out.contains("    + # File generated by gantry, do not modify"), "{out}");
    assert!(!out.contains("# Source: .gantry/workflows/test.jsonnet"), "{out}");
}

#[test]
fn test_schema_violation_fails_check() {
    let dir = project_with_template("std.manifestYamlDoc({ name: 'test', on: 'push' })");
    assert!(run_gantry(dir.path(), &["update"]).status.success());

    let check = run_gantry(dir.path(), &["check"]);
    assert!(!check.status.success());
    assert!(stdout(&check).contains("Checking test ... FAILED"));
    assert!(stdout(&check).contains("jobs"));
}

#[test]
fn test_schema_checks_can_be_disabled_per_workflow() {
    let dir = project_with_template("std.manifestYamlDoc({ name: 'test', on: 'push' })");
    write(
        dir.path(),
        ".gantry/config.toml",
        &format!("{LOCAL_CONFIG}\n[workflows.overrides.test.checks.schema]\nenabled = false\n"),
    );
    assert!(run_gantry(dir.path(), &["update"]).status.success());

    let check = run_gantry(dir.path(), &["check"]);
    assert!(check.status.success(), "check failed: {}", stdout(&check));
    assert!(stdout(&check).contains("Schema checks disabled for test, skipping"));
}

#[test]
fn test_broken_template_reported_without_stopping_others() {
    let dir = project_with_template(TEST_TEMPLATE);
    write(dir.path(), ".gantry/workflows/broken.jsonnet", "{ name: 'broken' }");

    let update = run_gantry(dir.path(), &["update"]);
    assert!(!update.status.success());
    assert!(stderr(&update).contains("expected string result, got: object"));
    assert!(dir.path().join(".github/workflows/test.yml").is_file());
    assert!(!dir.path().join(".github/workflows/broken.yml").exists());

    let check = run_gantry(dir.path(), &["check"]);
    assert!(!check.status.success());
    assert!(stdout(&check).contains("Checking broken ... FAILED"));
    assert!(stdout(&check).contains("Checking test ... OK"));
}

#[test]
fn test_dependency_templates_listed_first() {
    let dir = project_with_template(TEST_TEMPLATE);
    write(
        dir.path(),
        "shared/gantry-package.toml",
        "files = [\"workflows/lib-workflow.jsonnet\"]\n",
    );
    write(
        dir.path(),
        "shared/workflows/lib-workflow.jsonnet",
        "std.manifestYamlDoc({ name: 'lib', on: 'push', jobs: {} })",
    );
    write(
        dir.path(),
        ".gantry/config.toml",
        &format!("[templates]\ndependencies = [\"shared\"]\n{LOCAL_CONFIG}"),
    );

    let ls = run_gantry(dir.path(), &["ls", "--json"]);
    assert!(ls.status.success(), "ls failed: {}", stderr(&ls));
    let entries: serde_json::Value = serde_json::from_str(&stdout(&ls)).unwrap();
    let entries = entries.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "lib-workflow");
    assert_eq!(entries[0]["source"], "shared/workflows/lib-workflow.jsonnet");
    assert_eq!(entries[0]["destination"], ".github/workflows/lib-workflow.yml");
    assert_eq!(entries[1]["name"], "test");
    assert_eq!(entries[1]["source"], ".gantry/workflows/test.jsonnet");
}

#[test]
fn test_missing_dependency_fails_check() {
    let dir = project_with_template(TEST_TEMPLATE);
    write(
        dir.path(),
        ".gantry/config.toml",
        &format!("[templates]\ndependencies = [\"nowhere\"]\n{LOCAL_CONFIG}"),
    );
    assert!(!run_gantry(dir.path(), &["update"]).status.success());

    let check = run_gantry(dir.path(), &["check"]);
    assert!(!check.status.success());
    assert!(stderr(&check).contains("dependency 'nowhere' not found"));
    assert!(stdout(&check).contains("Checking test ... OK"));
}

#[test]
fn test_sources_lists_observable_files() {
    let dir = project_with_template(TEST_TEMPLATE);
    write(dir.path(), ".gantry/libs/common.libsonnet", "{}");
    write(dir.path(), ".gantry/workflows/README.md", "not a source");

    let sources = run_gantry(dir.path(), &["sources"]);
    assert!(sources.status.success());
    let lines: Vec<String> = stdout(&sources).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            ".gantry/workflows/test.jsonnet",
            ".gantry/libs/common.libsonnet",
        ]
    );
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let output = run_gantry(dir.path(), &["check", "--config", "missing.toml"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.toml does not exist"));
}

#[test]
fn test_config_from_environment() {
    let dir = project_with_template(TEST_TEMPLATE);
    fs::rename(
        dir.path().join(".gantry/config.toml"),
        dir.path().join("ci-config.toml"),
    )
    .unwrap();
    write(
        dir.path(),
        "ci-config.toml",
        &format!("{LOCAL_CONFIG}\n[workflows]\noutput-dir = \"generated\"\n"),
    );

    let update = Command::new(gantry_bin())
        .args(["update", "--no-color"])
        .current_dir(dir.path())
        .env("HOME", dir.path().to_str().unwrap())
        .env("GANTRY_CONFIG", "ci-config.toml")
        .output()
        .expect("Failed to execute gantry");

    assert!(update.status.success(), "update failed: {}", stderr(&update));
    assert!(dir.path().join("generated/test.yml").is_file());
}
