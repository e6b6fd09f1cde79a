//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    fixtures_path().join(name).to_string_lossy().to_string()
}

fn depadvice() -> Command {
    Command::cargo_bin("depadvice").expect("binary should be built")
}

/// Copy the fixture module into a fresh directory so a config file can sit
/// next to it
fn fixture_dir_with_config(config: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("app.yml");
    std::fs::copy(fixtures_path().join("app.yml"), &input).expect("Failed to copy fixture");
    std::fs::write(dir.path().join(".depadvice.yml"), config).expect("Failed to write config");
    (dir, input)
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    depadvice()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("depadvice"))
        .stdout(predicate::str::contains("size-tree"))
        .stdout(predicate::str::contains("--parallel"));
}

#[test]
fn test_cli_version() {
    depadvice()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("depadvice"));
}

#[test]
fn test_missing_input_fails() {
    depadvice()
        .args(["advice", "does-not-exist.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

// ============================================================================
// advice
// ============================================================================

#[test]
fn test_advice() {
    depadvice()
        .args(["advice", &fixture("app.yml"), "--no-color", "--quiet"])
        .assert()
        .success()
        .stdout(
            "Unused dependencies which should be removed:\n  \
             implementation(\"com.google.dagger:dagger\")\n\
             \n\
             Transitively used dependencies that should be declared directly as indicated:\n  \
             api(\"com.squareup.okio:okio:3.6.0\")\n\
             \n\
             Existing dependencies which should be modified to be as indicated:\n  \
             implementation(\"com.squareup.okhttp3:okhttp:4.12.0\") (was api)\n",
        );
}

#[test]
fn test_advice_parallel() {
    depadvice()
        .args(["advice", &fixture("app.yml"), "--no-color", "--quiet", "--parallel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api(\"com.squareup.okio:okio:3.6.0\")"));
}

#[test]
fn test_advice_with_exclude_config() {
    let (_dir, input) = fixture_dir_with_config(
        "issues:\n  on_unused_dependencies:\n    exclude:\n      - \"com.google.dagger:*\"\n",
    );

    depadvice()
        .args(["advice", input.to_str().unwrap(), "--no-color", "--quiet", "--show-filtered"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused dependencies which should be removed:").not())
        .stdout(predicate::str::contains(
            "Advice excluded by configuration:\n  remove com.google.dagger:dagger from 'implementation'\n",
        ));
}

#[test]
fn test_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rules.toml");
    std::fs::write(
        &config,
        "[issues.on_any]\nexclude = [\"com.squareup.*\"]\n",
    )
    .unwrap();

    depadvice()
        .args(["advice", &fixture("app.yml"), "--no-color", "--quiet"])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("okio").not())
        .stdout(predicate::str::contains("okhttp").not())
        .stdout(predicate::str::contains("com.google.dagger:dagger"));
}

// ============================================================================
// reason
// ============================================================================

#[test]
fn test_reason() {
    depadvice()
        .args(["reason", &fixture("app.yml"), "--id", "com.squareup.okio:okio", "--no-color", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You asked about the dependency 'com.squareup.okio:okio:3.6.0'.",
        ))
        .stdout(predicate::str::contains(
            "You have been advised to add this dependency to 'api'.",
        ))
        .stdout(predicate::str::contains(
            "Shortest path from :app to com.squareup.okio:okio:3.6.0 for debugCompileClasspath:",
        ));
}

#[test]
fn test_reason_with_alias() {
    let (_dir, input) = fixture_dir_with_config(
        "dependency_map:\n  \"com.squareup.okio:okio\": \"libs.okio\"\n",
    );

    depadvice()
        .args(["reason", input.to_str().unwrap(), "--id", "com.squareup.okio:okio", "--no-color", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You asked about the dependency 'com.squareup.okio:okio:3.6.0 (libs.okio)'.",
        ));
}

#[test]
fn test_reason_with_capability_has_no_path() {
    depadvice()
        .args(["reason", &fixture("app.yml"), "--id", "com.squareup.okio:okio"])
        .args(["--capability", "com.squareup.okio:okio-test-fixtures", "--no-color", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ", with the capability 'com.squareup.okio:okio-test-fixtures'.",
        ))
        .stdout(predicate::str::contains(
            "There is no path from :app to com.squareup.okio:okio:3.6.0 for debugCompileClasspath",
        ));
}

// ============================================================================
// size-tree
// ============================================================================

#[test]
fn test_size_tree() {
    depadvice()
        .args(["size-tree", &fixture("app.yml"), "--view", "debugCompileClasspath", "--no-color", "--quiet"])
        .assert()
        .success()
        .stdout(
            "1201.17 KiB :app\n\
             +--- 1123.05 KiB (781.25 KiB) com.squareup.okhttp3:okhttp:4.12.0\n\
             |    \\--- 341.80 KiB com.squareup.okio:okio:3.6.0\n\
             +--- 48.83 KiB com.google.dagger:dagger:2.50\n\
             \\--- 29.30 KiB (9.77 KiB) :lib\n\
             \x20    \\--- 19.53 KiB org.jetbrains:annotations:24.1.0\n",
        );
}

#[test]
fn test_size_tree_all_views() {
    depadvice()
        .args(["size-tree", &fixture("app.yml"), "--no-color", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debugCompileClasspath:\n1201.17 KiB :app\n"))
        .stdout(predicate::str::contains("\nreleaseCompileClasspath:\n1201.17 KiB :app\n"));
}

#[test]
fn test_size_tree_unknown_view() {
    depadvice()
        .args(["size-tree", &fixture("app.yml"), "--view", "nope", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No classpath view named 'nope'"));
}
