//! End-to-end tests for the chartbump CLI
//!
//! These tests verify:
//! - Usage errors and exit codes
//! - Runs over trees without resolvable manifests leave files unchanged
//! - CLI produces the expected JSON output schema
//!
//! None of them need network access or a helm/crane installation; the one
//! run that reaches a version source lists tags through a stub script.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn chartbump() -> Command {
    let mut cmd = Command::cargo_bin("chartbump").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// A tree whose YAML files never get past the kind filter or extraction
fn create_inert_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let root = dir.path();

    fs::create_dir_all(root.join("apps")).unwrap();
    fs::create_dir_all(root.join("crossplane/aws")).unwrap();

    fs::write(
        root.join("apps/app.yaml"),
        "apiVersion: argoproj.io/v1alpha1\nkind: Application\nmetadata:\n  name: guestbook\nspec:\n  source:\n    targetRevision: v1.0.0\n",
    )
    .unwrap();
    fs::write(
        root.join("crossplane/aws/values.yaml"),
        "replicas: 2\nimage: crossplane:v1.15.0\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# platform\n").unwrap();

    dir
}

fn snapshot(root: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for rel in ["apps/app.yaml", "crossplane/aws/values.yaml", "README.md"] {
        files.push((
            rel.to_string(),
            fs::read_to_string(root.join(rel)).unwrap(),
        ));
    }
    files
}

mod usage {
    use super::*;

    #[test]
    fn test_missing_path_prints_usage() {
        chartbump()
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_help() {
        chartbump()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--dry-run"))
            .stdout(predicate::str::contains("--profile"));
    }

    #[test]
    fn test_version() {
        chartbump()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_unknown_profile() {
        let dir = create_inert_tree();
        chartbump()
            .arg(dir.path())
            .args(["--profile", "kustomize"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("kustomize"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let dir = create_inert_tree();
        chartbump()
            .arg(dir.path())
            .args(["-q", "-v"])
            .assert()
            .failure()
            .code(2);
    }

    #[test]
    fn test_nonexistent_path() {
        let dir = tempfile::tempdir().unwrap();
        chartbump()
            .arg(dir.path().join("does-not-exist"))
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("not a directory"));
    }

    #[test]
    fn test_broken_config_is_fatal() {
        let dir = create_inert_tree();
        fs::write(dir.path().join(".chartbump.toml"), "[helm\nbinary = 1\n").unwrap();

        chartbump()
            .arg(dir.path())
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("failed to parse config file"));
    }

    #[test]
    fn test_missing_explicit_config_is_fatal() {
        let dir = create_inert_tree();
        chartbump()
            .arg(dir.path())
            .arg("--config")
            .arg(dir.path().join("nope.toml"))
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("failed to read config file"));
    }
}

mod runs {
    use super::*;

    #[test]
    fn test_inert_tree_is_untouched() {
        let dir = create_inert_tree();
        let before = snapshot(dir.path());

        chartbump()
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("No manifests patched"));

        assert_eq!(snapshot(dir.path()), before);
    }

    #[test]
    fn test_quiet_dry_run() {
        let dir = create_inert_tree();
        let before = snapshot(dir.path());

        chartbump()
            .arg(dir.path())
            .args(["-q", "--dry-run"])
            .assert()
            .success()
            .stdout("(dry-run) No updates\n")
            .stderr(predicate::str::is_empty());

        assert_eq!(snapshot(dir.path()), before);
    }

    #[test]
    fn test_verbose_lists_skipped_manifests() {
        let dir = create_inert_tree();

        chartbump()
            .arg(dir.path())
            .args(["-v", "--profile", "applicationset"])
            .assert()
            .success()
            .stdout(predicate::str::contains("kind is Application"))
            .stdout(predicate::str::contains("no kind declared"));
    }

    #[test]
    fn test_json_output_schema() {
        let dir = create_inert_tree();

        let output = chartbump()
            .arg(dir.path())
            .args(["--json", "-n"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["dry_run"], true);
        // the crossplane values file is matched by both profiles but counted once
        assert_eq!(json["summary"]["files_processed"], 2);
        assert_eq!(json["summary"]["skipped"], 2);
        assert_eq!(json["summary"]["patched"], 0);
        assert_eq!(json["summary"]["failed"], 0);
        assert_eq!(json["manifests"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_json_verbose_includes_skips() {
        let dir = create_inert_tree();

        let output = chartbump()
            .arg(dir.path())
            .args(["--json", "-v", "--profile", "crossplane"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let manifests = json["manifests"].as_array().unwrap();
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0]["profile"], "Crossplane");
        assert_eq!(manifests[0]["status"], "skipped");
        assert_eq!(manifests[0]["reason"], "no recognised dependency fields");
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();

        let output = chartbump()
            .arg(dir.path())
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["summary"]["files_processed"], 0);
    }
}

#[cfg(unix)]
mod failures {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Tag lister that always reports `tag`
    fn stub_lister(dir: &TempDir, tag: &str) -> std::path::PathBuf {
        let script = dir.path().join("list-tags");
        fs::write(&script, format!("#!/bin/sh\necho {}\n", tag)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[test]
    fn test_unpatchable_manifest_exits_2() {
        let tools = tempfile::tempdir().unwrap();
        let lister = stub_lister(&tools, "v0.48.0");

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("crossplane/aws")).unwrap();
        let values = "provider:\n  metadata:\n    name: provider-aws\n  package:\n    registry: xpkg.upbound.io/upbound\n    version: \"v0.47\\x2e0\"\n";
        fs::write(root.join("crossplane/aws/values.yaml"), values).unwrap();
        fs::write(
            root.join(".chartbump.toml"),
            format!("[oci]\nbinary = {:?}\n", lister.display().to_string()),
        )
        .unwrap();

        chartbump()
            .arg(root)
            .assert()
            .failure()
            .code(2)
            .stdout(predicate::str::contains(
                "provider-aws failed: 'v0.47.0' does not occur in the file",
            ))
            .stdout(predicate::str::contains("1 failed"));

        assert_eq!(
            fs::read_to_string(root.join("crossplane/aws/values.yaml")).unwrap(),
            values
        );
    }
}
