//! End-to-end tests for the skilldep CLI
//!
//! These tests verify:
//! - Exit codes for successful, conflicting, and cyclic catalogs
//! - JSON output schema stability
//! - Deterministic output across repeated runs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn skilldep() -> Command {
    Command::cargo_bin("skilldep").expect("binary builds")
}

fn write_skill(dir: &Path, subdir: &str, content: &str) {
    let skill_dir = dir.join(subdir);
    fs::create_dir_all(&skill_dir).unwrap();
    fs::write(skill_dir.join("skill.yaml"), content).unwrap();
}

/// A small healthy catalog: web -> http -> util
fn create_healthy_catalog() -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    write_skill(temp_dir.path(), "util", "name: util\nversion: 1.0.0\n");
    write_skill(
        temp_dir.path(),
        "http",
        "name: http\nversion: 1.2.0\ndependencies:\n  - name: util\n    version: '^1.0.0'\n",
    );
    write_skill(
        temp_dir.path(),
        "web",
        "name: web\nversion: 0.1.0\ndependencies:\n  - name: http\n    version: '>=1.0.0,<2.0.0'\n",
    );
    temp_dir
}

mod validate_tests {
    use super::*;

    #[test]
    fn test_validate_healthy_catalog_exits_zero() {
        let temp_dir = create_healthy_catalog();
        skilldep()
            .args(["validate", temp_dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("resolved 3 of 3 skills"));
    }

    #[test]
    fn test_validate_conflict_exits_one() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_skill(temp_dir.path(), "x", "name: x\nversion: 1.0.0\n");
        write_skill(
            temp_dir.path(),
            "p",
            "name: p\nversion: 1.0.0\ndependencies:\n  - name: x\n    version: '>=2.0.0'\n",
        );

        skilldep()
            .args(["validate", temp_dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("no version of 'x'"));
    }

    #[test]
    fn test_validate_cycle_exits_one() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_skill(
            temp_dir.path(),
            "a",
            "name: a\nversion: 1.0.0\ndependencies:\n  - name: b\n    version: '*'\n",
        );
        write_skill(
            temp_dir.path(),
            "b",
            "name: b\nversion: 1.0.0\ndependencies:\n  - name: a\n    version: '*'\n",
        );

        skilldep()
            .args(["validate", temp_dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("circular dependency detected"));
    }

    #[test]
    fn test_validate_bad_manifest_exits_two() {
        let temp_dir = create_healthy_catalog();
        write_skill(temp_dir.path(), "broken", "name: broken\nversion: nope\n");

        skilldep()
            .args(["validate", temp_dir.path().to_str().unwrap()])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("invalid version 'nope'"));
    }

    #[test]
    fn test_validate_json_output() {
        let temp_dir = create_healthy_catalog();
        let output = skilldep()
            .args(["validate", "--json", temp_dir.path().to_str().unwrap()])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["skills"], 3);
        assert_eq!(parsed["plan"]["entries"][0]["name"], "util");
        assert!(parsed["error"].is_null());
    }

    #[test]
    fn test_validate_reports_dropped_optional() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_skill(
            temp_dir.path(),
            "web",
            "name: web\nversion: 1.0.0\ndependencies:\n  - name: cache\n    version: '*'\n    optional: true\n",
        );

        skilldep()
            .args(["validate", temp_dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("optional dependency web -> cache dropped"));
    }
}

mod order_tests {
    use super::*;

    #[test]
    fn test_order_prints_dependencies_first() {
        let temp_dir = create_healthy_catalog();
        skilldep()
            .args(["order", temp_dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout("util 1.0.0\nhttp 1.2.0\nweb 0.1.0\n");
    }

    #[test]
    fn test_order_is_deterministic_across_runs() {
        let temp_dir = create_healthy_catalog();
        let run = || {
            skilldep()
                .args(["order", temp_dir.path().to_str().unwrap()])
                .assert()
                .success()
                .get_output()
                .stdout
                .clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_order_with_root_filter() {
        let temp_dir = create_healthy_catalog();
        skilldep()
            .args([
                "order",
                "--root",
                "http",
                temp_dir.path().to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout("util 1.0.0\nhttp 1.2.0\n");
    }

    #[test]
    fn test_order_json_output() {
        let temp_dir = create_healthy_catalog();
        let output = skilldep()
            .args(["order", "--json", temp_dir.path().to_str().unwrap()])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed[0]["name"], "util");
        assert_eq!(parsed[2]["name"], "web");
    }
}

mod tree_tests {
    use super::*;

    #[test]
    fn test_tree_renders_nested_structure() {
        let temp_dir = create_healthy_catalog();
        skilldep()
            .args(["tree", "--no-color", temp_dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout("web 0.1.0\n└── http 1.2.0\n    └── util 1.0.0\n");
    }

    #[test]
    fn test_tree_marks_optional_dependencies() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_skill(temp_dir.path(), "cache", "name: cache\nversion: 0.4.0\n");
        write_skill(
            temp_dir.path(),
            "web",
            "name: web\nversion: 1.0.0\ndependencies:\n  - name: cache\n    version: '^0.4.0'\n    optional: true\n",
        );

        skilldep()
            .args([
                "tree",
                "--no-color",
                "--root",
                "web",
                temp_dir.path().to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache 0.4.0 (optional)"));
    }
}

mod migrate_tests {
    use super::*;

    fn create_migration_catalog() -> TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        let skill_dir = temp_dir.path().join("parser");
        fs::create_dir_all(&skill_dir).unwrap();
        fs::write(
            skill_dir.join("migrations.yaml"),
            "skill: parser\nsteps:\n  - from: 1.0.0\n    to: 1.1.0\n    description: rename config key\n  - from: 1.1.0\n    to: 2.0.0\n",
        )
        .unwrap();
        temp_dir
    }

    #[test]
    fn test_migrate_two_step_path() {
        let temp_dir = create_migration_catalog();
        skilldep()
            .args([
                "migrate",
                "parser",
                "--from",
                "1.0.0",
                "--to",
                "2.0.0",
                temp_dir.path().to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("parser: 2 step(s)"))
            .stdout(predicate::str::contains("1.0.0 -> 1.1.0: rename config key"));
    }

    #[test]
    fn test_migrate_same_version_is_noop() {
        let temp_dir = create_migration_catalog();
        skilldep()
            .args([
                "migrate",
                "parser",
                "--from",
                "1.0.0",
                "--to",
                "1.0.0",
                temp_dir.path().to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("already at the target version"));
    }

    #[test]
    fn test_migrate_unreachable_target_fails() {
        let temp_dir = create_migration_catalog();
        skilldep()
            .args([
                "migrate",
                "parser",
                "--from",
                "1.0.0",
                "--to",
                "9.9.9",
                temp_dir.path().to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no migration path"));
    }

    #[test]
    fn test_migrate_rejects_malformed_version() {
        let temp_dir = create_migration_catalog();
        skilldep()
            .args([
                "migrate",
                "parser",
                "--from",
                "abc",
                "--to",
                "2.0.0",
                temp_dir.path().to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid version 'abc'"));
    }

    #[test]
    fn test_migrate_json_output() {
        let temp_dir = create_migration_catalog();
        let output = skilldep()
            .args([
                "migrate",
                "parser",
                "--from",
                "1.0.0",
                "--to",
                "2.0.0",
                "--json",
                temp_dir.path().to_str().unwrap(),
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["skill"], "parser");
        assert_eq!(parsed["steps"].as_array().unwrap().len(), 2);
    }
}
