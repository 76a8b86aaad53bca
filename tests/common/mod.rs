// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Writes a small but complete database into a fresh temporary directory:
/// two trees, two arches, two host types, and one suite file with a mix of
/// unconditional, pattern-restricted, and waived cases.
pub fn setup_test_database() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let root = temp_dir.path();
    let suites_path = root.join("suites");
    fs::create_dir_all(&suites_path).expect("Failed to create suites directory");

    let database_content = r#"description: Temporary database
trees:
  mainline:
    description: Upstream development tree
  stable:
    description: Stable maintenance tree
arches: [x86_64, aarch64]
sets:
  general: General purpose coverage
host_types:
  normal:
    description: Default lab machine
    host_requires: |
      <and>
        <system_type op="=" value="Machine"/>
      </and>
host_type_regex: normal
suites:
  - suites/main.yml
"#;
    fs::write(root.join("database.yml"), database_content).expect("Failed to write database.yml");

    let suite_content = r#"name: main
description: Main suite
location: https://tests.example.com/main-${tree}.git
cases:
  - name: always
    tasks: tests/always
  - name: mainline-only
    tasks: tests/mainline
    patterns:
      - trees: [mainline]
  - name: source-bound
    tasks: tests/source
    patterns:
      - sources: [drivers/net/.*]
  - name: waived-case
    tasks: tests/waived
    waived: true
"#;
    fs::write(suites_path.join("main.yml"), suite_content).expect("Failed to write main.yml");

    temp_dir
}

/// Writes a database using the legacy trees layout, where every tree maps
/// to a plain description string.
pub fn create_legacy_database(temp_dir: &TempDir) -> PathBuf {
    let database_path = temp_dir.path().join("legacy.yml");
    let content = r#"trees:
  mainline: Upstream development tree
  stable: Stable maintenance tree
arches: [x86_64]
"#;
    fs::write(&database_path, content).unwrap();
    database_path
}

/// Writes a database with a member the schema does not know about.
pub fn create_invalid_member_database(temp_dir: &TempDir) -> PathBuf {
    let database_path = temp_dir.path().join("invalid.yml");
    let content = r#"trees:
  mainline:
    description: Upstream development tree
arches: [x86_64]
schedulers: [round-robin]
"#;
    fs::write(&database_path, content).unwrap();
    database_path
}

/// Writes a database whose suite list points at a missing file.
pub fn create_missing_suite_database(temp_dir: &TempDir) -> PathBuf {
    let database_path = temp_dir.path().join("missing_suite.yml");
    let content = r#"trees:
  mainline:
    description: Upstream development tree
arches: [x86_64]
suites:
  - suites/not_there.yml
"#;
    fs::write(&database_path, content).unwrap();
    database_path
}

/// Writes a unified diff touching the given destination paths.
pub fn write_patch(dir: &Path, name: &str, touched: &[&str]) -> PathBuf {
    let mut content = String::from("Subject: [PATCH] test patch\n---\n");
    for path in touched {
        content.push_str(&format!(
            "diff --git a/{path} b/{path}\n--- a/{path}\n+++ b/{path}\n@@ -1,1 +1,1 @@\n-old\n+new\n"
        ));
    }
    let patch_path = dir.join(name);
    fs::write(&patch_path, content).unwrap();
    patch_path
}
