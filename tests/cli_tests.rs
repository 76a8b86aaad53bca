use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// This test generates a job for the sample database and asserts that the
/// document on stdout carries the Beaker job structure.
///
/// 这个测试为示例数据库生成作业，并断言标准输出上的文档带有 Beaker 作业结构。
#[test]
fn test_generate_writes_job_document() {
    let mut cmd = Command::cargo_bin("beaker-matrix").unwrap();
    cmd.arg("generate")
        .arg("--lang")
        .arg("en")
        .arg("--db")
        .arg("tests/sample_db/database.yml")
        .arg("--tree")
        .arg("mainline")
        .arg("--arch")
        .arg("x86_64");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<job>"))
        .stdout(predicate::str::contains("<recipeSet>"))
        .stdout(predicate::str::contains("<hostRequires>"))
        .stdout(predicate::str::contains("net-mainline.git"));
}

/// This test checks the unknown-tree scenario. It asserts that the command
/// fails and names the tree on stderr.
///
/// 这个测试检查未知树的场景。它断言命令失败并在标准错误中指出树名。
#[test]
fn test_generate_rejects_unknown_tree() {
    let mut cmd = Command::cargo_bin("beaker-matrix").unwrap();
    cmd.arg("generate")
        .arg("--lang")
        .arg("en")
        .arg("--db")
        .arg("tests/sample_db/database.yml")
        .arg("--tree")
        .arg("linux-next")
        .arg("--arch")
        .arg("x86_64");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tree: linux-next"));
}

/// This test lists the matched test cases for the sample database.
/// 这个测试列出示例数据库匹配到的测试用例。
#[test]
fn test_test_cases_lists_selection() {
    let mut cmd = Command::cargo_bin("beaker-matrix").unwrap();
    cmd.arg("test-cases")
        .arg("--lang")
        .arg("en")
        .arg("--db")
        .arg("tests/sample_db/database.yml")
        .arg("--tree")
        .arg("mainline")
        .arg("--arch")
        .arg("x86_64");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("core/boot"))
        .stdout(predicate::str::contains("net/loopback"))
        .stdout(predicate::str::contains("core/panic-check").not());
}

/// This test checks the `list` subcommand against the trees table.
/// 这个测试针对树表检查 `list` 子命令。
#[test]
fn test_list_trees() {
    let mut cmd = Command::cargo_bin("beaker-matrix").unwrap();
    cmd.arg("list")
        .arg("--lang")
        .arg("en")
        .arg("--db")
        .arg("tests/sample_db/database.yml")
        .arg("trees");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mainline"))
        .stdout(predicate::str::contains("stable"));
}

/// This test validates the whole sample matrix and asserts overall success.
/// 这个测试验证整个示例矩阵并断言总体成功。
#[test]
fn test_validate_sample_matrix() {
    let mut cmd = Command::cargo_bin("beaker-matrix").unwrap();
    cmd.arg("validate")
        .arg("--lang")
        .arg("en")
        .arg("--db")
        .arg("tests/sample_db/database.yml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MATRIX VALIDATED SUCCESSFULLY"));
}

/// This test checks the missing-database scenario.
/// 这个测试检查数据库文件缺失的场景。
#[test]
fn test_missing_database_fails() {
    let mut cmd = Command::cargo_bin("beaker-matrix").unwrap();
    cmd.arg("list")
        .arg("--lang")
        .arg("en")
        .arg("--db")
        .arg("tests/sample_db/no_such_database.yml")
        .arg("trees");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to resolve path"));
}
