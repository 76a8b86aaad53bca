//! # Patch Analysis Module / 补丁分析模块
//!
//! Extracts the set of source paths touched by unified-diff patch files.
//! The touched set narrows case selection: a source-restricted case only
//! applies when one of its source patterns matches a touched path.
//!
//! 从统一 diff 补丁文件中提取被改动的源码路径集合。
//! 改动集合会收窄用例选择：受源码限定的用例仅在其某个源码模式匹配到被改动路径时适用。

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;

/// Destination header of a hunk, e.g. `+++ b/drivers/net/foo.c`.
/// A trailing timestamp after whitespace is left behind by `\S+`.
static DIFF_DEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+\+\+ (\S+)").expect("diff header pattern is valid")
});

/// Collects the touched source paths from one patch text.
/// Returns an empty set when the text contains no diff headers at all.
fn touched_paths(text: &str) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for line in text.lines() {
        if let Some(captures) = DIFF_DEST_RE.captures(line) {
            let raw = &captures[1];
            // Deleted files diff against /dev/null on the destination side.
            if raw == "/dev/null" {
                continue;
            }
            let path = raw
                .strip_prefix("b/")
                .or_else(|| raw.strip_prefix("a/"))
                .unwrap_or(raw);
            paths.insert(path.to_string());
        }
    }
    paths
}

/// Reads the given patch files and accumulates every touched source path.
/// A file without a single diff header is rejected rather than silently
/// matching nothing.
///
/// 读取给定补丁文件并累积所有被改动的源码路径。
/// 不含任何 diff 头的文件会被拒绝，而不是静默地什么都不匹配。
pub fn path_set(patches: &[PathBuf]) -> Result<BTreeSet<String>> {
    let mut all = BTreeSet::new();
    for patch in patches {
        let text = std::fs::read_to_string(patch)
            .with_context(|| format!("Failed to read patch {}", patch.display()))?;
        let paths = touched_paths(&text);
        if paths.is_empty() {
            bail!("No diff headers found in {}", patch.display());
        }
        all.extend(paths);
    }
    Ok(all)
}
