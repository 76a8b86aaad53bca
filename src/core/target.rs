//! # Generation Target Module / 生成目标模块
//!
//! A target describes what a job is being generated for: one kernel tree,
//! one architecture, optionally a named test set, and optionally the set of
//! source paths touched by the supplied patches. Case patterns from the
//! database are matched against it here.
//!
//! 目标描述作业的生成对象：一棵内核树、一个架构、可选的命名测试集，
//! 以及可选的由所提供补丁改动的源码路径集合。数据库中的用例模式在此与其匹配。

use std::collections::BTreeSet;

use anyhow::{Context as _, Result};
use regex::Regex;

use crate::core::db::{Case, Pattern};

/// The target a job is generated for.
/// 作业生成的目标。
#[derive(Debug, Clone)]
pub struct Target {
    pub tree: String,
    pub arch: String,
    /// Selected test set, if any. Without one, set-restricted patterns are
    /// unconstrained.
    /// 选定的测试集（如有）。未选定时，集合限定的模式不作约束。
    pub set: Option<String>,
    /// Source paths touched by the supplied patches. `None` means no
    /// patches were given and source patterns are unconstrained.
    /// 补丁改动的源码路径。`None` 表示未提供补丁，源码模式不作约束。
    pub sources: Option<BTreeSet<String>>,
}

impl Target {
    pub fn new(
        tree: impl Into<String>,
        arch: impl Into<String>,
        set: Option<String>,
        sources: Option<BTreeSet<String>>,
    ) -> Self {
        Self {
            tree: tree.into(),
            arch: arch.into(),
            set,
            sources,
        }
    }
}

/// Matches a value against a database regex, fully anchored. A partial hit
/// must not select extra cases, so the pattern is wrapped in `^(?:...)$`.
///
/// 以完全锚定的方式将值与数据库正则匹配。部分命中不得选中多余用例，
/// 因此模式被包装为 `^(?:...)$`。
pub fn anchored_match(pattern: &str, value: &str) -> Result<bool> {
    let regex = Regex::new(&format!("^(?:{pattern})$"))
        .with_context(|| format!("Failed to compile pattern \"{pattern}\""))?;
    Ok(regex.is_match(value))
}

fn any_match(patterns: &[String], value: &str) -> Result<bool> {
    for pattern in patterns {
        if anchored_match(pattern, value)? {
            return Ok(true);
        }
    }
    Ok(false)
}

impl Pattern {
    /// Checks whether this pattern accepts the target. Every present field
    /// must be satisfied; absent fields are unconstrained.
    pub fn matches(&self, target: &Target) -> Result<bool> {
        if !self.trees.is_empty() && !any_match(&self.trees, &target.tree)? {
            return Ok(false);
        }
        if !self.arches.is_empty() && !any_match(&self.arches, &target.arch)? {
            return Ok(false);
        }
        if !self.sets.is_empty() {
            if let Some(set) = &target.set {
                if !any_match(&self.sets, set)? {
                    return Ok(false);
                }
            }
        }
        if !self.sources.is_empty() {
            if let Some(sources) = &target.sources {
                let mut touched = false;
                for source in sources {
                    if any_match(&self.sources, source)? {
                        touched = true;
                        break;
                    }
                }
                if !touched {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

impl Case {
    /// A case matches when any of its patterns does. A case with no
    /// patterns matches every target.
    pub fn matches(&self, target: &Target) -> Result<bool> {
        if self.patterns.is_empty() {
            return Ok(true);
        }
        for pattern in &self.patterns {
            if pattern.matches(target)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
