//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures shared by the matrix validation
//! pipeline and the console reporter: one combination of the database
//! matrix, the result of checking it, and the reasons a check can fail.
//!
//! 此模块定义矩阵验证管线与控制台报告器共享的数据结构：
//! 数据库矩阵中的一种组合、对其检查的结果以及检查失败的原因。

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infra::t;

/// One tree and architecture combination of the database matrix.
/// 数据库矩阵中树与架构的一种组合。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub tree: String,
    pub arch: String,
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tree, self.arch)
    }
}

/// Enumerates the phases a matrix check can fail in.
/// 枚举矩阵检查可能失败的阶段。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureReason {
    /// Case selection or recipe grouping rejected the combination.
    /// 用例选择或配方分组拒绝了该组合。
    Compose,
    /// The composed job failed to render, e.g. an unknown placeholder.
    /// 组合出的作业渲染失败，例如未知占位符。
    Render,
}

/// The result of checking one combination of the matrix.
/// 检查矩阵中一种组合的结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CheckResult {
    /// The combination composed and rendered cleanly.
    /// 该组合顺利完成组合与渲染。
    Passed {
        combo: Combo,
        /// The time taken to compose and render / 组合与渲染所花费的时间
        duration: Duration,
    },
    /// The combination failed in one of the phases.
    /// 该组合在某个阶段失败。
    Failed {
        combo: Combo,
        /// The rendered error chain / 渲染后的错误链
        error: String,
        reason: FailureReason,
        duration: Duration,
    },
    /// The combination was cancelled before it ran.
    /// 该组合在运行前被取消。
    Skipped,
}

impl CheckResult {
    /// Checks if the result is any kind of failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckResult::Failed { .. })
    }

    /// Gets the combination label. Returns "-" for skipped checks.
    /// 获取组合标签。对于被跳过的检查返回 "-"。
    pub fn combo_label(&self) -> String {
        match self {
            CheckResult::Passed { combo, .. } => combo.to_string(),
            CheckResult::Failed { combo, .. } => combo.to_string(),
            CheckResult::Skipped => "-".to_string(),
        }
    }

    /// Gets the duration of the check. Returns None if not applicable.
    /// 获取检查的持续时间。如果不适用，则返回 None。
    pub fn get_duration(&self) -> Option<Duration> {
        match self {
            CheckResult::Passed { duration, .. } => Some(*duration),
            CheckResult::Failed { duration, .. } => Some(*duration),
            CheckResult::Skipped => None,
        }
    }

    /// Gets the status of the check as a string for display.
    /// 以字符串形式获取检查状态以供显示。
    pub fn get_status_str(&self, locale: &str) -> String {
        match self {
            CheckResult::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            CheckResult::Failed { .. } => t!("report.status_failed", locale = locale).to_string(),
            CheckResult::Skipped => t!("report.status_skipped", locale = locale).to_string(),
        }
    }

    /// Gets the error text of a failed check. Returns an empty string for
    /// other states.
    pub fn get_error(&self) -> &str {
        match self {
            CheckResult::Failed { error, .. } => error,
            _ => "",
        }
    }
}
