//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Beaker Matrix,
//! including the database schema engine, the typed database model,
//! target matching, patch analysis, and job composition.
//!
//! 此模块包含 Beaker Matrix 的核心功能，
//! 包括数据库模式引擎、类型化数据库模型、目标匹配、补丁分析和作业组合。

pub mod db;
pub mod matrix;
pub mod models;
pub mod patch;
pub mod planner;
pub mod schema;
pub mod target;

// Re-exports
pub use db::Database;
pub use models::CheckResult;
pub use planner::compose_job;
pub use target::Target;
