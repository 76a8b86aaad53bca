//! # Beaker Matrix Library / Beaker Matrix 库
//!
//! This library provides the core functionality for the Beaker Matrix tool,
//! a configuration-driven generator of Beaker test-job XML across a matrix
//! of kernel trees, architectures and host types.
//!
//! 此库为 Beaker Matrix 工具提供核心功能，
//! 这是一个配置驱动的 Beaker 测试作业 XML 生成器，
//! 覆盖内核树、架构与主机类型的矩阵。
//!
//! ## Modules / 模块
//!
//! - `core` - Database schema engine, typed model, and job composition
//! - `infra` - Infrastructure services like file system operations
//! - `reporting` - Job document rendering and console reporting
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据库模式引擎、类型化模型和作业组合
//! - `infra` - 基础设施服务，如文件系统操作
//! - `reporting` - 作业文档渲染和控制台报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::db;
pub use crate::core::planner;
pub use crate::core::schema;
pub use crate::infra::t;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    // Detect system locale and set it for i18n.
    // Fallback to "en" if detection fails.
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    // Try to match the full locale first (e.g., "zh-CN")
    // Then try to match the language part only (e.g., "en" from "en-US")
    // Finally, fall back to "en"
    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
