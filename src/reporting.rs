//! # Reporting Module / 报告模块
//!
//! This module handles the two outputs of the tool: the Beaker job XML
//! document itself, and the colorful console listings and summaries
//! printed around it, with internationalization support.
//!
//! 此模块处理工具的两种输出：Beaker 作业 XML 文档本身，
//! 以及围绕它打印的彩色控制台列表和摘要，并支持国际化。

pub mod beaker;
pub mod console;

// Re-export common reporting functions
pub use beaker::render_job;
pub use console::{print_failure_details, print_summary};
