//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the colorful console output: matched-case listings
//! for the target and the summary table of a matrix validation run, with
//! internationalization support.
//!
//! 此模块打印彩色控制台输出：目标的匹配用例列表以及矩阵验证运行的摘要表格，
//! 并支持国际化。

use colored::*;

use crate::core::models::CheckResult;
use crate::core::planner::SelectedCase;
use crate::infra::t;

/// Prints the cases selected for a target, one per line, with the waived
/// ones marked.
///
/// 打印为目标选中的用例，每行一个，并标记豁免用例。
///
/// # Output Format / 输出格式
/// ```text
/// core-suite/default
/// core-suite/panic-check  (waived)
/// net-suite/loopback
/// ```
pub fn print_case_list(cases: &[SelectedCase], locale: &str) {
    for case in cases {
        let label = format!("{}/{}", case.suite, case.name);
        if case.waived {
            println!(
                "{}  {}",
                label,
                t!("report.waived_marker", locale = locale).yellow()
            );
        } else {
            println!("{label}");
        }
    }
}

/// Prints a formatted summary of matrix check results.
/// Displays a table with check status, combination, and duration,
/// using color coding to highlight different statuses.
///
/// 打印矩阵检查结果的格式化摘要。
/// 显示一个包含检查状态、组合和持续时间的表格，使用颜色编码突出显示不同的状态。
pub fn print_summary(results: &[CheckResult], locale: &str) {
    println!("\n{}", t!("check_summary_banner", locale = locale).bold());

    for result in results {
        let status_str = result.get_status_str(locale);
        let duration_str = result
            .get_duration()
            .map(|duration| format!("{:.2?}", duration))
            .unwrap_or_else(|| "N/A".to_string());

        let status_colored = match result {
            CheckResult::Passed { .. } => status_str.green(),
            CheckResult::Failed { .. } => status_str.red(),
            CheckResult::Skipped => status_str.dimmed(),
        };

        println!(
            "  - {:<18} | {:<40} | {:>10}",
            status_colored,
            result.combo_label(),
            duration_str
        );
    }
}

/// Prints detailed information about failed combinations: the full error
/// chain for each, separated for readability.
///
/// 打印失败组合的详细信息：每个组合的完整错误链，并用分隔线提高可读性。
pub fn print_failure_details(failures: &[&CheckResult], locale: &str) {
    if failures.is_empty() {
        return;
    }

    println!(
        "\n{}",
        t!("check_failure_banner", locale = locale).red().bold()
    );
    println!("{}", "-".repeat(80));

    for (index, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            index + 1,
            failures.len(),
            t!("report_header_failure", locale = locale).red(),
            result.combo_label().cyan()
        );
        println!("\n{}", result.get_error());
        println!("\n{}", "-".repeat(80));
    }
}
