//! # Matrix Check Module / 矩阵检查模块
//!
//! Proves a database generates cleanly by composing and rendering a job for
//! every tree and architecture combination it declares. Combinations are
//! checked concurrently with a bounded number of jobs; cancellation skips
//! whatever has not started yet.
//!
//! 通过为数据库声明的每个树与架构组合进行组合和渲染来证明其能正常生成。
//! 各组合以有限的并发数同时检查；取消会跳过尚未开始的部分。

use std::sync::Arc;
use std::time::Instant;

use futures::{StreamExt, stream};
use tokio_util::sync::CancellationToken;

use crate::core::db::Database;
use crate::core::models::{CheckResult, Combo, FailureReason};
use crate::core::planner::{JobOptions, compose_job};
use crate::core::target::Target;
use crate::reporting::beaker::render_job;

/// Checks one combination: compose a job for it and render the document.
/// 检查一种组合：为其组合作业并渲染文档。
pub fn check_combo(database: &Database, combo: Combo) -> CheckResult {
    let started = Instant::now();
    let target = Target::new(combo.tree.clone(), combo.arch.clone(), None, None);
    let options = JobOptions::default();
    match compose_job(database, &target, &options) {
        Err(error) => CheckResult::Failed {
            combo,
            error: format!("{error:#}"),
            reason: FailureReason::Compose,
            duration: started.elapsed(),
        },
        Ok((job, _summary)) => match render_job(&job) {
            Err(error) => CheckResult::Failed {
                combo,
                error: format!("{error:#}"),
                reason: FailureReason::Render,
                duration: started.elapsed(),
            },
            Ok(_document) => CheckResult::Passed {
                combo,
                duration: started.elapsed(),
            },
        },
    }
}

/// Enumerates every tree and architecture combination of the database.
pub fn combos(database: &Database) -> Vec<Combo> {
    database
        .trees
        .keys()
        .flat_map(|tree| {
            database.arches.iter().map(move |arch| Combo {
                tree: tree.clone(),
                arch: arch.clone(),
            })
        })
        .collect()
}

/// Checks the whole matrix with up to `jobs` combinations in flight.
/// Results come back sorted by combination label.
///
/// 以最多 `jobs` 个并发组合检查整个矩阵。结果按组合标签排序返回。
pub async fn check_matrix(
    database: Arc<Database>,
    jobs: usize,
    stop_token: CancellationToken,
) -> Vec<CheckResult> {
    let stream = stream::iter(combos(&database).into_iter().map(|combo| {
        let database = Arc::clone(&database);
        let stop_token = stop_token.clone();
        tokio::spawn(async move {
            if stop_token.is_cancelled() {
                return CheckResult::Skipped;
            }
            check_combo(&database, combo)
        })
    }));

    let mut results: Vec<CheckResult> = stream
        .buffer_unordered(jobs.max(1))
        .map(|joined| joined.unwrap_or(CheckResult::Skipped))
        .collect()
        .await;

    results.sort_by_key(|result| result.combo_label());
    results
}
