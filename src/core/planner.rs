//! # Job Planner Module / 作业计划模块
//!
//! This module turns a database plus a target into a renderable job model:
//! it selects the applicable test cases, assigns them to host types, and
//! groups them into recipes. The multi-host form produces one recipe per
//! host type; the single-host form collapses everything onto one recipe,
//! optionally pinned to a hostname.
//!
//! 此模块将数据库与目标转化为可渲染的作业模型：
//! 选择适用的测试用例、将其分配到主机类型并分组为配方。
//! 多主机形式为每个主机类型生成一个配方；单主机形式将所有内容收拢到一个配方上，
//! 可选择固定到某个主机名。

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::core::db::Database;
use crate::core::target::{Target, anchored_match};

/// Composition failures a caller can act on.
/// 调用方可据以处理的组合失败。
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Unknown tree: {0}")]
    UnknownTree(String),
    #[error("Unknown architecture: {0}")]
    UnknownArch(String),
    #[error("Unknown test set: {0}")]
    UnknownSet(String),
    #[error("Case \"{case}\" matches no host type with regex \"{regex}\"")]
    NoHostType { case: String, regex: String },
}

/// Options modifying how a job is composed.
/// 影响作业组合方式的选项。
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    /// Kernel package URL. When set, every recipe starts with a
    /// kernel-install task carrying it.
    /// 内核包 URL。设置后，每个配方都会以携带它的内核安装任务开头。
    pub kernel: Option<String>,
    /// Job whiteboard text. A default is derived from the target when
    /// absent.
    pub description: Option<String>,
    /// Forces the single-host form even when the database declares host
    /// types.
    pub single_host: bool,
    /// Pins the single-host recipe to one machine.
    pub hostname: Option<String>,
    /// Includes cases marked as waived.
    pub include_waived: bool,
}

/// One case picked for the target, flattened out of its suite with the
/// host type regex already in effect.
///
/// 为目标选中的一个用例，已从其套件中展平，并带上生效的主机类型正则。
#[derive(Debug, Clone, Serialize)]
pub struct SelectedCase {
    pub suite: String,
    pub name: String,
    pub waived: bool,
    pub location: String,
    pub tasks: Option<String>,
    pub max_duration_seconds: Option<u64>,
    pub environment: BTreeMap<String, String>,
    pub host_type_regex: Option<String>,
}

/// The outcome of case selection, with the counts reported to the user.
/// 用例选择的结果，带有报告给用户的统计数。
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub cases: Vec<SelectedCase>,
    /// Cases inspected across all suites.
    pub total: usize,
    /// Cases whose patterns rejected the target.
    pub filtered: usize,
    /// Waived cases left out of the selection.
    pub waived_excluded: usize,
}

/// Selects the cases applicable to a target.
/// 选择适用于目标的用例。
pub fn select_cases(
    database: &Database,
    target: &Target,
    include_waived: bool,
) -> Result<Selection> {
    if !database.trees.contains_key(&target.tree) {
        return Err(ComposeError::UnknownTree(target.tree.clone()).into());
    }
    if !database.arches.iter().any(|arch| arch == &target.arch) {
        return Err(ComposeError::UnknownArch(target.arch.clone()).into());
    }
    if let Some(set) = &target.set {
        if !database.sets.contains_key(set) {
            return Err(ComposeError::UnknownSet(set.clone()).into());
        }
    }

    let mut cases = Vec::new();
    let mut total = 0;
    let mut filtered = 0;
    let mut waived_excluded = 0;
    for suite in &database.suites {
        for case in &suite.cases {
            total += 1;
            if !case.matches(target)? {
                filtered += 1;
                continue;
            }
            if case.waived && !include_waived {
                waived_excluded += 1;
                continue;
            }
            cases.push(SelectedCase {
                suite: suite.name.clone(),
                name: case.name.clone(),
                waived: case.waived,
                location: suite.location.clone(),
                tasks: case.tasks.clone(),
                max_duration_seconds: case.max_duration_seconds,
                environment: case.environment.clone(),
                host_type_regex: database
                    .effective_host_type_regex(suite, case)
                    .map(str::to_string),
            });
        }
    }

    Ok(Selection {
        cases,
        total,
        filtered,
        waived_excluded,
    })
}

/// A renderable job document model. The `vars` table carries the values
/// substituted for `${...}` placeholders at render time.
///
/// 可渲染的作业文档模型。`vars` 表携带渲染时替换 `${...}` 占位符的值。
#[derive(Debug, Clone)]
pub struct Job {
    pub description: String,
    pub vars: BTreeMap<String, String>,
    pub recipe_sets: Vec<RecipeSet>,
}

#[derive(Debug, Clone)]
pub struct RecipeSet {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    /// Host type this recipe was grouped for, absent in single-host form.
    pub host_type: Option<String>,
    pub hostname: Option<String>,
    pub ignore_panic: bool,
    pub host_requires: Option<String>,
    pub partitions: Option<String>,
    pub distro_requires: Option<String>,
    pub tasks: Vec<TaskSpec>,
}

#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    /// Absent for library tasks the lab already carries.
    pub fetch: Option<Fetch>,
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct Fetch {
    pub url: String,
    pub subdir: Option<String>,
}

/// Counts describing what the planner did, printed after generation.
/// 描述计划器工作的统计数，在生成后打印。
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub total_cases: usize,
    pub matched_cases: usize,
    pub filtered_cases: usize,
    pub waived_excluded: usize,
    pub host_types: Vec<String>,
    pub single_host: bool,
}

/// Composes a job for the target: select, assign to host types, group into
/// recipes.
///
/// 为目标组合作业：选择用例、分配主机类型、分组为配方。
pub fn compose_job(
    database: &Database,
    target: &Target,
    options: &JobOptions,
) -> Result<(Job, PlanSummary)> {
    let selection = select_cases(database, target, options.include_waived)?;
    let single_host = options.single_host || database.host_types.is_empty();
    let tree = &database.trees[&target.tree];

    let mut recipes = Vec::new();
    let mut host_types_used = Vec::new();

    if single_host {
        let tasks = build_tasks(selection.cases.iter(), options);
        recipes.push(Recipe {
            host_type: None,
            hostname: options.hostname.clone(),
            ignore_panic: false,
            host_requires: None,
            partitions: None,
            distro_requires: tree.distro_requires.clone(),
            tasks,
        });
    } else {
        // Group cases per host type. A case lands on every host type its
        // effective regex matches; matching none is a hard error.
        let mut grouped: BTreeMap<&String, Vec<&SelectedCase>> = BTreeMap::new();
        for case in &selection.cases {
            let mut assigned = false;
            for name in database.host_types.keys() {
                let matched = match &case.host_type_regex {
                    Some(regex) => anchored_match(regex, name)?,
                    None => true,
                };
                if matched {
                    grouped.entry(name).or_default().push(case);
                    assigned = true;
                }
            }
            if !assigned {
                return Err(ComposeError::NoHostType {
                    case: format!("{}/{}", case.suite, case.name),
                    regex: case.host_type_regex.clone().unwrap_or_default(),
                }
                .into());
            }
        }
        for (name, cases) in grouped {
            let host_type = &database.host_types[name];
            host_types_used.push(name.clone());
            let tasks = build_tasks(cases.iter().copied(), options);
            recipes.push(Recipe {
                host_type: Some(name.clone()),
                hostname: host_type.hostname.clone(),
                ignore_panic: host_type.ignore_panic,
                host_requires: host_type.host_requires.clone(),
                partitions: host_type.partitions.clone(),
                distro_requires: tree.distro_requires.clone(),
                tasks,
            });
        }
    }

    let description = options.description.clone().unwrap_or_else(|| {
        format!(
            "{} on {} ({} cases)",
            target.tree,
            target.arch,
            selection.cases.len()
        )
    });

    let mut vars = BTreeMap::new();
    vars.insert("tree".to_string(), target.tree.clone());
    vars.insert("arch".to_string(), target.arch.clone());
    if let Some(kernel) = &options.kernel {
        vars.insert("kernel".to_string(), kernel.clone());
    }

    let summary = PlanSummary {
        total_cases: selection.total,
        matched_cases: selection.cases.len(),
        filtered_cases: selection.filtered,
        waived_excluded: selection.waived_excluded,
        host_types: host_types_used,
        single_host,
    };

    let job = Job {
        description,
        vars,
        recipe_sets: vec![RecipeSet { recipes }],
    };

    Ok((job, summary))
}

/// The task name of the kernel-install step prefixed to every recipe when a
/// kernel URL is supplied.
pub const KERNEL_INSTALL_TASK: &str = "/distribution/install-kernel";

fn kernel_task(kernel: &str) -> TaskSpec {
    TaskSpec {
        name: KERNEL_INSTALL_TASK.to_string(),
        fetch: None,
        params: vec![("KERNEL_URL".to_string(), kernel.to_string())],
    }
}

fn case_task(case: &SelectedCase) -> TaskSpec {
    let mut params: Vec<(String, String)> = case
        .environment
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    if let Some(seconds) = case.max_duration_seconds {
        params.push(("MAX_DURATION_SECONDS".to_string(), seconds.to_string()));
    }
    TaskSpec {
        name: format!("{}/{}", case.suite, case.name),
        fetch: Some(Fetch {
            url: case.location.clone(),
            subdir: case.tasks.clone(),
        }),
        params,
    }
}

fn build_tasks<'a>(
    cases: impl Iterator<Item = &'a SelectedCase>,
    options: &JobOptions,
) -> Vec<TaskSpec> {
    let mut tasks = Vec::new();
    if let Some(kernel) = &options.kernel {
        tasks.push(kernel_task(kernel));
    }
    tasks.extend(cases.map(case_task));
    tasks
}
