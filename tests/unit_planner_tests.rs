//! # Planner Module Unit Tests / Planner 模块单元测试
//!
//! This module contains unit tests for the `planner.rs` module, testing
//! case selection counts, host type grouping, the single-host form, and
//! kernel task injection.
//!
//! 此模块包含 `planner.rs` 模块的单元测试，测试用例选择统计、主机类型分组、
//! 单主机形式以及内核任务注入。

mod common;

use beaker_matrix::core::db::Database;
use beaker_matrix::core::planner::{
    JobOptions, KERNEL_INSTALL_TASK, compose_job, select_cases,
};
use beaker_matrix::core::target::Target;

fn load_sample() -> Database {
    Database::load(std::path::Path::new("tests/sample_db/database.yml")).unwrap()
}

fn mainline_x86() -> Target {
    Target::new("mainline", "x86_64", None, None)
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    fn test_selection_counts_for_mainline() {
        let database = load_sample();
        let selection = select_cases(&database, &mainline_x86(), false).unwrap();

        // boot, storage-only, loopback, driver-smoke stay in; panic-check
        // is waived.
        assert_eq!(selection.total, 5);
        assert_eq!(selection.cases.len(), 4);
        assert_eq!(selection.filtered, 0);
        assert_eq!(selection.waived_excluded, 1);
    }

    #[test]
    fn test_tree_patterns_filter_cases() {
        let database = load_sample();
        let target = Target::new("stable", "x86_64", None, None);
        let selection = select_cases(&database, &target, false).unwrap();

        // loopback is restricted to mainline.
        assert_eq!(selection.filtered, 1);
        assert!(!selection.cases.iter().any(|case| case.name == "loopback"));
    }

    #[test]
    fn test_include_waived_keeps_waived_cases() {
        let database = load_sample();
        let selection = select_cases(&database, &mainline_x86(), true).unwrap();

        assert_eq!(selection.waived_excluded, 0);
        assert!(selection.cases.iter().any(|case| case.name == "panic-check"));
    }

    #[test]
    fn test_unknown_tree_is_rejected() {
        let database = load_sample();
        let target = Target::new("linux-next", "x86_64", None, None);
        let error = select_cases(&database, &target, false).unwrap_err();

        assert!(format!("{error:#}").contains("Unknown tree: linux-next"));
    }

    #[test]
    fn test_unknown_arch_is_rejected() {
        let database = load_sample();
        let target = Target::new("mainline", "riscv64", None, None);
        let error = select_cases(&database, &target, false).unwrap_err();

        assert!(format!("{error:#}").contains("Unknown architecture: riscv64"));
    }

    #[test]
    fn test_unknown_set_is_rejected() {
        let database = load_sample();
        let target = Target::new("mainline", "x86_64", Some("fuzzing".to_string()), None);
        let error = select_cases(&database, &target, false).unwrap_err();

        assert!(format!("{error:#}").contains("Unknown test set: fuzzing"));
    }

    #[test]
    fn test_selected_cases_carry_effective_regex() {
        let database = load_sample();
        let selection = select_cases(&database, &mainline_x86(), true).unwrap();

        let boot = selection.cases.iter().find(|c| c.name == "boot").unwrap();
        assert_eq!(boot.host_type_regex.as_deref(), Some("normal"));
        let panic_check = selection
            .cases
            .iter()
            .find(|c| c.name == "panic-check")
            .unwrap();
        assert_eq!(panic_check.host_type_regex.as_deref(), Some("panicky"));
    }
}

#[cfg(test)]
mod compose_tests {
    use super::*;

    #[test]
    fn test_multi_host_groups_per_host_type() {
        let database = load_sample();
        let (job, summary) =
            compose_job(&database, &mainline_x86(), &JobOptions::default()).unwrap();

        assert!(!summary.single_host);
        // Every surviving case maps onto the "normal" host type; the
        // "panicky" recipe is omitted because nothing lands on it.
        assert_eq!(job.recipe_sets.len(), 1);
        assert_eq!(job.recipe_sets[0].recipes.len(), 1);
        let recipe = &job.recipe_sets[0].recipes[0];
        assert_eq!(recipe.host_type.as_deref(), Some("normal"));
        assert_eq!(recipe.tasks.len(), 4);
        assert!(recipe.host_requires.is_some());
        assert!(recipe.partitions.is_some());
        assert_eq!(summary.host_types, vec!["normal".to_string()]);
    }

    #[test]
    fn test_waived_case_lands_on_its_own_host_type() {
        let database = load_sample();
        let options = JobOptions {
            include_waived: true,
            ..Default::default()
        };
        let (job, summary) = compose_job(&database, &mainline_x86(), &options).unwrap();

        assert_eq!(summary.host_types.len(), 2);
        let recipes = &job.recipe_sets[0].recipes;
        let panicky = recipes
            .iter()
            .find(|recipe| recipe.host_type.as_deref() == Some("panicky"))
            .unwrap();
        assert!(panicky.ignore_panic);
        assert_eq!(panicky.hostname.as_deref(), Some("lab-panic-01.example.com"));
        assert_eq!(panicky.tasks.len(), 1);
    }

    #[test]
    fn test_single_host_collapses_onto_one_recipe() {
        let database = load_sample();
        let options = JobOptions {
            single_host: true,
            hostname: Some("pinned.example.com".to_string()),
            ..Default::default()
        };
        let (job, summary) = compose_job(&database, &mainline_x86(), &options).unwrap();

        assert!(summary.single_host);
        assert_eq!(job.recipe_sets[0].recipes.len(), 1);
        let recipe = &job.recipe_sets[0].recipes[0];
        assert!(recipe.host_type.is_none());
        assert_eq!(recipe.hostname.as_deref(), Some("pinned.example.com"));
        assert_eq!(recipe.tasks.len(), 4);
    }

    #[test]
    fn test_database_without_host_types_is_single_host() {
        let temp_dir = common::setup_test_database();
        let mut database = Database::load(&temp_dir.path().join("database.yml")).unwrap();
        database.host_types.clear();
        database.host_type_regex = None;
        for suite in &mut database.suites {
            suite.host_type_regex = None;
        }

        let (job, summary) =
            compose_job(&database, &mainline_x86(), &JobOptions::default()).unwrap();
        assert!(summary.single_host);
        assert_eq!(job.recipe_sets[0].recipes.len(), 1);
    }

    #[test]
    fn test_regex_matching_no_host_type_is_an_error() {
        let mut database = load_sample();
        database.suites[0].cases[0].host_type_regex = Some("mythical".to_string());

        let error = compose_job(&database, &mainline_x86(), &JobOptions::default()).unwrap_err();
        assert!(format!("{error:#}").contains("matches no host type"));
        assert!(format!("{error:#}").contains("core/boot"));
    }

    #[test]
    fn test_kernel_task_prefixes_every_recipe() {
        let database = load_sample();
        let options = JobOptions {
            kernel: Some("https://kernels.example.com/kernel.rpm".to_string()),
            ..Default::default()
        };
        let (job, _summary) = compose_job(&database, &mainline_x86(), &options).unwrap();

        for recipe in &job.recipe_sets[0].recipes {
            let first = &recipe.tasks[0];
            assert_eq!(first.name, KERNEL_INSTALL_TASK);
            assert!(first.fetch.is_none());
            assert_eq!(
                first.params[0],
                (
                    "KERNEL_URL".to_string(),
                    "https://kernels.example.com/kernel.rpm".to_string()
                )
            );
        }
    }

    #[test]
    fn test_case_tasks_carry_fetch_and_params() {
        let database = load_sample();
        let (job, _summary) =
            compose_job(&database, &mainline_x86(), &JobOptions::default()).unwrap();

        let recipe = &job.recipe_sets[0].recipes[0];
        let loopback = recipe
            .tasks
            .iter()
            .find(|task| task.name == "net/loopback")
            .unwrap();
        let fetch = loopback.fetch.as_ref().unwrap();
        assert_eq!(fetch.url, "https://tests.example.com/net-${tree}.git");
        assert_eq!(fetch.subdir.as_deref(), Some("tests/loopback"));
        assert!(
            loopback
                .params
                .contains(&("TEST_TARGET".to_string(), "localhost".to_string()))
        );

        let driver_smoke = recipe
            .tasks
            .iter()
            .find(|task| task.name == "net/driver-smoke")
            .unwrap();
        assert!(
            driver_smoke
                .params
                .contains(&("MAX_DURATION_SECONDS".to_string(), "3600".to_string()))
        );
    }

    #[test]
    fn test_default_description_names_the_target() {
        let database = load_sample();
        let (job, _summary) =
            compose_job(&database, &mainline_x86(), &JobOptions::default()).unwrap();
        assert!(job.description.contains("mainline"));
        assert!(job.description.contains("x86_64"));
    }

    #[test]
    fn test_vars_carry_the_target() {
        let database = load_sample();
        let options = JobOptions {
            kernel: Some("https://kernels.example.com/kernel.rpm".to_string()),
            ..Default::default()
        };
        let (job, _summary) = compose_job(&database, &mainline_x86(), &options).unwrap();

        assert_eq!(job.vars["tree"], "mainline");
        assert_eq!(job.vars["arch"], "x86_64");
        assert_eq!(job.vars["kernel"], "https://kernels.example.com/kernel.rpm");
    }
}
