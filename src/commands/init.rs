//! # Database Initialization Module / 数据库初始化模块
//!
//! This module provides functionality for scaffolding a new test database
//! through an interactive command-line wizard. It helps users create a
//! `database.yml` file plus a starter suite with a common test case layout.
//!
//! 此模块通过交互式命令行向导提供初始化新测试数据库的功能。
//! 它帮助用户创建 `database.yml` 文件以及带有常见测试用例布局的起始套件。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Step-by-step guidance for database setup
//! - **Architecture Selection**: Pre-defined architecture choices
//! - **Overwrite Protection**: Confirmation prompts before overwriting an
//!   existing database
//!
//! - **交互式向导**: 数据库设置的逐步指导
//! - **架构选择**: 预定义的架构选项
//! - **覆盖保护**: 覆盖现有数据库前的确认提示

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::db::{Case, Pattern, Suite};
use crate::t;

/// Architectures offered by the wizard.
const ARCH_CHOICES: [&str; 4] = ["x86_64", "aarch64", "ppc64le", "s390x"];

/// Runs the interactive wizard to scaffold a `database.yml` file and a
/// starter suite under `suites/`.
///
/// 运行交互式向导，生成 `database.yml` 文件以及 `suites/` 下的起始套件。
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let database_path = Path::new("database.yml");
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!(
            "\n{}",
            t!("init_wizard_welcome", locale = language).cyan().bold()
        );
        println!("{}", t!("init_wizard_description", locale = language));
    }

    if database_path.exists() && !non_interactive {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!(
                "init_overwrite_prompt",
                locale = language,
                path = database_path.display()
            ))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let (tree, arches) = if non_interactive {
        (
            "mainline".to_string(),
            vec!["x86_64".to_string(), "aarch64".to_string()],
        )
    } else {
        let tree: String = Input::with_theme(&theme)
            .with_prompt(t!("init_tree_prompt", locale = language).to_string())
            .default("mainline".to_string())
            .interact_text()?;

        let selections = MultiSelect::with_theme(&theme)
            .with_prompt(t!("init_arches_prompt", locale = language).to_string())
            .items(&ARCH_CHOICES)
            .defaults(&[true, true, false, false])
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

        let arches: Vec<String> = selections
            .into_iter()
            .map(|index| ARCH_CHOICES[index].to_string())
            .collect();
        if arches.is_empty() {
            println!("{}", t!("init_no_arches_selected", locale = language).yellow());
        }
        (tree, arches)
    };

    let arches = if arches.is_empty() {
        vec!["x86_64".to_string()]
    } else {
        arches
    };

    write_database(database_path, &tree, &arches, language)?;
    write_starter_suite(Path::new("suites"), language)?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!(
            "init_success_created",
            locale = language,
            path = database_path.display()
        )
        .bold()
    );
    println!("{}", t!("init_usage_hint", locale = language));

    Ok(())
}

fn write_database(path: &Path, tree: &str, arches: &[String], language: &str) -> Result<()> {
    let arches_yaml = arches.join(", ");
    let contents = format!(
        r#"description: Example test database
trees:
  {tree}:
    description: Upstream development tree
arches: [{arches_yaml}]
sets:
  general: General-purpose coverage
host_types:
  normal:
    description: Default lab machine
    host_requires: |
      <and>
        <system_type op="=" value="Machine"/>
      </and>
    partitions: |
      <partition fs="xfs">
        <name>/mnt/tests</name>
        <size>16</size>
      </partition>
host_type_regex: normal
suites:
  - suites/example.yml
"#
    );

    fs::write(path, contents)
        .with_context(|| t!("init_write_failed", locale = language, path = path.display()))?;
    Ok(())
}

fn write_starter_suite(suites_dir: &Path, language: &str) -> Result<()> {
    fs::create_dir_all(suites_dir).with_context(|| {
        t!(
            "init_write_failed",
            locale = language,
            path = suites_dir.display()
        )
    })?;

    let suite = starter_suite();
    let suite_path = suites_dir.join("example.yml");
    let contents = serde_yaml::to_string(&suite)
        .context(t!("init_serialize_failed", locale = language).to_string())?;

    fs::write(&suite_path, contents).with_context(|| {
        t!(
            "init_write_failed",
            locale = language,
            path = suite_path.display()
        )
    })?;
    Ok(())
}

/// The starter suite: one unconditional smoke case and one source-restricted
/// example the user can adapt.
fn starter_suite() -> Suite {
    Suite {
        name: "example".to_string(),
        description: "Starter suite created by the init wizard".to_string(),
        location: "https://example.com/tests.git".to_string(),
        host_type_regex: None,
        maintainers: vec!["you@example.com".to_string()],
        cases: vec![
            Case {
                name: "smoke".to_string(),
                description: "Boot the kernel and run a trivial workload".to_string(),
                tasks: Some("tests/smoke".to_string()),
                max_duration_seconds: Some(3600),
                host_type_regex: None,
                waived: false,
                environment: BTreeMap::new(),
                patterns: vec![],
            },
            Case {
                name: "net-only".to_string(),
                description: "Runs only when networking sources change".to_string(),
                tasks: Some("tests/net".to_string()),
                max_duration_seconds: Some(7200),
                host_type_regex: None,
                waived: false,
                environment: BTreeMap::new(),
                patterns: vec![Pattern {
                    trees: vec![],
                    arches: vec![],
                    sets: vec![],
                    sources: vec!["net/.*".to_string(), "drivers/net/.*".to_string()],
                }],
            },
        ],
    }
}
