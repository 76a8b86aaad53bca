// src/commands/generate.rs

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf};

use crate::{
    core::{
        db::Database,
        patch,
        planner::{JobOptions, compose_job},
        target::Target,
    },
    reporting::beaker::render_job,
    t,
};

/// Everything the `generate` subcommand was invoked with.
/// `generate` 子命令被调用时的全部参数。
#[derive(Debug)]
pub struct GenerateRequest {
    pub db: PathBuf,
    pub tree: String,
    pub arch: String,
    pub set: Option<String>,
    pub kernel: Option<String>,
    pub description: Option<String>,
    pub output: Option<PathBuf>,
    pub single_host: bool,
    pub hostname: Option<String>,
    pub include_waived: bool,
    pub patches: Vec<PathBuf>,
}

pub fn execute(request: GenerateRequest, locale: &str) -> Result<()> {
    let sources = if request.patches.is_empty() {
        None
    } else {
        Some(patch::path_set(&request.patches)?)
    };

    // Status lines go to stderr so the document on stdout stays clean.
    eprintln!(
        "{}",
        t!("loading_database", locale = locale, path = request.db.display())
    );
    let database = Database::load(&request.db)?;

    let target = Target::new(request.tree, request.arch, request.set, sources);
    let options = JobOptions {
        kernel: request.kernel,
        description: request.description,
        single_host: request.single_host,
        hostname: request.hostname,
        include_waived: request.include_waived,
    };

    let (job, summary) = compose_job(&database, &target, &options)?;
    let document = render_job(&job)?;

    if summary.filtered_cases > 0 {
        eprintln!(
            "{}",
            t!(
                "filtered_cases",
                locale = locale,
                filtered = summary.filtered_cases,
                total = summary.total_cases
            )
            .cyan()
        );
    }
    if summary.waived_excluded > 0 {
        eprintln!(
            "{}",
            t!("waived_excluded", locale = locale, count = summary.waived_excluded).yellow()
        );
    }
    if summary.single_host {
        eprintln!("{}", t!("single_host_mode", locale = locale).cyan());
    } else {
        eprintln!(
            "{}",
            t!(
                "composed_job",
                locale = locale,
                matched = summary.matched_cases,
                hosts = summary.host_types.len()
            )
            .cyan()
        );
    }

    match &request.output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| t!("output_write_failed", locale = locale, path = path.display()))?;
            println!(
                "{} {}",
                "✔".green(),
                t!("wrote_output", locale = locale, path = path.display()).bold()
            );
        }
        None => {
            println!("{document}");
        }
    }

    Ok(())
}
