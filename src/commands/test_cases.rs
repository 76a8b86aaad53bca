// src/commands/test_cases.rs

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use crate::{
    core::{db::Database, patch, planner::select_cases, target::Target},
    reporting::console::print_case_list,
    t,
};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    db: PathBuf,
    tree: String,
    arch: String,
    set: Option<String>,
    include_waived: bool,
    patches: Vec<PathBuf>,
    json: bool,
    locale: &str,
) -> Result<()> {
    let sources = if patches.is_empty() {
        None
    } else {
        Some(patch::path_set(&patches)?)
    };

    let database = Database::load(&db)?;
    let target = Target::new(tree, arch, set, sources);
    let selection = select_cases(&database, &target, include_waived)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    if selection.cases.is_empty() {
        println!("{}", t!("no_cases_matched", locale = locale).yellow());
        return Ok(());
    }

    println!(
        "{}",
        t!(
            "matched_cases_banner",
            locale = locale,
            count = selection.cases.len(),
            total = selection.total
        )
        .bold()
    );
    print_case_list(&selection.cases, locale);

    Ok(())
}
