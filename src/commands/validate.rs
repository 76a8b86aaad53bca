// src/commands/validate.rs

use anyhow::Result;
use colored::*;
use std::{path::PathBuf, sync::Arc};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{db::Database, matrix},
    reporting::{print_failure_details, print_summary},
    t,
};

pub async fn execute(db: PathBuf, jobs: Option<usize>, locale: &str) -> Result<()> {
    let database = Arc::new(Database::load(&db)?);
    let jobs = jobs.unwrap_or(num_cpus::get() / 2 + 1);
    let combos = database.trees.len() * database.arches.len();

    println!(
        "{}",
        t!(
            "validating_matrix",
            locale = locale,
            combos = combos,
            jobs = jobs
        )
        .bold()
    );

    let stop_token = setup_signal_handler(locale)?;
    let results = matrix::check_matrix(database, jobs, stop_token).await;

    print_summary(&results, locale);

    let failures: Vec<_> = results.iter().filter(|result| result.is_failure()).collect();
    if failures.is_empty() {
        println!(
            "\n{}",
            t!("all_combos_passed", locale = locale).green().bold()
        );
        Ok(())
    } else {
        print_failure_details(&failures, locale);
        anyhow::bail!(t!("combos_failed", locale = locale, count = failures.len()).to_string());
    }
}

fn setup_signal_handler(locale: &str) -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl-C");
        println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
        token_clone.cancel();
    });

    Ok(token)
}
