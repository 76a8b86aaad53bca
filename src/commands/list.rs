// src/commands/list.rs

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use crate::{core::db::Database, t};

/// Lists one entity table of the database: trees, arches, sets, or hosts.
/// 列出数据库的一张实体表：树、架构、集合或主机。
pub fn execute(db: PathBuf, what: &str, locale: &str) -> Result<()> {
    let database = Database::load(&db)?;

    let rows: Vec<(String, String)> = match what {
        "trees" => database
            .trees
            .iter()
            .map(|(name, tree)| (name.clone(), tree.description.clone()))
            .collect(),
        "arches" => database
            .arches
            .iter()
            .map(|arch| (arch.clone(), String::new()))
            .collect(),
        "sets" => database
            .sets
            .iter()
            .map(|(name, description)| (name.clone(), description.clone()))
            .collect(),
        "hosts" => database
            .host_types
            .iter()
            .map(|(name, host_type)| (name.clone(), host_type.description.clone()))
            .collect(),
        // Unreachable: clap restricts the value to the four names above.
        other => anyhow::bail!("Unknown listing: {other}"),
    };

    if rows.is_empty() {
        println!("{}", t!("list_empty", locale = locale).yellow());
        return Ok(());
    }

    for (name, description) in rows {
        if description.is_empty() {
            println!("{}", name.cyan());
        } else {
            println!("{:<24} {}", name.cyan(), description.dimmed());
        }
    }

    Ok(())
}
