// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::{commands, t};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        if let Some(lang) = args.get(pos + 1) {
            return lang.clone();
        }
    }
    // Fallback to system language detection
    sys_locale::get_locale().unwrap_or_else(|| "en".to_string())
}

/// Appends the database path argument shared by every data-driven command.
fn db_arg(locale: &str) -> Arg {
    Arg::new("db")
        .short('d')
        .long("db")
        .help(t!("arg_db", locale = locale).to_string())
        .value_name("DB")
        .default_value("database.yml")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

/// Appends the targeting arguments shared by `generate` and `test-cases`.
fn target_args(command: Command, locale: &str) -> Command {
    command
        .arg(
            Arg::new("tree")
                .short('t')
                .long("tree")
                .help(t!("arg_tree", locale = locale).to_string())
                .value_name("TREE")
                .required(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("arch")
                .short('a')
                .long("arch")
                .help(t!("arg_arch", locale = locale).to_string())
                .value_name("ARCH")
                .required(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("set")
                .short('s')
                .long("set")
                .help(t!("arg_set", locale = locale).to_string())
                .value_name("SET")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("include-waived")
                .long("include-waived")
                .help(t!("arg_include_waived", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("patch")
                .help(t!("arg_patch", locale = locale).to_string())
                .value_name("PATCH")
                .num_args(0..)
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn build_cli(locale: &str) -> Command {
    Command::new("beaker-matrix")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(target_args(
            Command::new("generate")
                .about(t!("cmd_generate_about", locale = locale).to_string())
                .arg(db_arg(locale))
                .arg(
                    Arg::new("kernel")
                        .short('k')
                        .long("kernel")
                        .help(t!("arg_kernel", locale = locale).to_string())
                        .value_name("URL")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help(t!("arg_description", locale = locale).to_string())
                        .value_name("TEXT")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_output", locale = locale).to_string())
                        .value_name("OUTPUT")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("single-host")
                        .long("single-host")
                        .help(t!("arg_single_host", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("hostname")
                        .long("hostname")
                        .help(t!("arg_hostname", locale = locale).to_string())
                        .value_name("HOSTNAME")
                        .action(ArgAction::Set),
                ),
            locale,
        ))
        .subcommand(target_args(
            Command::new("test-cases")
                .about(t!("cmd_test_cases_about", locale = locale).to_string())
                .arg(db_arg(locale))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("arg_json", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
            locale,
        ))
        .subcommand(
            Command::new("list")
                .about(t!("cmd_list_about", locale = locale).to_string())
                .arg(db_arg(locale))
                .arg(
                    Arg::new("what")
                        .help(t!("arg_what", locale = locale).to_string())
                        .value_name("WHAT")
                        .required(true)
                        .value_parser(["trees", "arches", "sets", "hosts"])
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about(t!("cmd_validate_about", locale = locale).to_string())
                .arg(db_arg(locale))
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help(t!("arg_jobs", locale = locale).to_string())
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help("Create a default database without launching the interactive wizard.")
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("generate", sub_matches)) => {
            let request = commands::generate::GenerateRequest {
                db: sub_matches.get_one::<PathBuf>("db").unwrap().clone(), // Has default
                tree: sub_matches.get_one::<String>("tree").unwrap().clone(), // Required
                arch: sub_matches.get_one::<String>("arch").unwrap().clone(), // Required
                set: sub_matches.get_one::<String>("set").cloned(),
                kernel: sub_matches.get_one::<String>("kernel").cloned(),
                description: sub_matches.get_one::<String>("description").cloned(),
                output: sub_matches.get_one::<PathBuf>("output").cloned(),
                single_host: sub_matches.get_flag("single-host"),
                hostname: sub_matches.get_one::<String>("hostname").cloned(),
                include_waived: sub_matches.get_flag("include-waived"),
                patches: sub_matches
                    .get_many::<PathBuf>("patch")
                    .map(|patches| patches.cloned().collect())
                    .unwrap_or_default(),
            };
            commands::generate::execute(request, &language)?;
        }
        Some(("test-cases", sub_matches)) => {
            commands::test_cases::execute(
                sub_matches.get_one::<PathBuf>("db").unwrap().clone(), // Has default
                sub_matches.get_one::<String>("tree").unwrap().clone(), // Required
                sub_matches.get_one::<String>("arch").unwrap().clone(), // Required
                sub_matches.get_one::<String>("set").cloned(),
                sub_matches.get_flag("include-waived"),
                sub_matches
                    .get_many::<PathBuf>("patch")
                    .map(|patches| patches.cloned().collect())
                    .unwrap_or_default(),
                sub_matches.get_flag("json"),
                &language,
            )?;
        }
        Some(("list", sub_matches)) => {
            commands::list::execute(
                sub_matches.get_one::<PathBuf>("db").unwrap().clone(), // Has default
                sub_matches.get_one::<String>("what").unwrap(),        // Required
                &language,
            )?;
        }
        Some(("validate", sub_matches)) => {
            commands::validate::execute(
                sub_matches.get_one::<PathBuf>("db").unwrap().clone(), // Has default
                sub_matches.get_one::<usize>("jobs").copied(),
                &language,
            )
            .await?;
        }
        Some(("init", sub_matches)) => {
            let non_interactive = sub_matches.get_flag("non-interactive");

            // Show language detection message if it was auto-detected
            if env::args().all(|arg| arg != "--lang") {
                println!(
                    "🌐 {}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::run_init_wizard(&language, non_interactive)?;
        }
        _ => {
            // This case handles when no subcommand is given.
            // Clap will have already printed help info.
        }
    }
    Ok(())
}
