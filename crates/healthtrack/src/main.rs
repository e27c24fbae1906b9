//! `healthtrack` - CLI for recording and reviewing health readings
//!
//! Without a subcommand this runs the interactive menu; the subcommands
//! perform the same operations one at a time.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use healthtrack::analyzer::{NO_AVERAGES_MESSAGE, NO_RISK_MESSAGE};
use healthtrack::cli::{AddCommand, Cli, Command, ConfigCommand, StatusCommand, UserCommand};
use healthtrack::menu::DEVELOPER_INFO;
use healthtrack::reporter::NO_RECORDS_MESSAGE;
use healthtrack::{init_logging, Analyzer, Config, Menu, Recorder, Reporter, Storage};

/// Exit status for rejected input.
const EXIT_INVALID_INPUT: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?.with_database_path(cli.database.clone());

    let command = cli.command.unwrap_or(Command::Chat);
    let command = match command {
        Command::Config(config_cmd) => {
            handle_config(&config, config_cmd)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::About => {
            println!("{DEVELOPER_INFO}");
            return Ok(ExitCode::SUCCESS);
        }
        other => other,
    };

    let path = config.database_path();
    let storage = Storage::open_with_journal_mode(&path, &config.storage.journal_mode)
        .with_context(|| format!("could not open health database at {}", path.display()))?;

    let outcome = run(&storage, &config, command);
    storage.close()?;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is_invalid_input() => {
            eprintln!("{err}");
            Ok(ExitCode::from(EXIT_INVALID_INPUT))
        }
        Err(err) => Err(err.into()),
    }
}

fn run(storage: &Storage, config: &Config, command: Command) -> healthtrack::Result<()> {
    match command {
        Command::Chat => {
            let stdin = io::stdin();
            Menu::new(storage, stdin.lock(), io::stdout()).run()
        }
        Command::Add(add_cmd) => handle_add(storage, &add_cmd),
        Command::History(user_cmd) => handle_history(storage, &user_cmd),
        Command::Averages(user_cmd) => handle_averages(storage, &user_cmd),
        Command::Risk(user_cmd) => handle_risk(storage, &user_cmd),
        Command::Status(status_cmd) => handle_status(storage, config, &status_cmd),
        Command::About | Command::Config(_) => Ok(()),
    }
}

fn handle_add(storage: &Storage, cmd: &AddCommand) -> healthtrack::Result<()> {
    let feedback =
        Recorder::new(storage).record(&cmd.session(), &cmd.sugar, &cmd.systolic, &cmd.diastolic)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&feedback)?);
    } else {
        println!("{feedback}");
    }
    Ok(())
}

fn handle_history(storage: &Storage, cmd: &UserCommand) -> healthtrack::Result<()> {
    let user = cmd.user();
    let history = Reporter::new(storage).history(&user)?;
    match (history, cmd.json) {
        (Some(history), true) => println!("{}", serde_json::to_string_pretty(&history)?),
        (Some(history), false) => println!("{history}"),
        (None, true) => print_empty_json(user.as_str(), "no_records")?,
        (None, false) => println!("{NO_RECORDS_MESSAGE}"),
    }
    Ok(())
}

fn handle_averages(storage: &Storage, cmd: &UserCommand) -> healthtrack::Result<()> {
    let user = cmd.user();
    let averages = Analyzer::new(storage).averages(&user)?;
    match (averages, cmd.json) {
        (Some(averages), true) => println!("{}", serde_json::to_string_pretty(&averages)?),
        (Some(averages), false) => println!("{averages}"),
        (None, true) => print_empty_json(user.as_str(), "insufficient_data")?,
        (None, false) => println!("{NO_AVERAGES_MESSAGE}"),
    }
    Ok(())
}

fn handle_risk(storage: &Storage, cmd: &UserCommand) -> healthtrack::Result<()> {
    let user = cmd.user();
    let risk = Analyzer::new(storage).risk(&user)?;
    match (risk, cmd.json) {
        (Some(risk), true) => println!("{}", serde_json::to_string_pretty(&risk)?),
        (Some(risk), false) => println!("{risk}"),
        (None, true) => print_empty_json(user.as_str(), "insufficient_data")?,
        (None, false) => println!("{NO_RISK_MESSAGE}"),
    }
    Ok(())
}

fn print_empty_json(user: &str, status: &str) -> healthtrack::Result<()> {
    let body = serde_json::json!({ "user": user, "status": status });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn handle_status(
    storage: &Storage,
    config: &Config,
    cmd: &StatusCommand,
) -> healthtrack::Result<()> {
    let stats = storage.stats()?;
    let user_records = match cmd.user() {
        Some(user) => Some((storage.count_by_name(&user)?, user)),
        None => None,
    };
    if cmd.json {
        let mut status = serde_json::json!({
            "database_path": storage.path(),
            "journal_mode": config.storage.journal_mode,
            "total_records": stats.total_records,
            "distinct_users": stats.distinct_users,
            "newest_record": stats.newest_timestamp,
            "db_size_bytes": stats.db_size_bytes,
        });
        if let Some((count, user)) = &user_records {
            status["user"] = serde_json::json!(user);
            status["user_records"] = serde_json::json!(count);
        }
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("healthtrack status");
        println!("------------------");
        println!("Database:      {}", storage.path().display());
        println!("Journal mode:  {}", config.storage.journal_mode);
        println!("Records:       {}", stats.total_records);
        println!("Users:         {}", stats.distinct_users);
        println!(
            "Newest record: {}",
            stats.newest_timestamp.as_deref().unwrap_or("-")
        );
        println!("Size:          {} bytes", stats.db_size_bytes);
        if let Some((count, user)) = &user_records {
            println!("Records for {user}: {count}");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Journal mode:       {}", config.storage.journal_mode);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
