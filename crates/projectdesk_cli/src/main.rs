//! projectdesk command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the project database.
//! - Run one procedure per invocation and print its JSON envelope.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use projectdesk_api::{Procedure, ProcedureResponse, ProjectRouter};
use projectdesk_core::db::open_db;
use projectdesk_core::{init_logging, LogLevel, ServiceConfig, SqliteProjectStore};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "projectdesk")]
#[command(version, about = "Manage project records through named procedures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database file (overrides PROJECTDESK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute log directory (overrides PROJECTDESK_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides PROJECTDESK_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Pretty-print the JSON envelope
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Invoke one procedure
    Call {
        /// Procedure name: create|getAll|getById|update|delete
        procedure: String,
        /// JSON input, e.g. '{"name":"Alpha"}'
        input: Option<String>,
    },
    /// List procedure names
    Procedures,
    /// Print core version and health probe
    Version,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level.as_str(), log_dir).context("failed to initialize logging")?;
    }

    match cli.command {
        Command::Call { procedure, input } => {
            let conn = open_db(&config.db_path).with_context(|| {
                format!("failed to open database `{}`", config.db_path.display())
            })?;
            let store = SqliteProjectStore::try_new(&conn)
                .context("database is not ready for project storage")?;
            let response = ProjectRouter::from_store(store)
                .call_json(&procedure, &input.unwrap_or_default());
            print_response(&response, cli.pretty)?;
            Ok(if response.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Procedures => {
            for procedure in Procedure::ALL {
                println!("{}", procedure.name());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Version => {
            println!("projectdesk_core ping={}", projectdesk_core::ping());
            println!("projectdesk_core version={}", projectdesk_core::core_version());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::from_env().context("invalid environment configuration")?;

    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level
            .parse::<LogLevel>()
            .context("invalid --log-level")?;
    }

    Ok(config)
}

fn print_response(response: &ProcedureResponse, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{rendered}");
    info!(
        "event=cli_call module=cli status={} error_code={}",
        if response.ok { "ok" } else { "error" },
        response.error_code().map_or("none", |code| code.as_str())
    );
    Ok(())
}
