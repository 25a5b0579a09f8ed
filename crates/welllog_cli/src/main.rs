//! Command-line entry point.
//!
//! # Responsibility
//! - Start the REST server with settings from flags or `WELLLOG_*` env vars.
//! - Offer a read-only dump of stored wells for quick local inspection.

use clap::{Parser, Subcommand};
use log::error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use welllog_core::db::open_db;
use welllog_core::{default_log_level, init_logging, SqliteWellRepository, WellService};
use welllog_http::{ServerConfig, DEFAULT_BIND_ADDR};

#[derive(Debug, Parser)]
#[command(name = "welllog", about = "Well and lithology layer registry", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the REST API
    Serve {
        /// SQLite database file, created on first use
        #[arg(long, env = "WELLLOG_DB", default_value = "welllog.db")]
        db: PathBuf,
        #[arg(long, env = "WELLLOG_BIND", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
        #[arg(long, env = "WELLLOG_LOG_LEVEL")]
        log_level: Option<String>,
        /// Absolute directory for rotating log files; stderr when unset
        #[arg(long, env = "WELLLOG_LOG_DIR")]
        log_dir: Option<String>,
    },
    /// Print every well with its layers as JSON
    Wells {
        #[arg(long, env = "WELLLOG_DB", default_value = "welllog.db")]
        db: PathBuf,
    },
    /// Print core linkage and version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve {
            db,
            bind,
            log_level,
            log_dir,
        } => serve(db, bind, log_level, log_dir),
        Command::Wells { db } => print_wells(db),
        Command::Version => {
            println!("welllog_core ping={}", welllog_core::ping());
            println!("welllog_core version={}", welllog_core::core_version());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn serve(
    db: PathBuf,
    bind: SocketAddr,
    log_level: Option<String>,
    log_dir: Option<String>,
) -> Result<(), String> {
    let level = log_level.unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, log_dir.as_deref())?;

    let config = ServerConfig::new(bind, db);
    actix_web::rt::System::new()
        .block_on(welllog_http::run(config))
        .map_err(|err| format!("server failed: {err}"))
}

fn print_wells(db: PathBuf) -> Result<(), String> {
    let conn = open_db(&db).map_err(|err| err.to_string())?;
    let repo = SqliteWellRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let wells = WellService::new(repo)
        .list_wells()
        .map_err(|err| err.to_string())?;
    let json = serde_json::to_string_pretty(&wells).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}
