mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, CloseArgs, NoteArgs, StatusArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::http::{HttpHelpdesk, SessionCookie};

#[derive(Parser)]
#[command(name = "deskctl", author, version, about = "Helpdesk ticket actions from the terminal")]
struct Cli {
    /// Helpdesk base URL; overrides the stored configuration.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Change a ticket's status.
    Status(StatusArgs),
    /// Close a ticket.
    Close(CloseArgs),
    /// Append a note to a ticket.
    Note(NoteArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the requested action completed.
async fn run() -> AppResult<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            return Ok(true);
        }
        Commands::Status(args) => ticket::run_status(&build_context(cli.base_url)?, args).await?,
        Commands::Close(args) => ticket::run_close(&build_context(cli.base_url)?, args).await?,
        Commands::Note(args) => ticket::run_note(&build_context(cli.base_url)?, args).await?,
    };

    Ok(outcome.is_completed())
}

fn build_context(base_url: Option<String>) -> AppResult<AppContext> {
    let config = AppConfig::load(base_url)?;

    if config.session_value.is_none() {
        eprintln!("Warning: no session configured; the helpdesk will reject ticket actions.");
    }

    let session = config.session_value.clone().map(|value| SessionCookie {
        name: config.session_cookie_name.clone(),
        value,
    });
    let helpdesk = HttpHelpdesk::new(&config.base_url, session, config.timeout)?;
    info!(base_url = %config.base_url, timeout = ?config.timeout, "helpdesk client ready");

    Ok(AppContext::new(config, Arc::new(helpdesk)))
}
