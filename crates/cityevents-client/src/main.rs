//! cityevents CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use cityevents_client::cli::{Cli, Command, ConfigAction};
use cityevents_client::commands;
use cityevents_client::config::ClientConfig;
use cityevents_client::error::{ClientError, ClientResult};
use cityevents_core::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::from_flags(cli.debug, cli.log_json)) {
        eprintln!("warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    if let Some(Command::Config {
        action: ConfigAction::Path,
    }) = cli.command
    {
        return commands::config::path(cli.config.as_deref());
    }

    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
    .map_err(ClientError::Config)?;

    match cli.command {
        Some(Command::Fetch(ref args)) => commands::fetch::run(args, &config),
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, cli.config.as_deref()),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(cli.config.as_deref()),
        },
        None => commands::fetch::run(&cli.fetch, &config),
    }
}
