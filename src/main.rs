mod cli;
mod commands;
mod config;
mod data_source;
mod desired;
mod error;
mod flatten;
mod paths;
mod progress;
mod provider;
mod resource;
mod state;
mod ui;

use anyhow::{Context as AnyhowContext, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::{Overrides, ProviderConfig};
use provider::Provider;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "hashicups", &mut io::stdout());
        return Ok(());
    }

    // Schemas are static; skip sign-in.
    if let Command::Schema { type_name } = &cli.command {
        let provider = Provider::configure(&ProviderConfig::default())?;
        return commands::schema::run(&provider, type_name.as_deref());
    }

    let state_path = paths::state_file(cli.state.as_deref());
    let config = ProviderConfig::resolve(Overrides {
        host: cli.host,
        username: cli.username,
        password: cli.password,
    })?;
    log::debug!("Provider config: {:?}", config);

    let provider = Provider::configure(&config)
        .with_context(|| format!("Failed to configure provider for {}", config.host))?;

    match cli.command {
        Command::Plan { desired } => commands::plan::run(&provider, &state_path, &desired),
        Command::Apply {
            desired,
            auto_approve,
            parallelism,
        } => commands::apply::run(
            &ctx,
            &provider,
            &state_path,
            &desired,
            auto_approve,
            parallelism,
        ),
        Command::Refresh => commands::refresh::run(&ctx, &provider, &state_path),
        Command::Destroy { auto_approve } => {
            commands::destroy::run(&ctx, &provider, &state_path, auto_approve)
        }
        Command::Coffees { json } => commands::data::coffees(&provider, json),
        Command::Order { id, json } => commands::data::order(&provider, id, json),
        Command::Schema { .. } | Command::Completions { .. } => Ok(()),
    }
}
