#![allow(clippy::exit)]

//! `modctl`: list and moderate users of the moderation API from a terminal.

mod cli;
mod commands;
mod output;
mod timing;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use moderation_business::{API_BASE_URL_ENV, ConsoleConfig, Credential, FilterCriteria};

use crate::cli::{Cli, Commands};
use crate::commands::{generate_completions, run_list, run_set_role, run_set_status};

fn console_config(cli: &Cli) -> Result<ConsoleConfig> {
    let api_base_url = cli
        .api_base_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .with_context(|| format!("pass --api-base-url or set {API_BASE_URL_ENV}"))?;
    let credential = Credential::new(cli.credential.clone().unwrap_or_default());

    Ok(ConsoleConfig::new(api_base_url, credential))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    match &cli.command {
        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
        Commands::List {
            search,
            status,
            role,
            json,
        } => {
            let config = console_config(&cli)?;
            let criteria = FilterCriteria::new(search.as_str(), *status, *role);
            run_list(&config, criteria, *json).await
        }
        Commands::SetRole { id, role } => run_set_role(&console_config(&cli)?, *id, *role).await,
        Commands::SetStatus { id, status } => {
            run_set_status(&console_config(&cli)?, *id, *status).await
        }
    }
}
