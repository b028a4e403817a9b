//! `smartfood` entry point.

use clap::Parser;

use smartfood_assistant::cli::Cli;
use smartfood_assistant::{TerminalDialogs, commands};
use smartfood_client::HttpPantryApi;
use smartfood_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_env_or(LogFormat::Compact));
    smartfood_observability::init_with(format, "warn");

    let config = cli.client_config()?;
    tracing::debug!(?config, "client configured");
    let api = HttpPantryApi::new(config)?;

    commands::run(cli.command, api, &TerminalDialogs::new()).await
}
