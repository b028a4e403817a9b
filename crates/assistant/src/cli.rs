//! Command-line surface of the `smartfood` binary.

use std::time::Duration;

use clap::{Parser, Subcommand};

use smartfood_client::{ClientConfig, ConfigError, config::parse_timeout};
use smartfood_core::ItemId;
use smartfood_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "smartfood", version, about = "Track household food and what to eat first")]
pub struct Cli {
    /// Base URL of the prediction/storage service (overrides SMARTFOOD_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides SMARTFOOD_API_TIMEOUT_SECS).
    #[arg(long, global = true, value_parser = parse_timeout)]
    pub timeout_secs: Option<Duration>,

    /// Bearer token sent with every request (overrides SMARTFOOD_API_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log format on stderr: json or compact (overrides SMARTFOOD_LOG_FORMAT).
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Add an item through the guided intake conversation.
    Add {
        /// Type every field by hand instead of asking for a prediction.
        #[arg(long)]
        manual: bool,
    },
    /// Show the inventory.
    List {
        /// Soonest-expiring first.
        #[arg(long)]
        by_urgency: bool,
    },
    /// Delete an item.
    Delete {
        id: ItemId,
        /// Skip the confirmation.
        #[arg(long)]
        yes: bool,
    },
    /// Record that some of an item was used.
    Consume {
        id: ItemId,
        /// Amount used; prompted for when omitted.
        #[arg(long)]
        amount: Option<String>,
    },
    /// Change an item's name or quantity.
    Edit {
        id: ItemId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        qty: Option<String>,
    },
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        self.apply_overrides(ClientConfig::from_env()?)
    }

    pub fn apply_overrides(&self, mut config: ClientConfig) -> Result<ClientConfig, ConfigError> {
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url)?;
        }
        if let Some(timeout) = self.timeout_secs {
            config = config.with_timeout(timeout);
        }
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        Ok(config)
    }
}
