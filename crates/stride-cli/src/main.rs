//! Stride CLI application
//!
//! Command-line harness for the Stride coaching core: send chat messages,
//! inspect the current plan and history, and reset sessions.

mod args;
mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use stride_core::{CoachBuilder, CoachConfig, OpenAiClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        command,
    } = Args::parse();

    let mut builder = CoachBuilder::new().with_database_path(database_file);

    // Only chat needs the completion client, so the API key is only
    // required there.
    if matches!(command, Commands::Chat { .. }) {
        let config = CoachConfig::from_env().context("Failed to load completion configuration")?;
        let client =
            OpenAiClient::from_config(&config).context("Failed to build completion client")?;
        builder = builder.with_client(Arc::new(client));
    }

    let coach = builder.build().await.context("Failed to initialize coach")?;
    let cli = Cli::new(coach);

    info!("Stride started");

    match command {
        Commands::Chat { client_id, message } => cli.chat(&client_id, &message).await,
        Commands::Plan { client_id } => cli.show_plan(&client_id).await,
        Commands::History { client_id, limit } => cli.show_history(&client_id, limit).await,
        Commands::Reset { client_id } => cli.reset(&client_id).await,
    }
}
