//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Conversational AI running coach
#[derive(Parser)]
#[command(name = "stride", version, about)]
pub struct Args {
    /// Path to the SQLite database file (defaults to the XDG data directory)
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a chat message and print the reply (and plan, if one resulted)
    Chat {
        /// Client identifier
        client_id: String,
        /// Message text
        message: String,
    },
    /// Show the current plan for a client
    Plan {
        /// Client identifier
        client_id: String,
    },
    /// Show recent conversation history for a client
    History {
        /// Client identifier
        client_id: String,
        /// Maximum number of messages to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete all conversations and plan versions for a client
    Reset {
        /// Client identifier
        client_id: String,
    },
}
