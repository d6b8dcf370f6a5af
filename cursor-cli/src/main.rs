//! # mailcursor
//!
//! CLI tool for exercising the mailbox cursor against a mailbox fixture.
//!
//! ## Commands
//!
//! - `browse`: Open a cursor on an anchor and replay scripted moves
//! - `session`: Publish a cursor through the lifecycle manager and watch it
//!   get torn down once unobserved
//!
//! ## Example
//!
//! ```bash
//! # Walk forward twice, then back once
//! mailcursor browse --mailbox inbox.json --anchor 100 --moves nnp
//!
//! # Same, with the probe before the first move going offline
//! mailcursor browse --mailbox inbox.json --anchor 100 --moves nn --offline-at 0
//!
//! # Watch the session teardown with a custom grace window
//! mailcursor --config mailcursor.toml session --mailbox inbox.json --anchor 100
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod mailbox;

use commands::{browse, session};
use config::Config;

/// CLI tool for exercising the mailbox cursor.
#[derive(Parser, Debug)]
#[command(name = "mailcursor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay scripted moves over a mailbox fixture
    Browse {
        /// JSON mailbox fixture (ordered array of anchors)
        #[arg(long, short)]
        mailbox: PathBuf,

        /// Conversation to open on
        #[arg(long, short)]
        anchor: String,

        /// Message inside the anchor conversation
        #[arg(long)]
        message: Option<String>,

        /// Moves: n = forward, p = backward, i = invalidate previous
        #[arg(long, default_value = "")]
        moves: String,

        /// Make the probe before this move (0-based) fail offline
        #[arg(long)]
        offline_at: Option<usize>,
    },

    /// Publish, observe and abandon a cursor session
    Session {
        /// JSON mailbox fixture (ordered array of anchors)
        #[arg(long, short)]
        mailbox: PathBuf,

        /// Conversation to open on
        #[arg(long, short)]
        anchor: String,

        /// Message inside the anchor conversation
        #[arg(long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Browse {
            mailbox: mailbox_path,
            anchor,
            message,
            moves,
            offline_at,
        } => {
            let anchor = mailbox::anchor(&anchor, message.as_deref());
            browse::run(&mailbox_path, anchor, &moves, offline_at).await?;
        }
        Commands::Session {
            mailbox: mailbox_path,
            anchor,
            message,
        } => {
            let anchor = mailbox::anchor(&anchor, message.as_deref());
            session::run(&mailbox_path, anchor, config.lifecycle_config()).await?;
        }
    }

    Ok(())
}
