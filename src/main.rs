//! Dune RPG Helper - A Matrix bot keeping score for a Dune tabletop RPG table.
//!
//! # Overview
//!
//! The bot watches one Matrix room and keeps the shared state of the table:
//! the group's momentum, the game master's threat, and the current scene. It
//! also rolls d20 pools and counts successes. State survives restarts in a
//! JSON file. When the room has been quiet for a while, the bot reminds the
//! players of the current status.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! matrix:
//!   user_id: "@dune:matrix.org"
//!   password: "your-password"
//!   passphrase: "your-recovery-passphrase"
//!
//! tracker:
//!   room_id: "!table:matrix.org"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `DUNE_` prefix:
//!
//! ```bash
//! export DUNE_MATRIX__PASSWORD="your-password"
//! export DUNE_TRACKER__ROOM_ID="!table:matrix.org"
//! ```
//!
//! # Usage
//!
//! ```bash
//! dune-helper --config config.yaml --data ./dune-data
//! ```
//!
//! # Bot Commands
//!
//! - `dune help` - Display help information
//! - `dune roll <n> [threshold] [difficulty]` - Roll n d20
//! - `dune show [momentum|threat]` - Show the scene and counters
//! - `dune add|use <momentum|threat> [n]` - Change a counter
//! - `dune set <momentum|threat> <n>` - Set a counter
//! - `dune scene start <name>` / `dune scene end` - Scene lifecycle
//!
//! # Architecture
//!
//! - [`bot`] - Wiring of Matrix messages, commands and the reminder
//! - [`commands`] - Command parsing and execution
//! - [`config`] - YAML configuration with environment variable support
//! - [`dice`] - d20 rolls and success counting
//! - [`matrix`] - Matrix client integration and session management
//! - [`reminder`] - Periodic status reminder
//! - [`store`] - JSON key-value store
//! - [`tracker`] - Momentum, threat and scene rules
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod dice;
mod matrix;
mod reminder;
mod store;
mod tracker;

/// Command-line arguments for the bot.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Values can be overridden with `DUNE_` environment variables,
    /// e.g. `DUNE_MATRIX__PASSWORD`.
    #[arg(short, long)]
    config: PathBuf,

    /// Path to the directory for storing persistent data.
    ///
    /// This directory will contain:
    /// - `tracker.json` - Momentum, threat and scene
    /// - `session/` - Matrix session data (authentication tokens, encryption stores)
    ///
    /// The session data allows impersonating the bot; keep the directory private.
    #[arg(short, long)]
    data: PathBuf,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting dune-helper {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, &args.data).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:?}", e);
            return;
        }
    };
    bot.start().await;
}
