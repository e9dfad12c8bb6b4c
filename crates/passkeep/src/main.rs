// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passkeep - a Telegram bot that generates, encrypts and stores passwords.
//!
//! This is the binary entry point.

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use passkeep_config::PasskeepConfig;

/// Passkeep - a Telegram password keeper.
#[derive(Parser, Debug)]
#[command(name = "passkeep", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Validate the configuration and print the effective values.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => passkeep_config::load_and_validate_path(path),
        None => passkeep_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            passkeep_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match render_config(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("passkeep: use --help for available commands");
        }
    }
}

/// Renders the effective configuration as TOML with the bot token masked.
fn render_config(config: &PasskeepConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.telegram.bot_token.is_some() {
        shown.telegram.bot_token = Some("********".to_string());
    }
    toml::to_string_pretty(&shown)
}
