//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Shortspace - URL shortener with per-owner code namespaces
#[derive(Parser, Debug)]
#[command(name = "shortspace")]
#[command(version)]
#[command(about = "URL shortener with per-owner code namespaces", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Write a sample configuration file
    Generate {
        /// Output path
        #[arg(default_value = "config.example.toml")]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
