//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for tinylink using clap's derive macros.

use clap::{Parser, Subcommand};

/// tinylink - A small URL shortener service
#[derive(Parser, Debug)]
#[command(name = "tinylink")]
#[command(version)]
#[command(about = "A small URL shortener service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml, optional)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: print to stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}
