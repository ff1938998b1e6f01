//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::sink::SinkKind;

/// pingpong - two worker loops taking turns over async channels
#[derive(Parser)]
#[command(
    name = "pp",
    about = "Play a bounded game of ping/pong between two worker loops",
    version,
    after_help = "Logs are written to: ~/.local/share/pingpong/logs/pingpong.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run one game
    Play {
        /// Rounds each side plays (overrides config)
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,

        /// Where to write the lines: console or log (overrides config)
        #[arg(short, long)]
        sink: Option<SinkKind>,
    },

    /// Print the effective configuration as YAML
    Config,
}
