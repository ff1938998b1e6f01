//! pingpong - CLI entry point

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use pingpong::cli::{Cli, Command};
use pingpong::config::Config;
use pingpong::play::Coordinator;
use pingpong::sink::SinkKind;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pingpong")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file so stdout carries only play output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("pingpong.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "pingpong loaded config: max_iterations={}, sink={}",
        config.play.max_iterations, config.output.sink
    );

    match cli.command {
        Some(Command::Play { max_iterations, sink }) => cmd_play(config, max_iterations, sink).await,
        Some(Command::Config) => cmd_config(&config),
        None => cmd_play(config, None, None).await,
    }
}

/// Run one game with CLI overrides applied on top of the config
async fn cmd_play(mut config: Config, max_iterations: Option<u32>, sink: Option<SinkKind>) -> Result<()> {
    if let Some(n) = max_iterations {
        config.play.max_iterations = n;
    }
    let sink_kind = sink.unwrap_or(config.output.sink);

    let coordinator = Coordinator::new(config.play);
    let started = Instant::now();
    coordinator.run(sink_kind.build()).await.context("Play failed")?;

    if sink_kind == SinkKind::Console {
        eprintln!(
            "{} {} rounds each in {:?}",
            "✓".green(),
            coordinator.config().max_iterations.to_string().cyan(),
            started.elapsed()
        );
    }
    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
