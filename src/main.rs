mod cli;
mod clipboard;
mod config;
mod entry_filter;
mod error;
mod extractor;
mod navigator;
mod tui;
mod workflow;

use anyhow::{Context, Result};
use clap::Parser;

/// Logs go to the file named by `PASS_PROMPT_LOG`, never to the terminal the TUI draws on.
fn init_logging() -> Result<()> {
    let Ok(log_file) = std::env::var("PASS_PROMPT_LOG") else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file))?;

    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(log::LevelFilter::Debug)
        .init();

    log::info!("pass-prompt starting up");
    Ok(())
}

fn main() -> Result<()> {
    // Handle daemon mode first. This should stay in main.rs as it's an early exit.
    if clipboard::check_and_run_daemon_if_requested()? {
        return Ok(());
    }

    init_logging()?;
    let cli_args = cli::Cli::parse();
    let config = config::AppConfig::from_cli(cli_args)?;

    workflow::run_pass_prompt(config)
}
