//! `mychain`: offline companion tool for the MyChain client.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mychain_client::{init_logging, ClientConfig, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "mychain", version, about = "MyChain client tool")]
pub(crate) struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true, env = "MYCHAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value.
    #[arg(long, global = true, env = "MYCHAIN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "MYCHAIN_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let format = cli.log_format.unwrap_or(config.log_format);
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(format, level).context("installing log subscriber")?;
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let output = commands::run(cli.command, &config)?;
    println!("{output}");
    Ok(())
}
