#![doc = include_str!("../README.md")]

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::config::{AppConfig, CliArgs};
use flake58::Generator;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    cli::telemetry::init_telemetry()?;
    log_startup_info(&config);

    let generator =
        Generator::new(config.settings()).context("failed to build the id generator")?;
    tracing::debug!(machine_id = generator.machine_id(), "generator ready");

    let stdout = std::io::stdout();
    cli::commands::run(&config, &generator, &mut stdout.lock())
}

fn log_startup_info(config: &AppConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("running with full config: {:#?}", config);
    } else {
        tracing::debug!(
            start_ms = config.start_time.as_millis() as u64,
            "running with machine id {}",
            config.machine_id
        );
    }
}
