mod api;
mod cli;
mod commands;
mod config;
mod error;
mod inventory;
mod output;

use clap::Parser;
use cli::Cli;
use config::Config;
use error::{InventoryError, Result};
use output::print_error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries the inventory document
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path().ok_or_else(|| {
            InventoryError::Configuration("no config path given and no config directory found".to_string())
        })?,
    };
    Config::load(&path)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(&cli).and_then(|config| commands::run(&cli, &config));

    if let Err(e) = result {
        debug!(error = ?e, "inventory run failed");
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
