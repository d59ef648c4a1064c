//! Campus command-line entry point
//!
//! Usage: `campus [CONFIG]`. Without an argument the file named by
//! `CAMPUS_CONFIG` is used, and without that the defaults.

use anyhow::Context;
use campus_app::{init_logging, App, AppConfig};
use std::env;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let path = env::args().nth(1).or_else(|| env::var("CAMPUS_CONFIG").ok());
    let config = match &path {
        Some(path) => AppConfig::from_file(path).with_context(|| format!("Failed to load {}", path))?,
        None => AppConfig::default(),
    };

    init_logging(&config.logging);

    let app = App::from_config(&config).context("Failed to initialise campus")?;
    for schema in app.registry().schemas() {
        info!(rel_type = %schema.rel_type(), "Relationship type available");
    }
    println!("{}", app.metrics_summary());
    Ok(())
}
