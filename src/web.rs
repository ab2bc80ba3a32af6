#![cfg(not(tarpaulin_include))]

use clap::Parser;
use orgchart::app;
use orgchart::config::ServerConfig;

/// Main entry point for the org chart web server
///
/// Reads its settings from flags or `ORGCHART_*` environment variables,
/// starts the periodic roster refresh and serves the chart on the
/// configured address. Log verbosity follows `RUST_LOG` (default `info`).
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    app::run(config).await
}
