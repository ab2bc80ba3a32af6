use crate::hierarchy::DEFAULT_ORG_NAME;
use clap::Parser;
use std::time::Duration;

/// Settings for the chart server. Every flag can also come from the
/// environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Serve a live org chart built from a published roster CSV")]
pub struct ServerConfig {
    /// Roster CSV location: an http(s) URL or a local file path
    #[arg(long, env = "ORGCHART_SOURCE")]
    pub source: String,

    /// Seconds between roster refreshes
    #[arg(
        long,
        env = "ORGCHART_INTERVAL_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Timeout for a single roster request, in seconds
    #[arg(
        long,
        env = "ORGCHART_TIMEOUT_SECS",
        default_value_t = 20,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Address the HTTP server listens on
    #[arg(long, env = "ORGCHART_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Organisation name shown on the root card
    #[arg(long, env = "ORGCHART_ORG_NAME", default_value = DEFAULT_ORG_NAME)]
    pub org_name: String,
}

impl ServerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
