//! Process configuration, from flags or the environment.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// Deployment flavour.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Environment {
    /// Serves the OpenAPI document and puts internal error text in
    /// get-by-id `500` bodies.
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line configuration. Every flag has an environment fallback.
///
/// ```rust
/// use clap::Parser;
/// use roster::Config;
///
/// let config = Config::parse_from(["roster", "--environment", "development"]);
/// assert!(config.environment.is_development());
/// ```
#[derive(Clone, Debug, Parser)]
#[command(name = "roster", version, about = "User management HTTP service")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "ROSTER_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    #[arg(long, env = "ROSTER_ENV", value_enum, default_value_t = Environment::Production)]
    pub environment: Environment,

    /// Log line format. The level filter comes from `RUST_LOG`.
    #[arg(long, env = "ROSTER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
