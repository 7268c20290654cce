use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use roster::users::UserStore;
use roster::{Config, Server, app, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    telemetry::init(config.log_format);

    info!(environment = ?config.environment, "starting");
    let router = app::build(Arc::new(UserStore::seeded()), config.environment);

    match Server::bind(config.addr).serve(router).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
