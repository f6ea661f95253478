//! Runs the taskgate HTTP service.
//!
//! Usage:
//!
//! ```text
//! taskgate [--config <path>] [--bind <address>]
//! ```
//!
//! Settings come from the optional TOML file, then `TASKGATE_*` environment
//! variables, then command-line flags.

use clap::Parser;
use eyre::WrapErr;
use std::path::PathBuf;
use taskgate::{app, config::AppConfig, http, telemetry};
use tokio::net::TcpListener;
use tracing::info;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "taskgate", version, about = "Authenticated task creation service")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding configuration.
    #[arg(short, long, value_name = "ADDRESS")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).wrap_err("loading configuration")?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }

    telemetry::init_tracing(&config.log_level, config.log_format)?;

    let state = app::build_state(&config)
        .await
        .wrap_err("building service state")?;
    let address = config.socket_addr()?;
    let listener = TcpListener::bind(address)
        .await
        .wrap_err_with(|| format!("binding {address}"))?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting taskgate");
    http::serve(listener, http::router(state))
        .await
        .wrap_err("serving HTTP")?;
    info!("taskgate stopped");
    Ok(())
}
