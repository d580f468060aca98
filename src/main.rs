//! Credential-injecting request gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                   GATEWAY                    │
//!   Client Request      │  ┌────────┐   ┌─────────┐   ┌─────────────┐  │
//!   ────────────────────┼─▶│  cors  │──▶│ routing │──▶│    relay    │──┼──▶ Query service
//!                       │  │ + trace│   │ v1/ ... │   │ + credential│  │    or BFF
//!                       │  └────────┘   └────┬────┘   └──────┬──────┘  │
//!   Client Response     │                    │ no match      │         │
//!   ◀───────────────────┼──── 404 ◀──────────┘   body / 5xx ◀┘         │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use auth_gateway::config::{env, load_config_with, load_dotenv};
use auth_gateway::observability::init_logging;
use auth_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "auth-gateway", version)]
#[command(about = "Routes requests to the query service or BFF with injected credentials", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides GATEWAY_BIND_ADDRESS and the file
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level, overrides GATEWAY_LOG_LEVEL and the file
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = load_dotenv() {
        eprintln!("auth-gateway: {}", e);
        std::process::exit(1);
    }

    let cli = Cli::parse();

    let lookup = |key: &str| {
        let flag = match key {
            env::BIND_ADDRESS => cli.bind.clone(),
            env::LOG_LEVEL => cli.log_level.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    };

    let config = match load_config_with(cli.config.as_deref(), lookup) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("auth-gateway: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    tracing::info!("auth-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        query_url = %config.upstreams.query.base_url,
        bff_url = %config.upstreams.bff.base_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        response_mode = ?config.relay.response_mode,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(&config)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
