//! Evolution API proxy.
//!
//! Forwards every request under the mount prefix to a single upstream API,
//! injecting the `apikey` credential.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                 EVOLUTION PROXY               │
//!     Client Request      │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!     ────────────────────┼─▶│  http    │──▶│ security │──▶│   proxy   │──┼──▶ Upstream
//!                         │  │ server   │   │ cors/ips │   │ forwarder │  │     API
//!     Client Response     │  └──────────┘   └──────────┘   └─────┬─────┘  │
//!     ◀───────────────────┼───────────── buffered relay ◀────────┘        │
//!                         │                                               │
//!                         │  config · observability · lifecycle · health  │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use evolution_proxy::http::HttpServer;
use evolution_proxy::lifecycle::startup::warn_on_risky_settings;
use evolution_proxy::lifecycle::{resolve_config, ConfigOverrides, Shutdown};
use evolution_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "evolution-proxy")]
#[command(about = "Reverse proxy that injects the Evolution API key", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address or port (overrides API_PORT)
    #[arg(short, long)]
    bind: Option<String>,

    /// Upstream base URL (overrides EVOLUTION_API_URL)
    #[arg(short, long)]
    upstream_url: Option<String>,

    /// Log level (overrides PROXY_LOG_LEVEL)
    #[arg(short, long)]
    log_level: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            config_path: cli.config,
            bind_address: cli.bind,
            upstream_url: cli.upstream_url,
            log_level: cli.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let overrides = ConfigOverrides::from(Cli::parse());
    let config = match resolve_config(&overrides, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability.log_level);

    tracing::info!("evolution-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        mount_prefix = %config.upstream.mount_prefix,
        "Configuration loaded"
    );
    warn_on_risky_settings(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        shutdown.trigger_on_signal().await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
