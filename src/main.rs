//! osmi-gateway
//!
//! HTTP/JSON front door for the Osmi RPC service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ CORS ─▶ validation gate ─▶ router ─▶ payload gate
//!                                                                            │
//!                                                                            ▼
//!     Client Response                                                 rpc client (tonic)
//!     ◀────────────── error envelope / JSON reply ◀── status translator ◀────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use osmi_gateway::config::load_config;
use osmi_gateway::lifecycle::{shutdown_signal, startup};
use osmi_gateway::observability::{logging, metrics};
use osmi_gateway::{GatewayError, GatewayServer};

#[derive(Debug, Parser)]
#[command(name = "osmi-gateway", version, about = "HTTP-to-RPC gateway for the Osmi service")]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration, print the route table and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "osmi-gateway starting");

    let server = GatewayServer::new(config)?;

    if args.check {
        for line in startup::describe_routes(server.routes(), &server.config().backend.service) {
            println!("{line}");
        }
        return Ok(());
    }

    let observability = &server.config().observability;
    if observability.metrics_enabled {
        let addr: SocketAddr =
            observability
                .metrics_address
                .parse()
                .map_err(|_| GatewayError::Address {
                    field: "observability.metrics_address",
                    value: observability.metrics_address.clone(),
                })?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    startup::log_startup(listener.local_addr()?, server.config(), server.routes());

    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
