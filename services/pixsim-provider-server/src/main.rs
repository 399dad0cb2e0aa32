//! Provider server binary.
//!
//! ```bash
//! # Defaults: port 8080, webhooks to http://localhost:8081/webhooks/pix
//! pixsim-provider-server
//!
//! # Deterministic behavior for demos
//! FAILURE_MODE=off pixsim-provider-server
//!
//! # Crank the faults
//! P_DUPLICATE_EVENT=0.5 P_OUT_OF_ORDER_EVENT=0.5 pixsim-provider-server
//! ```

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pixsim_provider::{create_router, AppState, HttpWebhookDispatcher};

use crate::config::ProviderConfig;

/// pixsim mock provider node
#[derive(Parser, Debug)]
#[command(name = "pixsim-provider-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    init_logging(&args.log_level);

    let mut config = ProviderConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }

    let dispatcher = Arc::new(HttpWebhookDispatcher::new(config.webhook_url.clone()));
    let state = Arc::new(AppState::new(config.faults.clone(), dispatcher));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        port = config.port,
        webhook_url = %config.webhook_url,
        failure_mode = ?config.faults.failure_mode,
        "provider listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}
