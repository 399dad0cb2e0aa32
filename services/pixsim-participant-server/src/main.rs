//! Participant server binary.
//!
//! ```bash
//! # Defaults: port 8081, provider at http://localhost:8080
//! pixsim-participant-server
//!
//! # Environment overrides
//! PORT=9081 PROVIDER_URL=http://provider:8080 pixsim-participant-server
//! ```

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pixsim_participant::{create_router, AppState, HttpProviderGateway};

use crate::config::ParticipantConfig;

/// pixsim participant node
#[derive(Parser, Debug)]
#[command(name = "pixsim-participant-server")]
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

    let mut config = ParticipantConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }

    let gateway = Arc::new(HttpProviderGateway::new(config.provider_url.clone()));
    let state = Arc::new(AppState::new(gateway));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        port = config.port,
        provider_url = %config.provider_url,
        "participant listening"
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
