//! smartrent-pe - Price Estimator microservice
//!
//! **Module Identity:**
//! - Name: smartrent-pe (Price Estimator)
//! - Default port: 5780
//!
//! Estimates monthly rent for a property posted by the landlord form. The
//! external scoring service is tried first and the local formula answers
//! whenever it fails.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use smartrent_common::config::{resolve_config, ConfigOverrides};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartrent_pe::services::Estimator;
use smartrent_pe::{build_router, AppState};

/// Command-line arguments for smartrent-pe
#[derive(Parser, Debug)]
#[command(name = "smartrent-pe")]
#[command(about = "Rent price estimator microservice for SmartRent")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/smartrent/smartrent-pe.toml)
    #[arg(short, long, env = "SMARTRENT_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind to
    #[arg(long)]
    bind_address: Option<String>,

    /// External scoring service endpoint
    #[arg(long)]
    external_api_url: Option<String>,

    /// Timeout for the external scoring call, in milliseconds
    #[arg(long)]
    external_api_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            bind_address: self.bind_address.clone(),
            log_level: self.log_level.clone(),
            external_api_url: self.external_api_url.clone(),
            external_api_timeout_ms: self.external_api_timeout_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolution itself does not log; its outcome is reported below once
    // the subscriber exists
    let resolved = resolve_config(args.config.as_deref(), &args.overrides())
        .context("Failed to resolve configuration")?;
    let config = resolved.config;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting SmartRent Price Estimator (smartrent-pe) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    resolved.source.log();

    let estimator = Estimator::new(&config.external_api)
        .context("Failed to initialize scoring client")?;
    info!(
        "Scoring service: {} (timeout {:?})",
        config.external_api.url,
        config.external_api.timeout()
    );

    let state = AppState::new(estimator);
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Port 0 binds an ephemeral port; report the one actually taken
    let bound = listener
        .local_addr()
        .with_context(|| format!("Failed to read bound address for {}", addr))?;
    info!("smartrent-pe listening on http://{}", bound);
    info!("Health check: http://{}/health", bound);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
