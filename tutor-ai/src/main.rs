//! tutor-ai - Adaptive tutoring microservice
//!
//! Serves `POST /learn`, `GET /preview-images/:term` and `GET /health`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tutor_common::api::generate_shared_secret;

use tutor_ai::config::{CliOverrides, ServiceConfig, TomlConfig};
use tutor_ai::{build_router, AppState};

/// Command-line arguments for tutor-ai
#[derive(Parser, Debug)]
#[command(name = "tutor-ai")]
#[command(about = "Adaptive tutoring content service")]
#[command(version)]
struct Args {
    /// Path to tutor-ai.toml
    #[arg(short, long, env = "TUTOR_AI_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Print a fresh shared secret for the config file and exit
    #[arg(long)]
    generate_secret: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_secret {
        println!("{}", generate_shared_secret());
        return Ok(());
    }

    // Config is read before tracing starts so its log level can seed the
    // filter; RUST_LOG still wins.
    let toml = TomlConfig::load(args.config.as_deref());
    let level = toml
        .as_ref()
        .map(|t| t.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tutor_ai={level},tutor_common={level},tower_http=info").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tutor-ai v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let toml = toml.context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(
        toml,
        CliOverrides {
            host: args.host,
            port: args.port,
        },
    )
    .context("Invalid configuration")?;

    info!("Environment: {}", config.environment);
    if config.shared_secret == 0 {
        warn!("API authentication disabled (shared_secret = 0)");
    } else {
        info!("API authentication enabled");
    }

    let state = AppState::from_config(&config).context("Failed to build service clients")?;
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("tutor-ai listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
