//! # Items Server
//!
//! Standalone HTTP server for the items service.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration (in-memory store on 127.0.0.1:3000)
//! cargo run --bin items-server
//!
//! # Run with specific environment
//! ITEMS_ENV=production cargo run --bin items-server
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use todo_items::config::ConfigManager;
use todo_items::logging;
use todo_items::session::MemorySessionStore;
use todo_items::web::{create_app, state::AppState};

/// How often expired sessions are swept from memory
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Parser, Debug)]
#[command(name = "items-server")]
#[command(about = "Serve the per-user to-do items API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration directory (default: config/items)
    #[arg(short, long, env = "ITEMS_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Environment to load (development, test, production)
    #[arg(short, long)]
    environment: Option<String>,

    /// Override the configured bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);
    let manager = ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &environment)
        .context("Failed to load configuration")?;

    let mut config = manager.config().clone();
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
        config.validate().context("Invalid --bind address")?;
    }

    logging::init_structured_logging(&config.logging, manager.environment());

    info!("🚀 Starting Items Server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!("   Environment: {}", manager.environment());
    info!(
        "   Config Directory: {}",
        manager.config_directory().display()
    );

    if config.session.accounts.is_empty() {
        warn!("No sign-in accounts configured - nobody can sign in through the form");
    } else {
        info!("   Sign-in Accounts: {}", config.session.accounts.len());
    }

    let sessions = Arc::new(MemorySessionStore::new(config.session.ttl()));
    spawn_session_purge(Arc::clone(&sessions));

    let bind_address = config.server.bind_address.clone();
    let state = AppState::build(config, sessions)
        .await
        .context("Failed to initialize application state")?;

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    info!("🎉 Items Server listening on {}", bind_address);
    info!("   Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("👋 Items Server shutdown complete");

    Ok(())
}

fn spawn_session_purge(sessions: Arc<MemorySessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                info!(purged = purged, "Purged expired sessions");
            }
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
            Ok(mut stream) => {
                stream.recv().await;
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
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }

    info!("🛑 Shutdown signal received, initiating graceful shutdown...");
}
