//! hottrack-web - Melon chart browser
//!
//! Serves the chart listing, search, date archives, spreadsheet export and
//! composited cover images under `/hottrack/`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hottrack_common::config::TomlConfig;
use hottrack_web::cover::HttpCoverCompositor;
use hottrack_web::{build_router, db, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for hottrack-web
#[derive(Parser, Debug)]
#[command(name = "hottrack-web")]
#[command(about = "Melon chart browser with archives, export and cover images")]
#[command(version)]
struct Args {
    /// TOML configuration file (defaults to the OS config directory)
    #[arg(short, long, env = "HOTTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "HOTTRACK_PORT")]
    port: Option<u16>,

    /// Interface to bind (overrides config)
    #[arg(long, env = "HOTTRACK_BIND")]
    bind: Option<String>,

    /// SQLite database path (overrides config)
    #[arg(short, long, env = "HOTTRACK_DATABASE")]
    database: Option<PathBuf>,

    /// Honor debug-only request overrides such as `fake-today`
    #[arg(long, env = "HOTTRACK_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing exists so the file can pick the log level
    let config_result = TomlConfig::load_or_default(args.config.as_deref());
    let mut config = match &config_result {
        Ok(config) => config.clone(),
        Err(_) => TomlConfig::default(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "hottrack_web={level},hottrack_common={level},tower_http={level}",
                level = config.logging.level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting hottrack-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Err(e) = config_result {
        error!("Failed to load configuration: {}", e);
        return Err(e).context("Invalid configuration");
    }

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }
    config.debug |= args.debug;

    info!("Database path: {}", config.database_path.display());
    let pool = db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let font = match &config.cover.font_path {
        Some(path) => match HttpCoverCompositor::load_font(path) {
            Ok(font) => {
                info!("Cover caption font: {}", path.display());
                Some(font)
            }
            Err(e) => {
                warn!("Cover captions disabled: {}", e);
                None
            }
        },
        None => {
            info!("No cover font configured, covers render without captions");
            None
        }
    };
    let compositor = HttpCoverCompositor::new(
        Duration::from_secs(config.cover.fetch_timeout_secs),
        font,
    )
    .context("Failed to build cover compositor")?;

    if config.debug {
        warn!("Debug mode enabled: fake-today overrides are honored");
    }

    let state = AppState::new(pool, Arc::new(compositor), config.debug);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_addr, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("hottrack-web listening on http://{}/hottrack/", addr);
    info!("Health check: http://{}/health", addr);

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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
