use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cabinet_core::{
    create_authenticator, load_config, validate_config, Authenticator, Catalog, LaunchGateway,
    LaunchStore, SqliteLaunchStore, SshGateway,
};
use cabinet_server::api::create_router;
use cabinet_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("cabinet {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("CABINET_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        "Configuration loaded successfully (hash {})",
        &config_hash[..16]
    );
    info!("Auth method: {:?}", config.auth.method);
    info!("Database path: {:?}", config.database.path);

    // Create authenticator
    let authenticator: Arc<dyn Authenticator> = Arc::from(
        create_authenticator(&config.auth).context("Failed to create authenticator")?,
    );
    info!("Using authenticator: {}", authenticator.method_name());

    // Load the game catalog; a bad record aborts startup
    let catalog = Arc::new(
        Catalog::load(&config.catalog.path)
            .with_context(|| format!("Failed to load catalog from {:?}", config.catalog.path))?,
    );

    // Create SQLite launch history
    let launch_store: Arc<dyn LaunchStore> = Arc::new(
        SqliteLaunchStore::new(&config.database.path)
            .context("Failed to create launch store")?,
    );
    info!("Launch store initialized");

    // Create gateway if a game server is configured
    let gateway: Option<Arc<dyn LaunchGateway>> = match &config.game_server {
        Some(server) => {
            info!(
                "Game server at {} ({} display clients)",
                server.host,
                config.game_clients.len()
            );
            let gateway = SshGateway::new(server.clone(), config.game_clients.clone());
            info!(
                "Launch gateway: {} (timeout {}s)",
                gateway.name(),
                server.timeout_secs
            );
            Some(Arc::new(gateway))
        }
        None => {
            info!("No game server configured, launch control disabled");
            None
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        authenticator,
        catalog,
        gateway,
        launch_store,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shut down");

    Ok(())
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
