//! Timer Keeper - categorized countdown timers with a completion history
//!
//! This is the main entry point for the timer-keeper server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use timer_keeper::{
    api::create_router,
    config::Config,
    engine::TimerEngine,
    services::FileStore,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_keeper={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-keeper server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_dir={}",
        config.host,
        config.port,
        config.data_dir.display()
    );

    let store = FileStore::open(&config.data_dir).await?;
    let engine = TimerEngine::load(Arc::new(store)).await?;

    // Log completions as they happen
    let mut completions = engine.completions();
    tokio::spawn(async move {
        while let Ok(entry) = completions.recv().await {
            info!("Completed '{}' at {}", entry.name, entry.completed_at);
        }
    });

    let state = Arc::new(AppState::new(engine.clone(), config.port, config.host.clone()));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timers                - List timers");
    info!("  POST /timers                - Create a timer");
    info!("  GET  /timers/grouped        - Timers grouped by category");
    info!("  POST /timers/:id/<action>   - start | pause | resume | reset");
    info!("  POST /timers/<action>-all   - start-all | pause-all | reset-all");
    info!("  GET  /history               - Completed timers");
    info!("  GET  /status                - Server status");
    info!("  GET  /health                - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Keep the progress of running timers for the next start
    if let Err(e) = engine.shutdown().await {
        tracing::error!("Failed to persist timers on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
