// src/main.rs

use eduspace::config::Config;
use eduspace::routes;
use eduspace::state::AppState;
use eduspace::store::kv::{FileStore, KeyValueStore, MemoryStore, UnavailableStore};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let medium = open_medium(&config);
    let state = AppState::new(config.clone(), medium);

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

/// Picks the notification medium. A data directory that cannot be opened
/// leaves notifications without storage rather than stopping the service.
fn open_medium(config: &Config) -> Arc<dyn KeyValueStore> {
    match &config.data_dir {
        Some(dir) => match FileStore::open(dir) {
            Ok(store) => {
                tracing::info!("Notifications persisted under {}", dir.display());
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("Failed to open data dir {}: {}; notifications will not be stored", dir.display(), e);
                Arc::new(UnavailableStore)
            }
        },
        None => {
            tracing::info!("DATA_DIR not set; notifications kept in memory");
            Arc::new(MemoryStore::new())
        }
    }
}
