use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use cacher::{KvStore, MemoryStore, RedisConfig, RedisStore};

use todo_api::config::{AppConfig, CacheDriver, is_production};
use todo_api::repository::InMemoryTodoRepository;
use todo_api::routes::create_router;
use todo_api::state::AppState;

#[tokio::main]
async fn main() {
    if !is_production() && dotenvy::dotenv().is_err() {
        eprintln!("no .env file found, using process environment");
    }

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_api=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(?config.cache_driver, port = config.port, "starting todo-api");

    let store: Box<dyn KvStore> = match config.cache_driver {
        CacheDriver::Redis => Box::new(RedisStore::new(RedisConfig::from_env())),
        CacheDriver::Memory => Box::new(MemoryStore::new()),
    };

    let state = AppState::new(store, Arc::new(InMemoryTodoRepository::new()));
    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    if let Err(err) = cache.close().await {
        warn!(error = %err, "failed to close cache connection");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received sigterm, shutting down"),
    }
}
