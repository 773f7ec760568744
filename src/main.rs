use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_api::config::Config;
use todo_api::state::AppState;
use todo_api::store::{InMemoryTodoStore, PgTodoStore, TodoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn TodoStore> = match &config.database_url {
        Some(url) => {
            let store = PgTodoStore::connect(url, config.max_connections).await?;
            store.migrate().await?;
            info!("Connected to PostgreSQL, migrations applied");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, todos are kept in memory and lost on restart");
            Arc::new(InMemoryTodoStore::new())
        }
    };

    let state = AppState::new(store);

    let app = todo_api::app(state).layer(cors_layer(config.cors_allow_origin.as_deref())?);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    info!("server is chilling at http://{}", config.addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(match origin {
        Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
        None => layer.allow_origin(Any),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
