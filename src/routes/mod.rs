use axum::{routing::get, Router};

mod health;
mod todos;

pub use health::health;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", Router::new().nest("/todos", todos::router()))
}

async fn root() -> &'static str {
    "Welcome to the todo API written in Rust"
}
