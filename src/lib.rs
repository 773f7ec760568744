pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod todos;

pub use error::AppError;
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// The full HTTP application over `state`, with request tracing.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
