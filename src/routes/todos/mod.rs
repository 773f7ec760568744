pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(routes::create).get(routes::list))
        .route("/filter", get(routes::filter))
        .route("/stats", get(routes::stats))
        .route(
            "/{id}",
            get(routes::get)
                .put(routes::update)
                .delete(routes::delete),
        )
}
