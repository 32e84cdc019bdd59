use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::search::GistSearcher;

pub mod handlers;
pub mod models;

pub fn create_router(searcher: Arc<GistSearcher>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ping", get(handlers::ping_handler))
        .route("/api/v1/search", post(handlers::search_handler))
        .route("/api/v1/search/stream", post(handlers::search_stream_handler))
        .with_state(searcher)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
