use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))

        // Translation
        .route("/translate-text", post(handlers::translate_text))
        .route("/translate-batch", post(handlers::translate_batch))

        // Uploads are size-checked while streaming in the handler
        .route(
            "/speech-translate",
            post(handlers::speech_translate).layer(DefaultBodyLimit::disable()),
        )

        // Generated audio
        .route("/audio/:filename", get(handlers::get_audio))
}

/// Full application with middleware, ready to serve
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
