//! API Routes
//!
//! Configures the Axum router with all books endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_book_handler, health_handler, list_books_handler, update_book_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_handler))
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route("/books/:id", put(update_book_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
