//! Router configuration
//!
//! `GET /health`, `GET /stats`, `GET /`, `POST /webhook`; every other GET
//! serves the info page and every other method gets a JSON 404. CORS is
//! permissive so browser-based tools can post test webhooks.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app_state::AppState;
use crate::handlers::{self, webhook::SECRET_HEADER};
use crate::middleware::request_logger_middleware;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info_page))
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .route("/webhook", post(handlers::receive_webhook))
        .fallback(handlers::fallback)
        .method_not_allowed_fallback(handlers::fallback)
        // Deliveries of any size are accepted.
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_logger_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(app_state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(SECRET_HEADER)])
}
