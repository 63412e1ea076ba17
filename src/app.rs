use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers;
use crate::state::AppState;

/// Build the full router: service endpoints plus the message resource at /messages
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Message resource
        .nest("/messages", handlers::messages::routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    // Global middleware
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
