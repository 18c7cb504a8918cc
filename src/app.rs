/// Router builder
///
/// Assembles the request pipeline around an externally supplied API router:
/// JSON body parsing (axum extractors), static asset fallback, CORS
/// enforcement, and request tracing.
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. CORS (tower-http CorsLayer) - short-circuits every OPTIONS request
/// 2. Logging (tower-http TraceLayer)
/// 3. API routes, falling back to static files under `public/`
///
/// # Example
///
/// ```no_run
/// use matrix_sql_server::{app::build_router, config::ServerConfig, routes};
///
/// let config = ServerConfig::from_env();
/// let app = build_router(&config, routes::router());
/// ```

use crate::config::ServerConfig;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Builds the CORS layer from the configured origin allow-list.
///
/// A matching `Origin` header is echoed back in
/// `access-control-allow-origin`; anything else gets no such header and the
/// browser enforces same-origin. Requests are never rejected at this layer.
/// Every OPTIONS request is answered with 200 and an empty body without
/// reaching a route handler.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Builds the complete Axum router
///
/// `api_routes` is supplied by the caller; everything the router does not
/// match falls back to static assets under `public/`.
pub fn build_router(config: &ServerConfig, api_routes: Router) -> Router {
    Router::new()
        .merge(api_routes)
        .fallback_service(ServeDir::new("public"))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(config))
}
