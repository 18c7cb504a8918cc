/// Built-in API route handlers
///
/// The server treats the API router as a pluggable collaborator; this module
/// provides the routes the binary mounts by default.

pub mod health;

use axum::{routing::get, Router};

/// Builds the default API router.
pub fn router() -> Router {
    Router::new().route("/health", get(health::health_check))
}
