// --- File: crates/stayreal_notifier/src/routes.rs ---

use crate::handlers::{
    banner_handler, health_handler, register_device_handler, register_without_segments_handler,
    RegistrationState,
};
use axum::{routing::get, Router};
use std::sync::Arc;

/// Creates the router of the registration listener.
///
/// The registration path is matched as a wildcard so that a request with
/// missing segments gets a 400 from the handler instead of a 404.
pub fn routes(state: Arc<RegistrationState>) -> Router {
    Router::new()
        .route("/", get(banner_handler))
        .route("/health", get(health_handler))
        .route("/register", get(register_without_segments_handler))
        .route("/register/", get(register_without_segments_handler))
        .route("/register/{*rest}", get(register_device_handler))
        // legacy path of the first iOS builds
        .route("/ios/register", get(register_without_segments_handler))
        .route("/ios/register/", get(register_without_segments_handler))
        .route("/ios/register/{*rest}", get(register_device_handler))
        .with_state(state)
}
