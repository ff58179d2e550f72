//! HTTP route handlers and router assembly.
//!
//! - `characters`: CRUD, search and filter endpoints for character records
//! - `uploads`: image upload, retrieval and deletion
//! - `health`: liveness, readiness, metrics and version
//! - `extract`: extractors that report rejections through `AppError`

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    security_headers::security_headers_middleware,
    validation::{validate_request_middleware, BodyCeiling},
};
use crate::state::AppState;

pub mod characters;
pub mod extract;
pub mod health;
pub mod uploads;

/// Body limit for JSON endpoints.
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// Builds the full application router with all middleware applied.
pub fn router(state: AppState) -> Router {
    // Uploads may carry up to twice the file limit so that oversized images
    // reach the asset validator and get a 400 instead of a transport error.
    let upload_limit = usize::try_from(state.assets.max_file_bytes())
        .unwrap_or(usize::MAX)
        .saturating_mul(2);
    let ceiling = BodyCeiling(upload_limit as u64);
    let cfg = state.config.clone();
    let cors_permissive = state.config.server.cors_permissive;

    let app = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route(
            "/characters",
            get(characters::list_characters).post(characters::create_character),
        )
        .route("/characters/search", get(characters::search_characters))
        .route("/characters/filter", get(characters::filter_characters))
        .route("/characters/affiliation/{affiliation}", get(characters::characters_by_affiliation))
        .route("/characters/status/{status}", get(characters::characters_by_status))
        .route("/characters/exists/{name}", get(characters::character_exists))
        .route(
            "/characters/{id}",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route(
            "/uploads/image",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/uploads/image/{filename}",
            get(uploads::get_image).delete(uploads::delete_image),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(from_fn_with_state(ceiling, validate_request_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg, security_headers_middleware));

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

