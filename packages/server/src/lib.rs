pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod photo;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::Json;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Photo Service API",
        version = "1.0.0",
        description = "CRUD API for photo metadata and the image files stored alongside it"
    ),
    tags(
        (name = "Photos", description = "Photo CRUD operations"),
        (name = "Images", description = "Stored image files"),
        (name = "Health", description = "Service health"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::api_routes())
        .split_for_parts();

    let cors = build_cors_layer(&state.config.server.cors);
    let body_limit = handlers::photo::upload_body_limit(state.config.storage.max_upload_size);
    let spec = api.clone();

    router
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let spec = spec.clone();
                async move { Json(spec) }
            }),
        )
        .merge(Scalar::with_url("/scalar", api))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Build the CORS layer from configuration. Origins that are not valid
/// header values are skipped with a warning.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}': {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}
