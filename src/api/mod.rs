//! HTTP surface over [`WriteEngine`].

use std::path::Path;

use anyhow::{Context, Result};
use axum::{
    http::{header::HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::engine::WriteEngine;

pub mod error;
pub mod routes;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub engine: WriteEngine,
}

/// API routes only, no middleware. Used directly by tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/register-new-company", post(routes::register_company))
        .route("/branches", post(routes::setup_branch))
        .route("/business-sections", post(routes::setup_section))
        .route("/navigation", post(routes::setup_navigation))
        .route(
            "/companies/:company_id/industrial-sectors",
            post(routes::reconcile_sectors),
        )
        .route(
            "/companies/:company_id/industrial-sectors/report",
            post(routes::reconcile_sectors_report),
        )
        .route(
            "/companies/:company_id/industrial-sectors/attach",
            post(routes::attach_sectors),
        )
        .with_state(state)
}

/// Full application: API routes, static files, tracing and CORS.
pub fn build_app(state: AppState, config: &ServerConfig) -> Result<Router> {
    let static_dir = Path::new(&config.static_dir);
    let static_files = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("error.html")));

    Ok(build_router(state).fallback_service(static_files).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors_origin)?),
    ))
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods([
        Method::GET,
        Method::HEAD,
        Method::PUT,
        Method::PATCH,
        Method::POST,
        Method::DELETE,
    ]);

    if origin.trim() == "*" {
        return Ok(layer.allow_origin(Any).allow_headers(Any));
    }

    let origins = origin
        .split(',')
        .map(|o| {
            HeaderValue::from_str(o.trim()).with_context(|| format!("invalid CORS origin {o:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer
        .allow_origin(origins)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
