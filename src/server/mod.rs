//! HTTP entry point.
//!
//! Thin axum layer over the shared [`Orchestrator`]: every request uses the
//! same provider and generator instances, and no per-request state outlives
//! the request.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::core::Orchestrator;

pub use handlers::{GenerateRequest, PostCommentRequest, PostDetail, PostsQuery};

/// Upper bound for a whole request, generation included
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default and maximum number of posts listed per channel
pub const DEFAULT_POSTS_LIMIT: usize = 3;
pub const MAX_POSTS_LIMIT: usize = 25;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Build the router with CORS for `cors_origin` and a request timeout
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let app = Router::new()
        .route("/", get(handlers::handle_root))
        .route("/posts/{channel}", get(handlers::handle_posts))
        .route("/post/{id}", get(handlers::handle_post))
        .route("/tones", get(handlers::handle_tones))
        .route("/generate-comment", post(handlers::handle_generate))
        .route("/post-comment", post(handlers::handle_post_comment))
        .route("/health", get(handlers::handle_health))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ));

    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true),
        ),
        Err(_) => {
            warn!(cors_origin, "Invalid CORS origin, cross-origin requests disabled");
            app
        }
    }
}

/// Bind `address` and serve until the process is stopped
pub async fn run_server(
    orchestrator: Arc<Orchestrator>,
    address: &str,
    cors_origin: &str,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(
        address,
        provider = orchestrator.provider_name(),
        generator = orchestrator.generator_name(),
        can_post = orchestrator.can_write(),
        "Reddit Comment Generator API listening"
    );

    let app = build_router(AppState { orchestrator }, cors_origin);
    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
