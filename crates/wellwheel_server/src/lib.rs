//! HTTP server for the wellness wheel.
//!
//! [`router`] wires the routes onto a shared [`AppState`]; [`app`] adds the
//! transport layers (CORS, timeout, body limit) used in production. Upstream
//! clients and the score store are injected through the state, so tests can
//! drive the same router against mocks.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, MatchedPath, Request, State};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Router, debug_handler};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

pub mod auth;
pub mod config;
pub mod domains;
pub mod error;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::{AppState, Clock};

use domains::{dashboard, scores, tips, videos};

#[debug_handler]
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("metrics recorder not installed".into()))?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], handle.render()).into_response())
}

async fn track_requests(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().to_string();
    let resp = next.run(req).await;
    let status = resp.status().as_u16().to_string();
    metrics::counter!(
        "wellwheel_requests_total",
        "route" => route,
        "method" => method,
        "status" => status
    )
    .increment(1);
    resp
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/edu-search", post(videos::edu_search))
        .route(
            "/api/youtube-search",
            post(videos::uploads_search).options(videos::preflight),
        )
        .route("/api/smart-tip", post(tips::smart_tip))
        .route(
            "/api/scores",
            get(scores::list_scores).delete(scores::reset_scores),
        )
        .route("/api/scores/{topic}", post(scores::submit_topic))
        .route("/api/vision", post(scores::submit_vision))
        .route("/api/days", get(scores::filled_days))
        .route("/api/wheel", get(dashboard::wheel))
        .route("/api/wheel.svg", get(dashboard::wheel_svg))
        .route("/api/report", get(dashboard::report))
        .route("/api/questions/{topic}", get(dashboard::questions))
        .route_layer(middleware::from_fn(track_requests))
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, AUTHORIZATION])
}

/// The router with the production transport layers applied.
pub fn app(state: Arc<AppState>, config: &ServerConfig) -> Router {
    router(state)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(cors())
}
