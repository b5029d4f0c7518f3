//! Read-only views: the wheel, its SVG rendering, the history report and the
//! question catalog.

use std::sync::Arc;

use axum::debug_handler;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use wellwheel_client::AuthUser;
use wellwheel_core::report::{GroupBy, HealthReport};
use wellwheel_core::wheel::{DEFAULT_SIZE, render_svg};
use wellwheel_core::{Question, Topic, WheelLayout, layout_wheel, questions_for, scores_by_topic};

use crate::auth::Authed;
use crate::domains::{parse_day, parse_topic};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const MIN_SIZE: f64 = 100.0;
const MAX_SIZE: f64 = 2000.0;

#[derive(Debug, Default, Deserialize)]
pub struct WheelQuery {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub group_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionSet {
    pub topic: Topic,
    pub questions: &'static [Question],
}

fn parse_size(raw: Option<&str>) -> ApiResult<f64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_SIZE);
    };
    match raw.parse::<f64>() {
        Ok(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => Ok(size),
        _ => Err(ApiError::BadRequest(format!(
            "size must be a number between {MIN_SIZE} and {MAX_SIZE}"
        ))),
    }
}

async fn day_layout(state: &AppState, user: &AuthUser, q: &WheelQuery) -> ApiResult<WheelLayout> {
    let size = parse_size(q.size.as_deref())?;
    let day = parse_day(q.day.as_deref(), state.today())?;
    let records = state
        .store
        .scores_for_day(user, day)
        .await
        .map_err(ApiError::store)?;
    Ok(layout_wheel(&scores_by_topic(&records), size))
}

#[debug_handler]
pub async fn wheel(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    Query(q): Query<WheelQuery>,
) -> ApiResult<Json<WheelLayout>> {
    Ok(Json(day_layout(&state, &user, &q).await?))
}

#[debug_handler]
pub async fn wheel_svg(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    Query(q): Query<WheelQuery>,
) -> ApiResult<Response> {
    let layout = day_layout(&state, &user, &q).await?;
    Ok(([(CONTENT_TYPE, "image/svg+xml")], render_svg(&layout)).into_response())
}

#[debug_handler]
pub async fn report(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Json<HealthReport>> {
    let group_by = match q.group_by.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<GroupBy>()?,
        None => GroupBy::default(),
    };
    let records = state.store.all_scores(&user).await.map_err(ApiError::store)?;
    tracing::debug!(%group_by, rows = records.len(), "building report");
    Ok(Json(HealthReport::build(&records, group_by)))
}

/// The questionnaire for a topic. Public; Vision Wellness has none.
#[debug_handler]
pub async fn questions(Path(topic): Path<String>) -> ApiResult<Json<QuestionSet>> {
    let topic = parse_topic(&topic)?;
    Ok(Json(QuestionSet {
        topic,
        questions: questions_for(topic),
    }))
}
