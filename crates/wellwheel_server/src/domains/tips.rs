//! Daily smart tip. The chat upstream is best-effort: any failure, or no chat
//! key at all, answers 200 with the canned tip.

use std::sync::Arc;

use axum::body::Bytes;
use axum::debug_handler;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};
use wellwheel_client::{AuthUser, ChatRequest};
use wellwheel_core::WellnessScoreRecord;
use wellwheel_core::products::{SmartTip, tip_prompt};

use crate::auth::Authed;
use crate::domains::{parse_body, parse_day};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TipRequest {
    #[serde(default)]
    pub day: Option<String>,
    /// Overrides the stored profile when present.
    #[serde(default)]
    pub profile: Option<Value>,
}

/// `{"Sleep": 0.5, ...}` for the prompt.
pub fn scores_json(records: &[WellnessScoreRecord]) -> Value {
    let map: Map<String, Value> = records
        .iter()
        .map(|r| (r.topic.clone(), Value::from(r.score)))
        .collect();
    Value::Object(map)
}

async fn stored_profile(state: &AppState, user: &AuthUser) -> Value {
    match state.store.profile(user).await {
        Ok(Some(profile)) => serde_json::to_value(profile).unwrap_or(Value::Null),
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::warn!(error = %e, "profile unavailable for tip prompt");
            Value::Null
        }
    }
}

fn fallback(reason: &'static str) -> SmartTip {
    metrics::counter!("wellwheel_tip_fallbacks_total", "reason" => reason).increment(1);
    SmartTip::fallback()
}

#[debug_handler]
pub async fn smart_tip(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SmartTip>> {
    let req: TipRequest = parse_body(&body)?;
    let day = parse_day(req.day.as_deref(), state.today())?;

    let Some(chat) = state.chat.as_ref() else {
        tracing::info!("no chat key configured; serving canned tip");
        return Ok(Json(fallback("unconfigured")));
    };

    let records = state
        .store
        .scores_for_day(&user, day)
        .await
        .map_err(ApiError::store)?;
    let profile = match req.profile {
        Some(p) => p,
        None => stored_profile(&state, &user).await,
    };
    let prompt = tip_prompt(&profile, &scores_json(&records));

    let tip = match chat.complete(&ChatRequest::smart_tip(&state.model, prompt)).await {
        Ok(content) => SmartTip::from_completion(content.as_deref()),
        Err(e) => {
            tracing::warn!(error = %e, "chat completion failed; serving canned tip");
            fallback("upstream")
        }
    };
    tracing::info!(%day, scores = records.len(), product = %tip.product.label, "smart tip");
    Ok(Json(tip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn scores_json_maps_topic_to_score() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let rec = |topic: &str, score| WellnessScoreRecord {
            user_id: "u".into(),
            day,
            topic: topic.into(),
            score,
            raw_points: None,
            max_points: None,
        };
        let v = scores_json(&[rec("Sleep", 0.5), rec("Reading", 1.0)]);
        assert_eq!(v["Sleep"], 0.5);
        assert_eq!(v["Reading"], 1.0);
    }

    #[test]
    fn request_fields_are_optional() {
        let req: TipRequest = serde_json::from_str("{}").unwrap();
        assert!(req.day.is_none() && req.profile.is_none());
    }
}
