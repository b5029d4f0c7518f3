//! Score submission, listing and the per-day reset.

use std::sync::Arc;

use axum::body::Bytes;
use axum::debug_handler;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wellwheel_core::topic::score_catalog_topic;
use wellwheel_core::vision::{
    AcuityTest, OSDI_QUESTIONS, Prescription, VisionScores, decode_spoken_letters,
    line_to_decimal, osdi_score, score_prescription,
};
use wellwheel_core::{AnswerSet, Topic, WellnessScoreRecord};

use crate::auth::Authed;
use crate::domains::{parse_body, parse_day, parse_topic};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    #[serde(default)]
    pub day: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswersRequest {
    #[serde(default)]
    pub day: Option<String>,
    /// Question id to answer. Numbers and booleans are accepted as their text.
    #[serde(default)]
    pub answers: serde_json::Map<String, Value>,
}

impl AnswersRequest {
    pub fn answer_set(&self) -> AnswerSet {
        self.answers
            .iter()
            .filter_map(|(id, v)| {
                let raw = match v {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((id.clone(), raw))
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AcuityInput {
    /// One reading per chart line from the top; `null` skips the line.
    #[serde(default)]
    pub readings: Vec<Option<String>>,
    /// Readings are speech transcripts ("alpha bravo ...") rather than letters.
    #[serde(default)]
    pub spoken: bool,
    /// Best passed line label, for tests run entirely on the client.
    #[serde(default)]
    pub best_line: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct AcuitySummary {
    pub best_line: Option<&'static str>,
    pub letters_correct: usize,
    pub letters_total: usize,
    pub log: Vec<String>,
}

impl AcuityInput {
    /// Decimal acuity plus what the chart walk recorded.
    pub fn evaluate(&self) -> (f64, AcuitySummary) {
        if self.readings.is_empty() {
            let score = self.best_line.as_deref().map(line_to_decimal).unwrap_or(0.0);
            return (score, AcuitySummary::default());
        }
        let mut test = AcuityTest::new();
        for reading in &self.readings {
            match reading {
                None => test.skip_line(),
                Some(text) if self.spoken => {
                    test.submit(&decode_spoken_letters(text));
                }
                Some(text) => {
                    test.submit(text);
                }
            }
        }
        let (letters_correct, letters_total) = test.letters();
        let summary = AcuitySummary {
            best_line: test.best_line().map(|l| l.label),
            letters_correct,
            letters_total,
            log: test.log().to_vec(),
        };
        (test.score(), summary)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VisionRequest {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub prescription: Prescription,
    #[serde(default)]
    pub acuity: AcuityInput,
    /// Twelve OSDI answers on the 1-8 scale; `null` for unanswered.
    #[serde(default)]
    pub osdi: Vec<Option<u8>>,
}

impl VisionRequest {
    fn check_osdi_len(&self) -> ApiResult<()> {
        if self.osdi.len() > OSDI_QUESTIONS.len() {
            return Err(ApiError::BadRequest(format!(
                "osdi takes at most {} answers, got {}",
                OSDI_QUESTIONS.len(),
                self.osdi.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct VisionResponse {
    pub day: NaiveDate,
    pub scores: VisionScores,
    pub acuity: AcuitySummary,
    pub records: Vec<WellnessScoreRecord>,
}

#[derive(Debug, Serialize)]
pub struct DayScores {
    pub day: NaiveDate,
    pub records: Vec<WellnessScoreRecord>,
}

#[derive(Debug, Serialize)]
pub struct FilledDays {
    pub days: Vec<NaiveDate>,
}

/// Submission day: defaults to today, never in the future.
fn submission_day(raw: Option<&str>, today: NaiveDate) -> ApiResult<NaiveDate> {
    let day = parse_day(raw, today)?;
    if day > today {
        return Err(ApiError::BadRequest(format!("day {day} is in the future")));
    }
    Ok(day)
}

#[debug_handler]
pub async fn submit_topic(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
    body: Bytes,
) -> ApiResult<Json<WellnessScoreRecord>> {
    let topic = parse_topic(&topic)?;
    if topic == Topic::VisionWellness {
        return Err(ApiError::BadRequest(
            "Vision Wellness is scored through /api/vision".into(),
        ));
    }
    let req: AnswersRequest = parse_body(&body)?;
    let day = submission_day(req.day.as_deref(), state.today())?;

    let scored = score_catalog_topic(topic, &req.answer_set());
    let record = WellnessScoreRecord::from_topic_score(user.id.clone(), day, &scored);
    state
        .store
        .upsert_score(&user, &record)
        .await
        .map_err(ApiError::store)?;
    metrics::counter!("wellwheel_scores_saved_total", "topic" => topic.as_str()).increment(1);
    tracing::info!(%topic, %day, score = record.score, "score saved");
    Ok(Json(record))
}

#[debug_handler]
pub async fn submit_vision(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<VisionResponse>> {
    let req: VisionRequest = parse_body(&body)?;
    req.check_osdi_len()?;
    let day = submission_day(req.day.as_deref(), state.today())?;

    let (acuity, summary) = req.acuity.evaluate();
    let scores = VisionScores::new(
        score_prescription(&req.prescription),
        acuity,
        osdi_score(&req.osdi),
    );

    let mut records = Vec::with_capacity(4);
    for (topic, score) in scores.rows() {
        let record = WellnessScoreRecord {
            user_id: user.id.clone(),
            day,
            topic: topic.to_string(),
            score,
            raw_points: None,
            max_points: None,
        };
        state
            .store
            .upsert_score(&user, &record)
            .await
            .map_err(ApiError::store)?;
        records.push(record);
    }
    metrics::counter!("wellwheel_scores_saved_total", "topic" => Topic::VisionWellness.as_str())
        .increment(1);
    tracing::info!(%day, overall = scores.overall, "vision scores saved");
    Ok(Json(VisionResponse {
        day,
        scores,
        acuity: summary,
        records,
    }))
}

#[debug_handler]
pub async fn list_scores(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> ApiResult<Json<DayScores>> {
    let day = parse_day(q.day.as_deref(), state.today())?;
    let records = state
        .store
        .scores_for_day(&user, day)
        .await
        .map_err(ApiError::store)?;
    Ok(Json(DayScores { day, records }))
}

/// Clears every score of a day. Only today may be reset.
#[debug_handler]
pub async fn reset_scores(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
    Query(q): Query<DayQuery>,
) -> ApiResult<StatusCode> {
    let today = state.today();
    let day = parse_day(q.day.as_deref(), today)?;
    if day != today {
        return Err(ApiError::BadRequest("Only today's scores can be reset".into()));
    }
    state
        .store
        .reset_day(&user, day)
        .await
        .map_err(ApiError::store)?;
    tracing::info!(%day, "day reset");
    Ok(StatusCode::NO_CONTENT)
}

#[debug_handler]
pub async fn filled_days(
    Authed(user): Authed,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<FilledDays>> {
    let days = state
        .store
        .filled_days(&user)
        .await
        .map_err(ApiError::store)?;
    Ok(Json(FilledDays { days }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_accept_numbers_and_skip_nulls() {
        let req: AnswersRequest = serde_json::from_str(
            r#"{"answers":{"sleep_hours":7.5,"caffeine":"2","note":null,"alarm":true}}"#,
        )
        .unwrap();
        let set = req.answer_set();
        assert_eq!(set.get("sleep_hours").map(String::as_str), Some("7.5"));
        assert_eq!(set.get("caffeine").map(String::as_str), Some("2"));
        assert_eq!(set.get("alarm").map(String::as_str), Some("true"));
        assert!(!set.contains_key("note"));
    }

    #[test]
    fn acuity_walks_the_chart() {
        let input = AcuityInput {
            readings: vec![Some("EKA".into()), Some("CZHS".into()), None, Some("x".into())],
            ..Default::default()
        };
        let (score, summary) = input.evaluate();
        assert_eq!(summary.best_line, Some("20/125"));
        assert!((score - 20.0 / 125.0).abs() < 1e-9);
        assert_eq!(summary.log.len(), 3);
    }

    #[test]
    fn acuity_accepts_spoken_readings() {
        let input = AcuityInput {
            readings: vec![Some("echo kilo alpha".into())],
            spoken: true,
            ..Default::default()
        };
        assert_eq!(input.evaluate().1.best_line, Some("20/160"));
    }

    #[test]
    fn acuity_falls_back_to_reported_line() {
        let input = AcuityInput {
            best_line: Some("20/20".into()),
            ..Default::default()
        };
        assert_eq!(input.evaluate().0, 1.0);
        assert_eq!(AcuityInput::default().evaluate().0, 0.0);
    }

    #[test]
    fn osdi_answers_are_capped_at_the_questionnaire() {
        let full = VisionRequest {
            osdi: vec![Some(1); 12],
            ..Default::default()
        };
        assert!(full.check_osdi_len().is_ok());
        let extra = VisionRequest {
            osdi: vec![Some(1); 13],
            ..Default::default()
        };
        assert!(matches!(extra.check_osdi_len(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn future_days_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert!(submission_day(Some("2025-03-04"), today).is_err());
        assert_eq!(submission_day(Some("2025-03-01"), today).unwrap().to_string(), "2025-03-01");
    }
}
