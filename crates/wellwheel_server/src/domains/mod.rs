//! Route handlers grouped by area.
//!
//! - [`videos`] - curated channel search and uploads browsing
//! - [`tips`] - the daily smart tip with a product call-to-action
//! - [`scores`] - questionnaire and vision submissions, day listing and reset
//! - [`dashboard`] - wheel layout, SVG, history report and question catalog

pub mod dashboard;
pub mod scores;
pub mod tips;
pub mod videos;

use std::str::FromStr;

use axum::body::Bytes;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use wellwheel_core::Topic;

use crate::error::ApiError;

/// Decode a JSON body; an empty body yields `T::default()`.
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

/// `YYYY-MM-DD`, or `default` when absent or blank.
pub(crate) fn parse_day(raw: Option<&str>, default: NaiveDate) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("invalid day: {s}"))),
    }
}

/// Topic from a path segment: display name (`Nutrition & Diet`) or anchor (`nutrition-diet`).
pub(crate) fn parse_topic(raw: &str) -> Result<Topic, ApiError> {
    Topic::from_str(raw)
        .or_else(|err| {
            let wanted = raw.trim().to_ascii_lowercase();
            Topic::ALL
                .into_iter()
                .find(|t| t.anchor() == wanted)
                .ok_or(err)
        })
        .map_err(ApiError::from)
}
