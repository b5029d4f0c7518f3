//! Pure scoring, ranking and layout logic for the wellness wheel.
//!
//! Nothing in this crate performs I/O; every function is deterministic and can
//! be called from any runtime without synchronisation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod normalize;
pub mod products;
pub mod questions;
pub mod ranking;
pub mod report;
pub mod topic;
pub mod vision;
pub mod wheel;

pub use normalize::MetricPolicy;
pub use questions::{Question, QuestionKind, questions_for};
pub use ranking::{SearchResultItem, SeenIds, VideoItem, rank};
pub use topic::{TopicScore, score_topic};
pub use wheel::{WheelLayout, layout_wheel};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("unknown grouping: {0}")]
    UnknownGrouping(String),
}

/// Raw questionnaire answers keyed by question id.
pub type AnswerSet = HashMap<String, String>;

/// The eleven fixed wellness categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "Outdoor")]
    Outdoor,
    #[serde(rename = "Indoor Lighting")]
    IndoorLighting,
    #[serde(rename = "Reading")]
    Reading,
    #[serde(rename = "Medical History")]
    MedicalHistory,
    #[serde(rename = "General Health")]
    GeneralHealth,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Functional Food")]
    FunctionalFood,
    #[serde(rename = "Sleep")]
    Sleep,
    #[serde(rename = "Nutrition & Diet")]
    NutritionDiet,
    #[serde(rename = "Sports")]
    Sports,
    #[serde(rename = "Vision Wellness")]
    VisionWellness,
}

impl Topic {
    pub const ALL: [Topic; 11] = [
        Topic::Outdoor,
        Topic::IndoorLighting,
        Topic::Reading,
        Topic::MedicalHistory,
        Topic::GeneralHealth,
        Topic::MentalHealth,
        Topic::FunctionalFood,
        Topic::Sleep,
        Topic::NutritionDiet,
        Topic::Sports,
        Topic::VisionWellness,
    ];

    /// Wedge order around the wheel, clockwise from twelve o'clock.
    /// Vision Wellness is drawn as the centre disc instead of a wedge.
    pub const WHEEL_ORDER: [Topic; 10] = [
        Topic::Outdoor,
        Topic::IndoorLighting,
        Topic::Reading,
        Topic::MedicalHistory,
        Topic::GeneralHealth,
        Topic::MentalHealth,
        Topic::FunctionalFood,
        Topic::Sleep,
        Topic::NutritionDiet,
        Topic::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Outdoor => "Outdoor",
            Topic::IndoorLighting => "Indoor Lighting",
            Topic::Reading => "Reading",
            Topic::MedicalHistory => "Medical History",
            Topic::GeneralHealth => "General Health",
            Topic::MentalHealth => "Mental Health",
            Topic::FunctionalFood => "Functional Food",
            Topic::Sleep => "Sleep",
            Topic::NutritionDiet => "Nutrition & Diet",
            Topic::Sports => "Sports",
            Topic::VisionWellness => "Vision Wellness",
        }
    }

    /// Exact display-name lookup for stored rows. Request paths go
    /// through `FromStr`, which is case-insensitive.
    pub fn from_name(name: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// URL fragment used by the report page, e.g. `nutrition-diet`.
    pub fn anchor(&self) -> String {
        let mut out = String::new();
        for c in self.as_str().chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
            } else if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
        out.trim_end_matches('-').to_string()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownTopic(s.to_string()))
    }
}

/// A persisted score row. One per (user, day, topic); writers replace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WellnessScoreRecord {
    #[serde(default)]
    pub user_id: String,
    pub day: NaiveDate,
    pub topic: String,
    pub score: f64,
    #[serde(default)]
    pub raw_points: Option<f64>,
    #[serde(default)]
    pub max_points: Option<f64>,
}

impl WellnessScoreRecord {
    pub fn from_topic_score(user_id: impl Into<String>, day: NaiveDate, ts: &TopicScore) -> Self {
        Self {
            user_id: user_id.into(),
            day,
            topic: ts.topic.as_str().to_string(),
            score: ts.score,
            raw_points: ts.raw_points,
            max_points: ts.max_points,
        }
    }
}

/// Latest score per known topic for a set of rows (typically one day).
pub fn scores_by_topic(records: &[WellnessScoreRecord]) -> HashMap<Topic, f64> {
    records
        .iter()
        .filter_map(|r| Topic::from_name(&r.topic).map(|t| (t, r.score)))
        .collect()
}
