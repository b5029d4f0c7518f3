//! Health report: score history averaged per day, month or year.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::topic::FUNCTIONAL_FOOD_MAX_POINTS;
use crate::{CoreError, Topic, WellnessScoreRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Month,
    Year,
}

impl GroupBy {
    /// First day of the bucket containing `day`.
    pub fn bucket_start(&self, day: NaiveDate) -> NaiveDate {
        let start = match self {
            GroupBy::Day => Some(day),
            GroupBy::Month => day.with_day(1),
            GroupBy::Year => NaiveDate::from_ymd_opt(day.year(), 1, 1),
        };
        start.unwrap_or(day)
    }

    pub fn key(&self, day: NaiveDate) -> String {
        match self {
            GroupBy::Day => day.format("%Y-%m-%d").to_string(),
            GroupBy::Month => day.format("%Y-%m").to_string(),
            GroupBy::Year => day.year().to_string(),
        }
    }

    /// Human label: `Mar 4`, `March 2025`, `2025`.
    pub fn label(&self, day: NaiveDate) -> String {
        match self {
            GroupBy::Day => day.format("%b %-d").to_string(),
            GroupBy::Month => day.format("%B %Y").to_string(),
            GroupBy::Year => day.year().to_string(),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupBy::Day => "day",
            GroupBy::Month => "month",
            GroupBy::Year => "year",
        })
    }
}

impl FromStr for GroupBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(GroupBy::Day),
            "month" => Ok(GroupBy::Month),
            "year" => Ok(GroupBy::Year),
            _ => Err(CoreError::UnknownGrouping(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    pub value: f64,
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Value a record contributes to the chart: points for Functional Food,
/// the clamped score otherwise.
pub fn chart_value(topic: Topic, record: &WellnessScoreRecord) -> f64 {
    if topic == Topic::FunctionalFood {
        record
            .raw_points
            .unwrap_or_else(|| (record.score * FUNCTIONAL_FOOD_MAX_POINTS).round())
            .clamp(0.0, FUNCTIONAL_FOOD_MAX_POINTS)
    } else {
        record.score.clamp(0.0, 1.0)
    }
}

/// Per-topic averages, one point per bucket in chronological order. Every
/// topic is present, possibly with an empty series.
pub fn topic_series(records: &[WellnessScoreRecord], group_by: GroupBy) -> BTreeMap<Topic, Vec<SeriesPoint>> {
    let mut buckets: BTreeMap<Topic, BTreeMap<NaiveDate, Mean>> =
        Topic::ALL.iter().map(|&t| (t, BTreeMap::new())).collect();
    for r in records {
        let Some(topic) = Topic::from_name(&r.topic) else {
            continue;
        };
        let start = group_by.bucket_start(r.day);
        buckets
            .entry(topic)
            .or_default()
            .entry(start)
            .or_default()
            .push(chart_value(topic, r));
    }
    buckets
        .into_iter()
        .map(|(topic, by_start)| {
            let points = by_start
                .into_iter()
                .filter_map(|(start, mean)| {
                    Some(SeriesPoint {
                        key: group_by.key(start),
                        label: group_by.label(start),
                        start,
                        value: mean.value()?,
                    })
                })
                .collect();
            (topic, points)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionCategory {
    Overall,
    Prescription,
    Acuity,
    Osdi,
}

impl VisionCategory {
    pub const ALL: [VisionCategory; 4] = [
        VisionCategory::Overall,
        VisionCategory::Prescription,
        VisionCategory::Acuity,
        VisionCategory::Osdi,
    ];

    /// Topic names stored for this category, current name first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            VisionCategory::Overall => &["Vision Wellness", "Vision Wellness: Overall"],
            VisionCategory::Prescription => &["Vision Wellness: Prescription", "Vision Rx", "Prescription"],
            VisionCategory::Acuity => &["Vision Wellness: Acuity", "Visual Acuity", "Acuity"],
            VisionCategory::Osdi => &["Vision Wellness: OSDI", "OSDI", "Dry Eye OSDI"],
        }
    }

    pub fn for_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.aliases().contains(&topic))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VisionValues {
    pub overall: Option<f64>,
    pub prescription: Option<f64>,
    pub acuity: Option<f64>,
    pub osdi: Option<f64>,
}

impl VisionValues {
    fn slot(&mut self, cat: VisionCategory) -> &mut Option<f64> {
        match cat {
            VisionCategory::Overall => &mut self.overall,
            VisionCategory::Prescription => &mut self.prescription,
            VisionCategory::Acuity => &mut self.acuity,
            VisionCategory::Osdi => &mut self.osdi,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisionPoint {
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    pub values: VisionValues,
}

/// Vision sub-score averages per bucket; buckets with no vision rows are omitted.
pub fn vision_series(records: &[WellnessScoreRecord], group_by: GroupBy) -> Vec<VisionPoint> {
    let mut buckets: BTreeMap<NaiveDate, BTreeMap<VisionCategory, Mean>> = BTreeMap::new();
    for r in records {
        let Some(cat) = VisionCategory::for_topic(&r.topic) else {
            continue;
        };
        buckets
            .entry(group_by.bucket_start(r.day))
            .or_default()
            .entry(cat)
            .or_default()
            .push(r.score.clamp(0.0, 1.0));
    }
    buckets
        .into_iter()
        .map(|(start, cats)| {
            let mut values = VisionValues::default();
            for (cat, mean) in cats {
                *values.slot(cat) = mean.value();
            }
            VisionPoint {
                key: group_by.key(start),
                label: group_by.label(start),
                start,
                values,
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthReport {
    pub group_by: GroupBy,
    pub topics: BTreeMap<Topic, Vec<SeriesPoint>>,
    pub vision: Vec<VisionPoint>,
}

impl HealthReport {
    pub fn build(records: &[WellnessScoreRecord], group_by: GroupBy) -> Self {
        Self {
            group_by,
            topics: topic_series(records, group_by),
            vision: vision_series(records, group_by),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(day: NaiveDate, topic: &str, score: f64, raw: Option<f64>) -> WellnessScoreRecord {
        WellnessScoreRecord {
            user_id: "u1".into(),
            day,
            topic: topic.into(),
            score,
            raw_points: raw,
            max_points: raw.map(|_| 400.0),
        }
    }

    #[test]
    fn group_by_parses_and_labels() {
        assert_eq!("Month".parse::<GroupBy>().unwrap(), GroupBy::Month);
        assert!(matches!("week".parse::<GroupBy>(), Err(CoreError::UnknownGrouping(_))));
        let day = d(2025, 3, 4);
        assert_eq!(GroupBy::Day.label(day), "Mar 4");
        assert_eq!(GroupBy::Month.key(day), "2025-03");
        assert_eq!(GroupBy::Month.label(day), "March 2025");
        assert_eq!(GroupBy::Year.bucket_start(day), d(2025, 1, 1));
    }

    #[test]
    fn only_exact_topic_names_are_charted() {
        let rows = vec![
            rec(d(2025, 3, 1), "Sleep", 0.8, None),
            rec(d(2025, 3, 1), "sleep", 0.0, None),
            rec(d(2025, 3, 1), "READING", 0.5, None),
        ];
        let series = topic_series(&rows, GroupBy::Day);
        assert_eq!(series[&Topic::Sleep].len(), 1);
        assert_eq!(series[&Topic::Sleep][0].value, 0.8);
        assert!(series[&Topic::Reading].is_empty());
    }

    #[test]
    fn monthly_average_clamps_scores() {
        let rows = vec![
            rec(d(2025, 3, 1), "Sleep", 0.2, None),
            rec(d(2025, 3, 20), "Sleep", 1.4, None),
            rec(d(2025, 2, 10), "Sleep", 0.5, None),
        ];
        let series = topic_series(&rows, GroupBy::Month);
        let sleep = &series[&Topic::Sleep];
        assert_eq!(sleep.len(), 2);
        assert_eq!(sleep[0].key, "2025-02");
        assert_eq!(sleep[1].value, 0.6);
        assert!(series[&Topic::Reading].is_empty());
        assert_eq!(series.len(), 11);
    }

    #[test]
    fn functional_food_averages_points() {
        let rows = vec![
            rec(d(2025, 3, 1), "Functional Food", 0.5, Some(200.0)),
            rec(d(2025, 3, 1), "Functional Food", 0.25, None),
            rec(d(2025, 3, 1), "Functional Food", 0.0, Some(900.0)),
        ];
        let series = topic_series(&rows, GroupBy::Day);
        assert_eq!(series[&Topic::FunctionalFood][0].value, (200.0 + 100.0 + 400.0) / 3.0);
    }

    #[test]
    fn vision_series_merges_aliases() {
        let rows = vec![
            rec(d(2024, 6, 1), "Vision Wellness", 0.6, None),
            rec(d(2024, 7, 1), "Vision Wellness: Overall", 0.8, None),
            rec(d(2024, 7, 1), "Visual Acuity", 0.5, None),
            rec(d(2024, 7, 2), "Sleep", 0.9, None),
        ];
        let series = vision_series(&rows, GroupBy::Year);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].key, "2024");
        assert!((series[0].values.overall.unwrap() - 0.7).abs() < 1e-12);
        assert_eq!(series[0].values.acuity, Some(0.5));
        assert_eq!(series[0].values.osdi, None);
    }

    #[test]
    fn report_serializes_topic_keys_by_name() {
        let report = HealthReport::build(&[rec(d(2025, 1, 1), "Nutrition & Diet", 0.3, None)], GroupBy::Day);
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["group_by"], "day");
        assert_eq!(v["topics"]["Nutrition & Diet"][0]["key"], "2025-01-01");
    }
}
