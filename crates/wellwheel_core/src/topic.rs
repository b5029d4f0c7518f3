//! Topic scorer: a questionnaire answer set to one normalized score.

use serde::Serialize;

use crate::normalize::{parse_number, score_choice, score_free_text, score_numeric};
use crate::questions::{Question, QuestionKind, questions_for};
use crate::{AnswerSet, Topic};

/// Maximum Functional Food points.
pub const FUNCTIONAL_FOOD_MAX_POINTS: f64 = 400.0;
/// Weekly servings of two products taken at the top recommended intensity.
pub const FUNCTIONAL_FOOD_WEEKLY_CEILING: f64 = 56.0;
/// How many of the highest weekly product totals count towards the score.
pub const FUNCTIONAL_FOOD_COUNTED_PRODUCTS: usize = 2;

/// (servings per day, days per week) answer ids for each tracked product.
pub const FUNCTIONAL_FOOD_PRODUCTS: [(&str, &str); 5] = [
    ("ff_servings_sightc", "ff_frequency_days_sightc"),
    ("ff_servings_blueberry", "ff_frequency_days_blueberry"),
    ("ff_servings_adaptogenx", "ff_frequency_days_adaptogenx"),
    ("ff_servings_superfood", "ff_frequency_days_superfood"),
    ("ff_servings_veggiecookies", "ff_frequency_days_veggiecookies"),
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopicScore {
    pub topic: Topic,
    pub score: f64,
    pub raw_points: Option<f64>,
    pub max_points: Option<f64>,
}

/// Score a single answer by its question's variant. Blank answers score 0.
pub fn score_answer(question: &Question, raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    match &question.kind {
        QuestionKind::Numeric => score_numeric(&question.id, raw),
        QuestionKind::Choice { options } => score_choice(raw, options),
        QuestionKind::FreeText => score_free_text(raw),
    }
}

/// Arithmetic mean of the per-question scores; unanswered questions count as 0.
pub fn average_score(questions: &[Question], answers: &AnswerSet) -> f64 {
    if questions.is_empty() {
        return 0.0;
    }
    let sum: f64 = questions
        .iter()
        .map(|q| score_answer(q, answers.get(&q.id).map(String::as_str).unwrap_or("")))
        .sum();
    (sum / questions.len() as f64).clamp(0.0, 1.0)
}

fn answer_number(answers: &AnswerSet, id: &str) -> f64 {
    answers
        .get(id)
        .and_then(|raw| parse_number(raw))
        .unwrap_or(0.0)
}

/// Functional Food points in `[0, 400]`: the two highest weekly product totals
/// against a ceiling of 56.
pub fn functional_food_points(answers: &AnswerSet) -> f64 {
    let mut totals: Vec<f64> = FUNCTIONAL_FOOD_PRODUCTS
        .iter()
        .map(|(servings_id, days_id)| {
            let servings = answer_number(answers, servings_id).max(0.0);
            let days = answer_number(answers, days_id).clamp(0.0, 7.0);
            servings * days
        })
        .collect();
    totals.sort_by(|a, b| b.total_cmp(a));
    let top: f64 = totals
        .iter()
        .take(FUNCTIONAL_FOOD_COUNTED_PRODUCTS)
        .sum();
    let ratio = (top / FUNCTIONAL_FOOD_WEEKLY_CEILING).min(1.0);
    ratio * FUNCTIONAL_FOOD_MAX_POINTS
}

/// Score a topic against an explicit question set.
pub fn score_topic(topic: Topic, questions: &[Question], answers: &AnswerSet) -> TopicScore {
    if topic == Topic::FunctionalFood {
        let points = functional_food_points(answers);
        return TopicScore {
            topic,
            score: points / FUNCTIONAL_FOOD_MAX_POINTS,
            raw_points: Some(points),
            max_points: Some(FUNCTIONAL_FOOD_MAX_POINTS),
        };
    }
    TopicScore {
        topic,
        score: average_score(questions, answers),
        raw_points: None,
        max_points: None,
    }
}

/// Score a topic against its catalog question set.
pub fn score_catalog_topic(topic: Topic, answers: &AnswerSet) -> TopicScore {
    score_topic(topic, questions_for(topic), answers)
}
