//! Static question catalog, one ordered set per questionnaire topic.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::Topic;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    #[serde(rename = "number")]
    Numeric,
    Choice {
        options: Vec<String>,
    },
    #[serde(rename = "text")]
    FreeText,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "text")]
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn numeric(id: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::Numeric,
        }
    }

    pub fn choice(id: &str, prompt: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        }
    }

    pub fn free_text(id: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            kind: QuestionKind::FreeText,
        }
    }
}

static CATALOG: LazyLock<HashMap<Topic, Vec<Question>>> = LazyLock::new(|| {
    HashMap::from([
        (Topic::Outdoor, outdoor()),
        (Topic::IndoorLighting, indoor_lighting()),
        (Topic::Reading, reading()),
        (Topic::MedicalHistory, medical_history()),
        (Topic::GeneralHealth, general_health()),
        (Topic::MentalHealth, mental_health()),
        (Topic::FunctionalFood, functional_food()),
        (Topic::Sleep, sleep()),
        (Topic::NutritionDiet, nutrition_diet()),
        (Topic::Sports, sports()),
    ])
});

/// Questions for a topic. Vision Wellness has no questionnaire and yields an empty slice.
pub fn questions_for(topic: Topic) -> &'static [Question] {
    CATALOG.get(&topic).map(Vec::as_slice).unwrap_or(&[])
}

fn outdoor() -> Vec<Question> {
    vec![
        Question::numeric("out_hours_day", "On average, how many hours per day do you spend outdoors?"),
        Question::numeric("out_lux", "What is the intensity of outdoor light you experience (Lux)? (3,000–5,000 Lux is healthy)"),
        Question::free_text("out_activity_type", "What type of outdoor activities do you engage in?"),
        Question::numeric("out_direct_sun_min", "How many minutes per day in direct sunlight without sunglasses?"),
        Question::choice(
            "out_nature_freq",
            "How often do you visit natural environments (parks, forests, beaches)?",
            &["Rarely", "1–2×/week", "3–4×/week", "5–6×/week", "Daily"],
        ),
        Question::numeric("out_green_min", "How many minutes per day do you spend in nature or green spaces?"),
        Question::numeric("out_fitness_per_week", "How many times per week do you do outdoor fitness (boot camps, nature-based classes)?"),
        Question::choice(
            "out_region",
            "Which geographic region are you in?",
            &["Tropical", "Temperate", "Polar", "Mediterranean", "Desert", "Subtropical", "Coastal"],
        ),
    ]
}

fn indoor_lighting() -> Vec<Question> {
    vec![
        Question::numeric("in_hours_artificial", "Average hours/day in indoor environments with artificial lighting"),
        Question::numeric("in_lux", "Indoor lighting intensity (Lux)? (3,000–5,000 Lux is healthy)"),
        Question::choice(
            "in_cct",
            "Color temperature of indoor lighting",
            &["Very warm", "Warm", "Neutral", "Slightly cool", "Cool", "Very cool", "Blue-rich"],
        ),
        Question::numeric("in_hours_natural", "Hours/day in indoor spaces with natural lighting (near windows/skylights)"),
        Question::numeric("in_screen_hours", "Hours/day using electronic devices with backlit screens"),
        Question::choice(
            "in_lighting_type",
            "Primary lighting type at home",
            &["LED", "Fluorescent", "Incandescent", "Halogen", "Mixed/Other"],
        ),
        Question::choice(
            "in_quality",
            "Overall indoor lighting quality",
            &["1 Very poor", "2", "3", "4", "5", "6", "7 Excellent"],
        ),
        Question::numeric("in_focused_tasks_week", "Times per week doing focused visual tasks under artificial lighting"),
    ]
}

fn reading() -> Vec<Question> {
    vec![
        Question::numeric("read_print_hours", "Hours/day reading printed materials (books, newspapers, magazines)"),
        Question::numeric("read_days_week", "Days/week you read for leisure or education"),
        Question::free_text("read_session_len", "Typical amount per reading session (pages/chapters or minutes)"),
        Question::choice(
            "read_light_quality",
            "Lighting while reading printed materials",
            &["1 Very dim", "2", "3", "4", "5", "6", "7 Very bright"],
        ),
        Question::choice(
            "read_contrast",
            "Text/background contrast while reading",
            &["1 Very low", "2", "3", "4", "5", "6", "7 Very high"],
        ),
        Question::numeric("read_electronic_minutes", "Minutes/day reading from backlit electronic devices"),
        Question::choice(
            "read_env_comfort",
            "Reading environment comfort (seating/temperature)",
            &["1 Very uncomfortable", "2", "3", "4", "5", "6", "7 Very comfortable"],
        ),
        Question::numeric("read_eye_fatigue_week", "Times per week you experience eye fatigue while reading"),
    ]
}

fn medical_history() -> Vec<Question> {
    vec![
        Question::numeric("mh_chronic_count", "How many chronic medical conditions have you been diagnosed with?"),
        Question::numeric("mh_hospitalizations_year", "Times hospitalized in the past year"),
        Question::numeric("mh_surgeries_lifetime", "Total surgeries in your lifetime"),
        Question::numeric("mh_rx_count", "How many prescription medications are you taking now?"),
        Question::numeric("mh_otc_count", "How many OTC meds or supplements do you use regularly?"),
        Question::numeric("mh_er_visits_year", "Emergency department visits in the past year"),
        Question::numeric("mh_specialist_year", "Specialist consultations in the past year"),
        Question::free_text("mh_treatments_year", "Medical treatments for specific conditions in the past year – list with dates if possible"),
        Question::numeric("mh_pregnancies", "How many pregnancies have you had? (leave 0 if not applicable)"),
        Question::numeric("mh_live_births", "How many live births have you had? (leave 0 if not applicable)"),
        Question::choice(
            "mh_menstruating",
            "Are you currently menstruating?",
            &["Yes", "No", "Menopause / Post-menopause", "Prefer not to say"],
        ),
    ]
}

fn general_health() -> Vec<Question> {
    vec![
        Question::numeric("gh_overall_1_10", "Overall health (1–10, 10 = excellent)"),
        Question::numeric("gh_mvpa_days", "Days/week with ≥30 minutes of moderate–vigorous activity"),
        Question::numeric("gh_stress_days", "Days/week you experience stress or anxiety symptoms"),
        Question::numeric("gh_depression_days", "Days/week you experience depression/low mood"),
        Question::numeric("gh_sleep_weekdays", "Typical hours/night of sleep on weekdays"),
        Question::numeric("gh_sleep_weekends", "Typical hours/night of sleep on weekends"),
        Question::numeric("gh_water_servings", "How many glasses of water or hydrating beverages per day?"),
        Question::numeric("gh_relax_freq", "Times/week you do relaxation or mindfulness practices"),
    ]
}

fn mental_health() -> Vec<Question> {
    vec![
        Question::numeric("mth_overall_1_10", "Overall mental well-being (1–10)"),
        Question::choice(
            "mth_stress_freq",
            "How often do you feel overwhelmed by stress?",
            &["Rarely", "Occasionally", "Often", "Almost always"],
        ),
        Question::numeric("mth_depression_days_month", "Days in the past month with depression symptoms"),
        Question::choice(
            "mth_anxiety_freq",
            "How frequently do you experience anxiety symptoms?",
            &["Rarely", "Occasionally", "Often", "Almost always"],
        ),
        Question::numeric("mth_sleep_hours", "How many hours of quality sleep do you typically get per night?"),
        Question::choice(
            "mth_relax_techniques",
            "How often do you do relaxation techniques (breathing/meditation)?",
            &["Rarely", "Occasionally", "Often", "Almost always"],
        ),
        Question::choice(
            "mth_accomplishment",
            "How often do you feel a sense of accomplishment?",
            &["Rarely", "Occasionally", "Often", "Almost always"],
        ),
        Question::choice(
            "mth_joy_activities",
            "How frequently do you do activities that bring you joy?",
            &["Rarely", "Occasionally", "Often", "Almost always"],
        ),
    ]
}

fn functional_food() -> Vec<Question> {
    vec![
        Question::numeric("ff_servings_sightc", "Average daily servings of SightC"),
        Question::numeric("ff_frequency_days_sightc", "How many days per week do you take SightC?"),
        Question::numeric("ff_servings_blueberry", "Average daily servings of Blueberry Gummies"),
        Question::numeric("ff_frequency_days_blueberry", "How many days per week do you take Blueberry Gummies?"),
        Question::numeric("ff_servings_adaptogenx", "Average daily servings of AdaptogenX"),
        Question::numeric("ff_frequency_days_adaptogenx", "How many days per week do you take AdaptogenX?"),
        Question::numeric("ff_servings_superfood", "Cups/day of Superfoods Wellness Tea"),
        Question::numeric("ff_frequency_days_superfood", "How many days per week do you take Superfood Wellness Blend?"),
        Question::numeric("ff_servings_veggiecookies", "Average daily servings of Veggie Cookies"),
        Question::numeric("ff_frequency_days_veggiecookies", "How many days per week do you eat Veggie Cookies?"),
        Question::numeric("ff_hair_pro_days_week", "Days/week you follow recommended serving size for products"),
        Question::numeric("ff_substitute_meals_week", "Times/week you substitute snacks/meals with functional foods"),
        Question::numeric("ff_repurchase_month", "Times/month you repurchase functional food products"),
        Question::free_text("ff_other", "Any other health foods, medications, or lifestyle medicine?"),
    ]
}

fn sleep() -> Vec<Question> {
    vec![
        Question::numeric("sleep_hours", "Average hours of sleep per night"),
        Question::numeric("sleep_diff_fall_week", "Times/week you have difficulty falling asleep"),
        Question::numeric("sleep_wake_midnight_week", "Times/week you wake during the night and can’t return to sleep"),
        Question::numeric("sleep_early_wake_week", "Times/week you wake earlier than desired and cannot fall back asleep"),
        Question::choice(
            "sleep_quality",
            "Overall sleep quality",
            &["1 Very poor", "2", "3", "4", "5", "6", "7 Excellent"],
        ),
        Question::choice(
            "sleep_day_sleepiness",
            "Daytime sleepiness/fatigue",
            &["1 Not at all", "2", "3", "4", "5", "6", "7 Extremely"],
        ),
        Question::numeric("sleep_aids_week", "Times/week you use sleep aids or medications"),
        Question::numeric("sleep_nap_week", "Times/week you nap in the daytime/afternoon"),
        Question::choice(
            "sleep_bedtime",
            "Usual bedtime",
            &["Before 9:30 pm", "9:30–11:00 pm", "11:00 pm–1:00 am", "After 1:00 am"],
        ),
        Question::choice(
            "sleep_waketime",
            "Usual wake-up time",
            &["Before 5:00 am", "5:30–7:00 am", "7:00–9:00 am", "After 9:00 am"],
        ),
    ]
}

fn nutrition_diet() -> Vec<Question> {
    vec![
        Question::numeric("nd_fruit_veg_servings", "Servings of fruits & vegetables per day"),
        Question::numeric("nd_processed_fast_food", "Times per week you eat processed or fast food"),
        Question::numeric("nd_sugary_bev_week", "Sugary beverages per week"),
        Question::choice(
            "nd_diet_type",
            "Diet preference",
            &["Everything", "Vegetarian", "Vegan"],
        ),
        Question::free_text("nd_disliked_produce", "Which fruits/vegetables do you not enjoy? (list)"),
        Question::numeric("nd_whole_grain_servings", "Servings of whole grains per day"),
        Question::numeric("nd_lean_protein_servings", "Servings of lean protein per day"),
        Question::numeric("nd_sat_fat_week", "Times/week you eat foods high in saturated fats"),
        Question::numeric("nd_added_sugar_week", "Times/week you eat foods high in added sugars"),
        Question::numeric("nd_alcohol_week", "Alcoholic beverages per week"),
    ]
}

fn sports() -> Vec<Question> {
    vec![
        Question::numeric("sport_hours_week", "Average hours/week in physical activities or sports"),
        Question::numeric("sport_moderate_days", "Days/week of moderate-intensity aerobic activity"),
        Question::numeric("sport_vigorous_days", "Days/week of vigorous-intensity aerobic activity"),
        Question::numeric("sport_strength_min_day", "Minutes/day of strength training"),
        Question::numeric("sport_stretch_min_day", "Minutes/day of stretching/flexibility work"),
        Question::numeric("sport_rpe_1_10", "Perceived exertion during activity (1–10)"),
        Question::numeric("sport_steps_day", "Average steps per day"),
        Question::numeric("sport_hand_eye_week", "Times/week you play hand–eye coordination sports (tennis, basketball, racquetball)"),
    ]
}
