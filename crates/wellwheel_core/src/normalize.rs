//! Metric normalizers: raw answers to a `[0, 1]` wellness contribution.

use serde::Serialize;

pub const DEFAULT_K: f64 = 2.0;
pub const DEFAULT_PEAK_WIDTH: f64 = 1.5;
/// Score for a choice answer that matches none of the options.
pub const NEUTRAL_CHOICE_SCORE: f64 = 0.5;
/// Free text rewards presence, not content.
pub const FREE_TEXT_SCORE: f64 = 0.6;
/// Share of full credit kept by the in-range policy outside its band.
pub const OUT_OF_RANGE_FACTOR: f64 = 0.8;

/// Saturating curve `x / (x + k)`; never reaches 1 for finite `x`.
pub fn more_is_better(x: f64, k: f64) -> f64 {
    if x.is_nan() || x <= 0.0 {
        return 0.0;
    }
    (x / (x + k)).min(1.0)
}

pub fn less_is_better(x: f64, k: f64) -> f64 {
    1.0 - more_is_better(x, k)
}

/// Gaussian falloff around `target`.
pub fn peak_at(x: f64, target: f64, width: f64) -> f64 {
    let z = (x - target) / width;
    (-0.5 * z * z).exp().clamp(0.0, 1.0)
}

/// Full credit inside `[lo, hi]`, a scaled saturating falloff outside.
pub fn in_range(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() || x <= 0.0 {
        return 0.0;
    }
    if x < lo {
        return more_is_better(x / lo, 1.0) * OUT_OF_RANGE_FACTOR;
    }
    if x > hi {
        return more_is_better(hi / x, 1.0) * OUT_OF_RANGE_FACTOR;
    }
    1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MetricPolicy {
    MoreIsBetter { k: f64 },
    LessIsBetter { k: f64 },
    PeakAt { target: f64, width: f64 },
    InRange { lo: f64, hi: f64 },
}

use MetricPolicy::*;

const MORE: MetricPolicy = MoreIsBetter { k: DEFAULT_K };
const LESS: MetricPolicy = LessIsBetter { k: DEFAULT_K };
const SLEEP_PEAK: MetricPolicy = PeakAt {
    target: 8.0,
    width: DEFAULT_PEAK_WIDTH,
};
const LUX_BAND: MetricPolicy = InRange {
    lo: 3000.0,
    hi: 5000.0,
};

impl MetricPolicy {
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            MoreIsBetter { k } => more_is_better(x, k),
            LessIsBetter { k } => less_is_better(x, k),
            PeakAt { target, width } => peak_at(x, target, width),
            InRange { lo, hi } => in_range(x, lo, hi),
        }
    }
}

/// Policy for every numeric metric in the question catalog.
///
/// The entries reproduce the legacy keyword classification exactly, including
/// its accidental matches: `gh_water_servings` and `out_fitness_per_week`
/// contain the `er_` fragment and are therefore scored less-is-better, while
/// `mh_chronic_count` matches nothing and is scored more-is-better.
const CATALOG_POLICIES: &[(&str, MetricPolicy)] = &[
    ("out_hours_day", MORE),
    ("out_lux", LUX_BAND),
    ("out_direct_sun_min", MORE),
    ("out_green_min", MORE),
    ("out_fitness_per_week", LESS),
    ("in_hours_artificial", MORE),
    ("in_lux", LUX_BAND),
    ("in_hours_natural", MORE),
    ("in_screen_hours", LESS),
    ("in_focused_tasks_week", MORE),
    ("read_print_hours", MORE),
    ("read_days_week", MORE),
    ("read_electronic_minutes", MORE),
    ("read_eye_fatigue_week", LESS),
    ("mh_chronic_count", MORE),
    ("mh_hospitalizations_year", LESS),
    ("mh_surgeries_lifetime", LESS),
    ("mh_rx_count", LESS),
    ("mh_otc_count", LESS),
    ("mh_er_visits_year", LESS),
    ("mh_specialist_year", MORE),
    ("mh_pregnancies", MORE),
    ("mh_live_births", MORE),
    ("gh_overall_1_10", MORE),
    ("gh_mvpa_days", MORE),
    ("gh_stress_days", LESS),
    ("gh_depression_days", LESS),
    ("gh_sleep_weekdays", MORE),
    ("gh_sleep_weekends", MORE),
    ("gh_water_servings", LESS),
    ("gh_relax_freq", MORE),
    ("mth_overall_1_10", MORE),
    ("mth_depression_days_month", LESS),
    ("mth_sleep_hours", MORE),
    ("ff_servings_sightc", MORE),
    ("ff_frequency_days_sightc", MORE),
    ("ff_servings_blueberry", MORE),
    ("ff_frequency_days_blueberry", MORE),
    ("ff_servings_adaptogenx", MORE),
    ("ff_frequency_days_adaptogenx", MORE),
    ("ff_servings_superfood", MORE),
    ("ff_frequency_days_superfood", MORE),
    ("ff_servings_veggiecookies", MORE),
    ("ff_frequency_days_veggiecookies", MORE),
    ("ff_hair_pro_days_week", MORE),
    ("ff_substitute_meals_week", MORE),
    ("ff_repurchase_month", MORE),
    ("sleep_hours", SLEEP_PEAK),
    ("sleep_diff_fall_week", LESS),
    ("sleep_wake_midnight_week", LESS),
    ("sleep_early_wake_week", LESS),
    ("sleep_aids_week", LESS),
    ("sleep_nap_week", MORE),
    ("nd_fruit_veg_servings", MORE),
    ("nd_processed_fast_food", LESS),
    ("nd_sugary_bev_week", LESS),
    ("nd_whole_grain_servings", MORE),
    ("nd_lean_protein_servings", MORE),
    ("nd_sat_fat_week", LESS),
    ("nd_added_sugar_week", LESS),
    ("nd_alcohol_week", LESS),
    ("sport_hours_week", MORE),
    ("sport_moderate_days", MORE),
    ("sport_vigorous_days", MORE),
    ("sport_strength_min_day", MORE),
    ("sport_stretch_min_day", MORE),
    ("sport_rpe_1_10", MORE),
    ("sport_steps_day", MORE),
    ("sport_hand_eye_week", MORE),
];

const PEAK_TARGETS: &[(&str, f64)] = &[("sleep_hours", 8.0)];
const RANGE_BANDS: &[(&str, f64, f64)] = &[("in_lux", 3000.0, 5000.0), ("out_lux", 3000.0, 5000.0)];

/// Id fragments that mark a metric where higher raw values mean worse wellness.
pub const LESS_IS_BETTER_FRAGMENTS: &[&str] = &[
    "er_",
    "hospital",
    "surgery",
    "surger",
    "rx_",
    "otc_",
    "wake_",
    "diff_",
    "aids",
    "sugary",
    "processed",
    "sat_fat",
    "added_sugar",
    "alcohol",
    "screen",
    "stress",
    "depression",
    "anxiety",
    "fatigue",
];

/// Resolve the policy for a metric id: catalog table first, keyword fallback after.
pub fn policy_for(metric_id: &str) -> MetricPolicy {
    CATALOG_POLICIES
        .iter()
        .find(|(id, _)| *id == metric_id)
        .map(|(_, p)| *p)
        .unwrap_or_else(|| legacy_policy(metric_id))
}

/// Keyword-fragment classification for metric ids outside the catalog.
pub fn legacy_policy(metric_id: &str) -> MetricPolicy {
    if let Some((_, target)) = PEAK_TARGETS.iter().find(|(id, _)| *id == metric_id) {
        return PeakAt {
            target: *target,
            width: DEFAULT_PEAK_WIDTH,
        };
    }
    if let Some((_, lo, hi)) = RANGE_BANDS.iter().find(|(id, _, _)| *id == metric_id) {
        return InRange { lo: *lo, hi: *hi };
    }
    if LESS_IS_BETTER_FRAGMENTS
        .iter()
        .any(|frag| metric_id.contains(frag))
    {
        return LESS;
    }
    MORE
}

/// Parse a numeric answer; `None` for blank, unparseable or non-finite input.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

/// `normalize(raw, policy)`: unparseable or non-finite input scores 0.
pub fn normalize(raw: &str, policy: MetricPolicy) -> f64 {
    match parse_number(raw) {
        Some(x) => policy.apply(x),
        None => 0.0,
    }
}

pub fn score_numeric(metric_id: &str, raw: &str) -> f64 {
    normalize(raw, policy_for(metric_id))
}

fn leading_int(s: &str) -> Option<u64> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Ordinal score of a choice answer.
///
/// Numbered scales (`"1 Very poor"` … `"7 Excellent"`) score the answer's
/// leading number against the last option's; other lists score by position.
pub fn score_choice(raw: &str, options: &[String]) -> f64 {
    let Some(first) = options.first() else {
        return NEUTRAL_CHOICE_SCORE;
    };
    if first.trim().starts_with(|c: char| c.is_ascii_digit()) {
        let max = options.last().and_then(|o| leading_int(o)).unwrap_or(1);
        if max == 0 {
            return 0.0;
        }
        let chosen = leading_int(raw).unwrap_or(0);
        return (chosen as f64 / max as f64).clamp(0.0, 1.0);
    }
    match options.iter().position(|o| o == raw) {
        None => NEUTRAL_CHOICE_SCORE,
        Some(_) if options.len() == 1 => 1.0,
        Some(idx) => idx as f64 / (options.len() - 1) as f64,
    }
}

pub fn score_free_text(raw: &str) -> f64 {
    if raw.trim().is_empty() {
        0.0
    } else {
        FREE_TEXT_SCORE
    }
}
