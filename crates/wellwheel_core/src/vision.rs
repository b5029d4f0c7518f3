//! Vision Wellness: prescription, visual acuity and OSDI sub-scores.
//!
//! The overall score is the mean of the three sub-scores. All four values are
//! persisted, the sub-scores under `"Vision Wellness: <part>"` topic names.

use serde::{Deserialize, Serialize};

use crate::Topic;
use crate::normalize::{OUT_OF_RANGE_FACTOR, less_is_better};

pub const PRESCRIPTION_TOPIC: &str = "Vision Wellness: Prescription";
pub const ACUITY_TOPIC: &str = "Vision Wellness: Acuity";
pub const OSDI_TOPIC: &str = "Vision Wellness: OSDI";

/// Letter accuracy needed to pass a chart line.
pub const PASS_ACCURACY: f64 = 0.8;

const SPHERE_K: f64 = 1.0;
const CYLINDER_K: f64 = 0.75;
const PD_RANGE_MM: (f64, f64) = (60.0, 66.0);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeValues {
    #[serde(default)]
    pub sph: String,
    #[serde(default)]
    pub cyl: String,
    #[serde(default)]
    pub axis: String,
    #[serde(default)]
    pub add: String,
}

/// Eyeglass prescription as typed by the user; blank fields are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(default)]
    pub od: EyeValues,
    #[serde(default)]
    pub os: EyeValues,
    #[serde(default)]
    pub pd: String,
}

fn field(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    // A typed but unreadable value stays as NaN and scores 0 downstream.
    Some(t.parse::<f64>().unwrap_or(f64::NAN))
}

/// Linear in-range variant used for pupillary distance.
fn linear_in_range(x: f64, lo: f64, hi: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    if x < lo {
        return (x / lo).clamp(0.0, 1.0) * OUT_OF_RANGE_FACTOR;
    }
    if x > hi {
        return (hi / x).clamp(0.0, 1.0) * OUT_OF_RANGE_FACTOR;
    }
    1.0
}

fn eye_score(x: f64, k: f64) -> f64 {
    if x.is_finite() {
        less_is_better(x.abs(), k)
    } else {
        0.0
    }
}

fn pair_score(a: f64, b: f64, k: f64) -> f64 {
    (eye_score(a, k) + eye_score(b, k)) / 2.0
}

pub fn score_prescription(rx: &Prescription) -> f64 {
    let mut parts = Vec::with_capacity(3);
    if let (Some(od), Some(os)) = (field(&rx.od.sph), field(&rx.os.sph)) {
        parts.push(pair_score(od, os, SPHERE_K));
    }
    if let (Some(od), Some(os)) = (field(&rx.od.cyl), field(&rx.os.cyl)) {
        parts.push(pair_score(od, os, CYLINDER_K));
    }
    if let Some(pd) = field(&rx.pd) {
        parts.push(linear_in_range(pd, PD_RANGE_MM.0, PD_RANGE_MM.1));
    }
    mean_clamped(&parts)
}

fn mean_clamped(parts: &[f64]) -> f64 {
    if parts.is_empty() {
        return 0.0;
    }
    let mean = parts.iter().sum::<f64>() / parts.len() as f64;
    if mean.is_nan() { 0.0 } else { mean.clamp(0.0, 1.0) }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SnellenLine {
    pub label: &'static str,
    pub letters: &'static str,
    pub font_size: f64,
}

pub const SNELLEN: [SnellenLine; 11] = [
    SnellenLine { label: "20/160", letters: "EKA", font_size: 38.4 },
    SnellenLine { label: "20/125", letters: "CZHS", font_size: 32.0 },
    SnellenLine { label: "20/100", letters: "KSRNH", font_size: 27.2 },
    SnellenLine { label: "20/80", letters: "DVKHCR", font_size: 23.2 },
    SnellenLine { label: "20/60", letters: "NSDVCHO", font_size: 20.0 },
    SnellenLine { label: "20/50", letters: "DCNKOHRS", font_size: 17.6 },
    SnellenLine { label: "20/40", letters: "HUDKSCRONV", font_size: 15.2 },
    SnellenLine { label: "20/30", letters: "OAHVZCKLDBSR", font_size: 12.8 },
    SnellenLine { label: "20/25", letters: "NVGRBHOEAKCMPS", font_size: 11.2 },
    SnellenLine { label: "20/20", letters: "PKVNTNUHARXMBJEDCIO", font_size: 9.6 },
    SnellenLine { label: "20/16", letters: "JXRAPMWYOFCHGVSNLUTKD", font_size: 8.0 },
];

/// Decimal acuity of a `20/x` label, capped at 1.
pub fn line_to_decimal(label: &str) -> f64 {
    let Some(den) = label
        .trim()
        .strip_prefix("20/")
        .and_then(|d| d.parse::<f64>().ok())
    else {
        return 0.0;
    };
    if !den.is_finite() || den <= 0.0 {
        return 0.0;
    }
    (20.0 / den).min(1.0)
}

pub fn sanitize_letters(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LetterMatch {
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Positional comparison of a reading attempt against the chart letters.
pub fn compare_letters(input: &str, target: &str) -> LetterMatch {
    let a = sanitize_letters(input);
    let b = sanitize_letters(target);
    let correct = a
        .bytes()
        .zip(b.bytes())
        .filter(|(x, y)| x == y)
        .count();
    let total = b.len();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };
    LetterMatch {
        correct,
        total,
        accuracy,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineResult {
    pub label: &'static str,
    pub matched: LetterMatch,
    pub passed: bool,
}

/// Walks the chart top to bottom, one submitted reading per line.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AcuityTest {
    index: usize,
    best: Option<usize>,
    letters_correct: usize,
    letters_total: usize,
    log: Vec<String>,
}

impl AcuityTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_line(&self) -> &'static SnellenLine {
        &SNELLEN[self.index]
    }

    pub fn submit(&mut self, input: &str) -> LineResult {
        let line = self.current_line();
        let matched = compare_letters(input, line.letters);
        let passed = matched.accuracy >= PASS_ACCURACY;
        self.letters_correct += matched.correct;
        self.letters_total += matched.total;
        self.log.push(format!(
            "{}: {} ({}%)",
            line.label,
            if passed { "pass" } else { "recorded" },
            (matched.accuracy * 100.0).round()
        ));
        if passed && self.best.is_none_or(|b| self.index > b) {
            self.best = Some(self.index);
        }
        self.advance();
        LineResult {
            label: line.label,
            matched,
            passed,
        }
    }

    /// Move to the next line without recording a reading.
    pub fn skip_line(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        self.index = (self.index + 1).min(SNELLEN.len() - 1);
    }

    pub fn best_line(&self) -> Option<&'static SnellenLine> {
        self.best.map(|i| &SNELLEN[i])
    }

    pub fn letters(&self) -> (usize, usize) {
        (self.letters_correct, self.letters_total)
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn score(&self) -> f64 {
        self.best_line()
            .map(|l| line_to_decimal(l.label))
            .unwrap_or(0.0)
    }
}

pub const OSDI_QUESTIONS: [&str; 12] = [
    "Have you experienced eyes that are sensitive to light during the last week?",
    "Have you experienced eyes that feel gritty during the last week?",
    "Have you experienced painful or sore eyes during the last week?",
    "Have you experienced blurred vision during the last week?",
    "Have you experienced poor vision during the last week?",
    "Have you had any vision problems when reading (non-digital) in the past week?",
    "Have you had any vision problems when driving at night in the past week?",
    "Have you had any vision problems when working with a computer or bank machine (ATM) in the past week?",
    "Have you had any vision problems when watching TV in the past week?",
    "Have your eyes felt uncomfortable in windy areas?",
    "Have your eyes felt uncomfortable in places with low humidity (very dry)?",
    "Have your eyes felt uncomfortable in areas that had air conditioning?",
];

/// OSDI wellness: each answered item (1–8, 8 = worst) maps to `(9 - s) / 8`.
pub fn osdi_score(responses: &[Option<u8>]) -> f64 {
    let wellness: Vec<f64> = responses
        .iter()
        .flatten()
        .map(|&s| (9.0 - f64::from(s.clamp(1, 8))) / 8.0)
        .collect();
    mean_clamped(&wellness)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VisionScores {
    pub prescription: f64,
    pub acuity: f64,
    pub osdi: f64,
    pub overall: f64,
}

impl VisionScores {
    pub fn new(prescription: f64, acuity: f64, osdi: f64) -> Self {
        let overall = ((prescription + acuity + osdi) / 3.0).clamp(0.0, 1.0);
        Self {
            prescription,
            acuity,
            osdi,
            overall,
        }
    }

    /// Topic name and score for each persisted row, overall first.
    pub fn rows(&self) -> [(&'static str, f64); 4] {
        [
            (Topic::VisionWellness.as_str(), self.overall),
            (PRESCRIPTION_TOPIC, self.prescription),
            (ACUITY_TOPIC, self.acuity),
            (OSDI_TOPIC, self.osdi),
        ]
    }
}

fn spoken_letter(token: &str) -> Option<char> {
    let c = match token {
        "alpha" | "alfa" | "a" => 'A',
        "bravo" | "b" | "bee" | "be" => 'B',
        "charlie" | "c" | "sea" | "see" | "cee" => 'C',
        "delta" | "d" | "dee" => 'D',
        "echo" | "e" => 'E',
        "foxtrot" | "f" | "eff" => 'F',
        "golf" | "g" | "gee" => 'G',
        "hotel" | "h" | "aitch" => 'H',
        "india" | "i" | "eye" => 'I',
        "juliet" | "juliett" | "j" | "jay" => 'J',
        "kilo" | "k" | "kay" => 'K',
        "lima" | "l" | "el" => 'L',
        "mike" | "m" | "em" => 'M',
        "november" | "n" | "en" => 'N',
        "oscar" | "o" | "oh" | "owe" => 'O',
        "papa" | "p" | "pee" => 'P',
        "quebec" | "q" | "cue" | "queue" => 'Q',
        "romeo" | "r" | "ar" | "are" => 'R',
        "sierra" | "s" | "ess" => 'S',
        "tango" | "t" | "tee" | "tea" => 'T',
        "uniform" | "u" | "you" => 'U',
        "victor" | "v" | "vee" => 'V',
        "whiskey" | "whisky" | "w" | "doubleu" => 'W',
        "xray" | "x" | "ex" => 'X',
        "yankee" | "y" | "why" => 'Y',
        "zulu" | "z" | "zee" | "zed" => 'Z',
        _ => return None,
    };
    Some(c)
}

/// Turn a speech transcript ("kilo sierra are") into chart letters ("KSR").
/// Unknown words contribute their letters verbatim.
pub fn decode_spoken_letters(transcript: &str) -> String {
    let lowered = transcript.to_lowercase();
    let mut tokens = lowered
        .split_whitespace()
        .map(|raw| {
            raw.chars()
                .filter(|c| c.is_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .peekable();
    let mut out = String::new();
    while let Some(mut token) = tokens.next() {
        // Two-word names only join when both words stand alone.
        let joined = match (token.as_str(), tokens.peek().map(String::as_str)) {
            ("x", Some("ray")) => Some("xray"),
            ("double", Some("u")) => Some("doubleu"),
            _ => None,
        };
        if let Some(name) = joined {
            tokens.next();
            token = name.to_string();
        }
        match spoken_letter(&token) {
            Some(c) => out.push(c),
            None => out.push_str(&sanitize_letters(&token)),
        }
    }
    out
}
