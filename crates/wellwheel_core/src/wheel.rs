//! Radial wellness wheel: wedge geometry, label placement and SVG output.
//!
//! Angles are in degrees, measured clockwise from the positive x axis in SVG
//! coordinates; the first wedge starts at twelve o'clock (-90°).

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::Topic;
use crate::topic::FUNCTIONAL_FOOD_MAX_POINTS;

pub const DEFAULT_SIZE: f64 = 600.0;
pub const START_ANGLE: f64 = -90.0;

pub const SLICE_COLORS: [&str; 10] = [
    "#FFE975", "#F7A556", "#94D86F", "#EE4C40", "#B77BEA", "#FFF7D9", "#B4D97A", "#559A94",
    "#FFF25E", "#F28B33",
];
pub const CENTER_COLOR: &str = "#E63423";

const LABEL_FACTOR_BASE: f64 = 0.68;
const LABEL_FACTOR_INSET: f64 = 0.62;
const LABEL_FACTOR_INSET_FUNCTIONAL_FOOD: f64 = 0.66;
const FULL_SCORE: f64 = 0.99;
const BASE_FONT: f64 = 16.0;
const COMPACT_FONT: f64 = 14.0;
const MIN_FONT: f64 = 12.0;
const LINE_GAP: f64 = 1.05;
const GLYPH_WIDTH: f64 = 0.6;
const FIT: f64 = 0.9;
const METRIC_BAND: f64 = 0.6;
const METRIC_BAND_WIDE: f64 = 2.05;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn polar_to_cartesian(cx: f64, cy: f64, r: f64, angle_deg: f64) -> Point {
    let a = angle_deg.to_radians();
    Point {
        x: cx + r * a.cos(),
        y: cy + r * a.sin(),
    }
}

/// Closed SVG path for an annular sector between two radii.
pub fn ring_wedge_path(cx: f64, cy: f64, r_inner: f64, r_outer: f64, start: f64, end: f64) -> String {
    let large_arc = u8::from(end - start > 180.0);
    let p1 = polar_to_cartesian(cx, cy, r_outer, start);
    let p2 = polar_to_cartesian(cx, cy, r_outer, end);
    let p3 = polar_to_cartesian(cx, cy, r_inner, end);
    let p4 = polar_to_cartesian(cx, cy, r_inner, start);
    format!(
        "M {:.3} {:.3} A {r_outer:.3} {r_outer:.3} 0 {large_arc} 1 {:.3} {:.3} L {:.3} {:.3} A {r_inner:.3} {r_inner:.3} 0 {large_arc} 0 {:.3} {:.3} Z",
        p1.x, p1.y, p2.x, p2.y, p3.x, p3.y, p4.x, p4.y
    )
}

/// Radii derived from the canvas size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WheelDimensions {
    pub size: f64,
    pub center: f64,
    pub outer_radius: f64,
    pub base_inner: f64,
    pub max_inner: f64,
    pub base_center: f64,
    pub max_center: f64,
    pub donut_radius: f64,
}

impl WheelDimensions {
    pub fn for_size(size: f64) -> Self {
        Self {
            size,
            center: size / 2.0,
            outer_radius: size * 0.5,
            base_inner: size * 0.2,
            max_inner: size * 0.38,
            base_center: size * 0.1,
            max_center: size * 0.2,
            donut_radius: size * 0.22,
        }
    }

    /// Wedge inner radius: a full score leaves the ring at its thickest.
    pub fn inner_radius(&self, score: Option<f64>) -> f64 {
        match score {
            Some(s) => self.base_inner + (self.max_inner - self.base_inner) * (1.0 - s),
            None => self.base_inner,
        }
    }

    pub fn center_radius(&self, score: Option<f64>) -> f64 {
        match score {
            Some(s) => self.base_center + (self.max_center - self.base_center) * s,
            None => self.max_center,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelLayout {
    pub position: Point,
    pub rotation: f64,
    pub flipped: bool,
    pub font_size: f64,
    pub line_step: f64,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricLabel {
    pub text: String,
    pub position: Point,
    pub font_size: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Wedge {
    pub topic: Topic,
    pub score: Option<f64>,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub color: &'static str,
    pub path: String,
    pub label: LabelLayout,
    pub metric: Option<MetricLabel>,
}

impl Wedge {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CenterDisc {
    pub radius: f64,
    pub score: Option<f64>,
    pub percent: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WheelLayout {
    pub dimensions: WheelDimensions,
    pub wedges: Vec<Wedge>,
    pub center: CenterDisc,
}

fn clamped(score: Option<f64>) -> Option<f64> {
    score.filter(|s| !s.is_nan()).map(|s| s.clamp(0.0, 1.0))
}

fn label_layout(topic: Topic, score: Option<f64>, dims: &WheelDimensions, inner: f64, mid: f64, slice_rad: f64) -> LabelLayout {
    let c = dims.center;
    let outer = dims.outer_radius;
    let name = topic.as_str();
    let lines: Vec<String> = name.split(' ').map(str::to_string).collect();
    let longest = lines.iter().map(|w| w.chars().count()).max().unwrap_or(0) as f64;

    let inset = if topic == Topic::FunctionalFood {
        LABEL_FACTOR_INSET_FUNCTIONAL_FOOD
    } else {
        LABEL_FACTOR_INSET
    };
    let factor = match score {
        Some(s) if s < FULL_SCORE => inset,
        _ => LABEL_FACTOR_BASE,
    };
    let label_r = inner + (outer - inner) * factor;
    let thickness = outer - inner;

    let base_font = match topic {
        Topic::FunctionalFood | Topic::NutritionDiet | Topic::Reading => COMPACT_FONT,
        _ => BASE_FONT,
    };
    let radial_limit = thickness * FIT / (1.0 + (lines.len() as f64 - 1.0) * LINE_GAP);
    let width_limit = label_r * slice_rad * FIT / (GLYPH_WIDTH * longest).max(1.0);
    let font_size = base_font.min(radial_limit).min(width_limit).max(MIN_FONT);

    let norm = mid.rem_euclid(360.0);
    let flipped = norm > 90.0 && norm < 270.0;
    LabelLayout {
        position: polar_to_cartesian(c, c, label_r, mid),
        rotation: if flipped { mid + 180.0 } else { mid },
        flipped,
        font_size,
        line_step: font_size * LINE_GAP,
        lines,
    }
}

fn metric_label(topic: Topic, score: Option<f64>, dims: &WheelDimensions, inner: f64, mid: f64, label_font: f64) -> Option<MetricLabel> {
    let s = score?;
    let (text, band, font_size) = if topic == Topic::FunctionalFood {
        let points = (s * FUNCTIONAL_FOOD_MAX_POINTS).round() as i64;
        let band = if points.abs() >= 100 { METRIC_BAND_WIDE } else { METRIC_BAND };
        (points.to_string(), band, label_font.min(BASE_FONT))
    } else {
        (format!("{}%", (s * 100.0).round() as i64), METRIC_BAND, BASE_FONT)
    };
    let band_inner = dims.donut_radius + 6.0;
    let band_outer = (band_inner + 6.0).max(inner - 8.0);
    let r = band_inner + (band_outer - band_inner) * band;
    Some(MetricLabel {
        text,
        position: polar_to_cartesian(dims.center, dims.center, r, mid),
        font_size,
    })
}

/// Lay out the wheel for a canvas of `size` pixels. Topics missing from
/// `scores` draw at baseline; the Vision Wellness entry drives the centre disc.
pub fn layout_wheel(scores: &HashMap<Topic, f64>, size: f64) -> WheelLayout {
    let dims = WheelDimensions::for_size(size);
    let n = Topic::WHEEL_ORDER.len();
    let slice = 360.0 / n as f64;
    let slice_rad = slice.to_radians();
    let c = dims.center;

    let wedges = Topic::WHEEL_ORDER
        .iter()
        .enumerate()
        .map(|(i, &topic)| {
            let score = clamped(scores.get(&topic).copied());
            let start = START_ANGLE + i as f64 * slice;
            let end = start + slice;
            let mid = (start + end) / 2.0;
            let inner = dims.inner_radius(score);
            let label = label_layout(topic, score, &dims, inner, mid, slice_rad);
            let metric = metric_label(topic, score, &dims, inner, mid, label.font_size);
            Wedge {
                topic,
                score,
                start_angle: start,
                end_angle: end,
                inner_radius: inner,
                outer_radius: dims.outer_radius,
                color: SLICE_COLORS[i % SLICE_COLORS.len()],
                path: ring_wedge_path(c, c, inner, dims.outer_radius, start, end),
                label,
                metric,
            }
        })
        .collect();

    let vision = clamped(scores.get(&Topic::VisionWellness).copied());
    WheelLayout {
        dimensions: dims,
        wedges,
        center: CenterDisc {
            radius: dims.center_radius(vision),
            score: vision,
            percent: vision.map(|s| (s * 100.0).round() as i64),
        },
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const TEXT_STYLE: &str = r##"font-weight="800" fill="#111" stroke="#fff" stroke-width="4" paint-order="stroke fill" text-anchor="middle" dominant-baseline="middle""##;

/// Standalone SVG document for a laid-out wheel.
pub fn render_svg(layout: &WheelLayout) -> String {
    let d = &layout.dimensions;
    let c = d.center;
    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {s} {s}" width="{s}" height="{s}" aria-label="Vision Wellness Wheel"><rect x="0" y="0" width="{s}" height="{s}" fill="#fff"/>"##,
        s = d.size
    );
    for w in &layout.wedges {
        let name = escape_xml(w.topic.as_str());
        let _ = write!(svg, r#"<g aria-label="{name}"><path d="{}" fill="{}"/>"#, w.path, w.color);
        let l = &w.label;
        let _ = write!(
            svg,
            r#"<g transform="translate({:.3}, {:.3}) rotate({:.3})"><text font-size="{:.2}" {TEXT_STYLE}>"#,
            l.position.x, l.position.y, l.rotation, l.font_size
        );
        for (i, line) in l.lines.iter().enumerate() {
            let dy = if i == 0 { 0.0 } else { l.line_step };
            let _ = write!(svg, r#"<tspan x="0" dy="{dy:.2}">{}</tspan>"#, escape_xml(line));
        }
        svg.push_str("</text></g>");
        if let Some(m) = &w.metric {
            let _ = write!(
                svg,
                r#"<text x="{:.3}" y="{:.3}" font-size="{:.2}" {TEXT_STYLE}>{}</text>"#,
                m.position.x,
                m.position.y,
                m.font_size,
                escape_xml(&m.text)
            );
        }
        svg.push_str("</g>");
    }
    let _ = write!(
        svg,
        r##"<g aria-label="Vision Wellness"><circle cx="{c}" cy="{c}" r="{:.3}" fill="{CENTER_COLOR}"/><text x="{c}" y="{}" text-anchor="middle" font-size="28" font-weight="800" fill="#000">Vision</text><text x="{c}" y="{}" text-anchor="middle" font-size="28" font-weight="800" fill="#000">Wellness</text>"##,
        layout.center.radius,
        c - 8.0,
        c + 18.0
    );
    if let Some(p) = layout.center.percent {
        let _ = write!(
            svg,
            r##"<text x="{c}" y="{}" text-anchor="middle" font-size="20" font-weight="800" fill="#000">{p}%</text>"##,
            c + 50.0
        );
    }
    svg.push_str("</g></svg>");
    svg
}
