//! Product catalog and the text helpers around smart tips.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const SYSTEM_PROMPT: &str =
    "You are a helpful health assistant. Keep advice general and non-medical.";
pub const NO_TIP: &str = "No tip available.";
pub const CANNED_TIP: &str = "You'll see personalized tips here once you register/login. Try one small improvement today: get 20-30 minutes of outdoor daylight before noon and aim for a consistent bedtime.";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s)]+").expect("URL pattern compiles"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    SightC,
    Blueberry,
    AdaptogenX,
    Superfood,
    Shop,
}

impl Product {
    pub fn link(&self) -> &'static str {
        match self {
            Product::SightC => {
                "https://sightsage.com/collections/bestsellers/products/sightc-natural-dry-eye-supplement"
            }
            Product::Blueberry => "https://sightsage.com/products/blueberry-gummy",
            Product::AdaptogenX => "https://sightsage.com/products/adaptogen-x",
            Product::Superfood => "https://sightsage.com/products/superfoods-wellness-tea",
            Product::Shop => "https://sightsage.com/collections/bestsellers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Product::SightC => "Buy SightC",
            Product::Blueberry => "Buy Blueberry Gummies",
            Product::AdaptogenX => "Buy AdaptogenX",
            Product::Superfood => "Buy Superfood Wellness Blend",
            Product::Shop => "Shop SightSage",
        }
    }
}

/// Keyword pick from free text; falls back to the shop front.
pub fn pick_product(text: &str) -> Product {
    let s = text.to_lowercase();
    if s.contains("sightc") {
        Product::SightC
    } else if s.contains("blueberry") {
        Product::Blueberry
    } else if s.contains("adaptogen") {
        Product::AdaptogenX
    } else if s.contains("superfood") || s.contains("wellness blend") {
        Product::Superfood
    } else {
        Product::Shop
    }
}

/// Product named by a link, checked in the order the tip widget uses.
pub fn product_for_url(url: &str) -> Option<Product> {
    let u = url.to_lowercase();
    [
        ("blueberry", Product::Blueberry),
        ("adaptogen", Product::AdaptogenX),
        ("sightc", Product::SightC),
        ("superfood", Product::Superfood),
    ]
    .into_iter()
    .find_map(|(kw, p)| u.contains(kw).then_some(p))
}

pub fn extract_first_url(text: &str) -> Option<&str> {
    URL_RE.find(text).map(|m| m.as_str())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductPick {
    pub url: String,
    pub label: String,
}

/// Call-to-action for a tip. A link inside the tip wins over the keyword pick.
pub fn recommend(tip: &str) -> ProductPick {
    let keyword = pick_product(tip);
    match extract_first_url(tip) {
        Some(url) => ProductPick {
            url: url.to_string(),
            label: product_for_url(url).unwrap_or(keyword).label().to_string(),
        },
        None => ProductPick {
            url: keyword.link().to_string(),
            label: keyword.label().to_string(),
        },
    }
}

/// User message for the tip completion.
pub fn tip_prompt(profile: &serde_json::Value, scores: &serde_json::Value) -> String {
    format!(
        "Based on this data, give one concise, encouraging wellness tip.\nProfile: {profile}\nScores: {scores}"
    )
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SmartTip {
    pub tip: String,
    pub product: ProductPick,
}

impl SmartTip {
    pub fn from_completion(content: Option<&str>) -> Self {
        let tip = content
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_TIP)
            .to_string();
        let product = recommend(&tip);
        Self { tip, product }
    }

    pub fn fallback() -> Self {
        Self {
            tip: CANNED_TIP.to_string(),
            product: ProductPick {
                url: Product::Shop.link().to_string(),
                label: Product::Shop.label().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyword_pick_order() {
        assert_eq!(pick_product("Try SightC and blueberry"), Product::SightC);
        assert_eq!(pick_product("a Blueberry snack"), Product::Blueberry);
        assert_eq!(pick_product("our Wellness Blend tea"), Product::Superfood);
        assert_eq!(pick_product("drink water"), Product::Shop);
    }

    #[test]
    fn first_url_stops_at_whitespace_or_paren() {
        let text = "See (https://sightsage.com/products/adaptogen-x) or http://b.example now";
        assert_eq!(extract_first_url(text), Some("https://sightsage.com/products/adaptogen-x"));
        assert_eq!(extract_first_url("no links"), None);
    }

    #[test]
    fn url_scheme_is_case_insensitive() {
        assert_eq!(extract_first_url("go to HTTPS://Shop.example/x."), Some("HTTPS://Shop.example/x."));
    }

    #[test]
    fn url_in_tip_wins_over_keyword() {
        let pick = recommend("Have a blueberry. More: https://sightsage.com/products/adaptogen-x");
        assert_eq!(pick.url, "https://sightsage.com/products/adaptogen-x");
        assert_eq!(pick.label, "Buy AdaptogenX");

        let unknown = recommend("A blueberry snack helps: https://example.com/x");
        assert_eq!(unknown.url, "https://example.com/x");
        assert_eq!(unknown.label, "Buy Blueberry Gummies");
    }

    #[test]
    fn empty_completion_becomes_no_tip() {
        let t = SmartTip::from_completion(Some("   "));
        assert_eq!(t.tip, NO_TIP);
        assert_eq!(t.product.label, "Shop SightSage");
        assert_eq!(SmartTip::from_completion(None).tip, NO_TIP);
    }

    #[test]
    fn fallback_points_at_shop() {
        let t = SmartTip::fallback();
        assert!(t.tip.contains("daylight"));
        assert_eq!(t.product.url, Product::Shop.link());
    }

    #[test]
    fn prompt_embeds_json() {
        let p = tip_prompt(&json!({"name": "Ann"}), &json!({"Sleep": 0.5}));
        assert!(p.ends_with("Profile: {\"name\":\"Ann\"}\nScores: {\"Sleep\":0.5}"));
    }
}
