//! Title-relevance ranking for video search results.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

const EXACT_TITLE: u32 = 1500;
const TITLE_PREFIX: u32 = 200;
const WHOLE_PHRASE: u32 = 1000;
const WHOLE_WORD: u32 = 50;
const PARTIAL_WORD: u32 = 10;

/// A search hit as fetched from the video platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// What callers receive: ranking keys are stripped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub url: String,
}

impl From<SearchResultItem> for VideoItem {
    fn from(item: SearchResultItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            thumbnail: item.thumbnail,
            url: item.url,
        }
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

fn whole_word(text: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(text))).ok()
}

/// A query compiled once and matched against many titles.
pub struct QueryMatcher {
    query: String,
    phrase: Option<Regex>,
    words: Vec<(String, Option<Regex>)>,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        let query = query.trim().to_lowercase();
        let words = query
            .split_whitespace()
            .map(|w| (w.to_string(), whole_word(w)))
            .collect();
        let phrase = if query.is_empty() {
            None
        } else {
            whole_word(&query)
        };
        Self {
            query,
            phrase,
            words,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn score(&self, title: &str) -> u32 {
        if self.is_empty() {
            return 0;
        }
        let lower = title.to_lowercase();
        let mut score = 0;
        if lower == self.query {
            score += EXACT_TITLE;
        }
        if lower.starts_with(&self.query) {
            score += TITLE_PREFIX;
        }
        if self.phrase.as_ref().is_some_and(|re| re.is_match(title)) {
            score += WHOLE_PHRASE;
        }
        for (word, re) in &self.words {
            if re.as_ref().is_some_and(|re| re.is_match(title)) {
                score += WHOLE_WORD;
            } else if lower.contains(word.as_str()) {
                score += PARTIAL_WORD;
            }
        }
        score
    }

    /// Every query word occurs in the title as a whole word, in any order.
    pub fn matches_all_words(&self, title: &str) -> bool {
        self.words
            .iter()
            .all(|(_, re)| re.as_ref().is_some_and(|re| re.is_match(title)))
    }
}

/// Title filter used by the uploads-playlist search. Blank queries match all.
pub fn matches_exact_words(title: &str, query: &str) -> bool {
    QueryMatcher::new(query).matches_all_words(title)
}

/// Placeholder entries the platform leaves behind for removed uploads.
pub fn is_placeholder_title(title: &str) -> bool {
    let t = title.trim();
    t.eq_ignore_ascii_case("private video") || t.eq_ignore_ascii_case("deleted video")
}

fn newer_first(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order items most relevant first. A blank query keeps the input order.
pub fn rank(items: Vec<SearchResultItem>, query: &str) -> Vec<VideoItem> {
    let items = items
        .into_iter()
        .filter(|it| !it.id.trim().is_empty() && !it.title.trim().is_empty());
    let matcher = QueryMatcher::new(query);
    if matcher.is_empty() {
        return items.map(VideoItem::from).collect();
    }
    let mut scored: Vec<(u32, SearchResultItem)> =
        items.map(|it| (matcher.score(&it.title), it)).collect();
    scored.sort_by(|(sa, a), (sb, b)| {
        sb.cmp(sa)
            .then_with(|| newer_first(&a.published_at, &b.published_at))
    });
    scored.into_iter().map(|(_, it)| it.into()).collect()
}

/// Ids already shown to the caller across paginated fetches.
#[derive(Clone, Debug, Default)]
pub struct SeenIds {
    seen: HashSet<String>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time an id is offered.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            false
        } else {
            self.seen.insert(id.to_string())
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Keep only unseen items, remembering them; duplicates within the page go too.
    pub fn retain_unseen(&mut self, items: Vec<VideoItem>) -> Vec<VideoItem> {
        items.into_iter().filter(|it| self.insert(&it.id)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SeenIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            seen: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, title: &str, day: Option<u32>) -> SearchResultItem {
        SearchResultItem {
            id: id.into(),
            title: title.into(),
            thumbnail: String::new(),
            url: watch_url(id),
            published_at: day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()),
        }
    }

    fn ids(items: &[VideoItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn blank_query_preserves_order() {
        let input = vec![item("a", "Dog", Some(1)), item("b", "Cat", Some(9))];
        assert_eq!(ids(&rank(input.clone(), "")), ["a", "b"]);
        assert_eq!(ids(&rank(input, "   ")), ["a", "b"]);
    }

    #[test]
    fn whole_word_prefix_beats_substring_beats_nothing() {
        let input = vec![
            item("dog", "Dog", Some(20)),
            item("category", "The Category", Some(10)),
            item("food", "Cat Food", Some(1)),
        ];
        assert_eq!(ids(&rank(input, "cat")), ["food", "category", "dog"]);
    }

    #[test]
    fn score_components() {
        let m = QueryMatcher::new("Cat");
        assert_eq!(m.score("cat"), 1500 + 200 + 1000 + 50);
        assert_eq!(m.score("Cat Food"), 200 + 1000 + 50);
        assert_eq!(m.score("The Category"), 10);
        assert_eq!(m.score("Dog"), 0);
        assert_eq!(QueryMatcher::new("blue light").score("Light, blue!"), 100);
    }

    #[test]
    fn ties_break_newest_first_then_missing_dates_last() {
        let input = vec![
            item("old", "Dry eye", Some(1)),
            item("undated", "Dry eye", None),
            item("new", "Dry eye", Some(15)),
        ];
        assert_eq!(ids(&rank(input, "dry")), ["new", "old", "undated"]);
    }

    #[test]
    fn drops_items_without_id_or_title() {
        let input = vec![item("", "Cat", None), item("x", " ", None), item("ok", "Cat", None)];
        assert_eq!(ids(&rank(input, "cat")), ["ok"]);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let m = QueryMatcher::new("a.b");
        assert_eq!(m.score("axb"), 0);
        assert_eq!(m.score("see a.b here"), 1000 + 50);
        assert!(!matches_exact_words("axb", "a.b"));
        assert_eq!(QueryMatcher::new("c++ (intro)").score("Dog"), 0);
    }

    #[test]
    fn exact_words_filter() {
        assert!(matches_exact_words("Blue light and sleep", ""));
        assert!(matches_exact_words("Blue light and sleep", "sleep blue"));
        assert!(!matches_exact_words("Bluetooth tips", "blue"));
    }

    #[test]
    fn placeholder_titles() {
        assert!(is_placeholder_title("Private video"));
        assert!(is_placeholder_title("DELETED VIDEO"));
        assert!(!is_placeholder_title("Private video tips"));
    }

    #[test]
    fn seen_ids_dedupe_across_pages() {
        let mut seen = SeenIds::new();
        let page1 = rank(vec![item("a", "A", None), item("b", "B", None)], "");
        let page2 = rank(vec![item("b", "B", None), item("c", "C", None), item("c", "C", None)], "");
        let first = seen.retain_unseen(page1);
        let second = seen.retain_unseen(page2);
        assert_eq!(ids(&first), ["a", "b"]);
        assert_eq!(ids(&second), ["c"]);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn seen_ids_seeded_from_client() {
        let mut seen: SeenIds = ["a"].into_iter().collect();
        assert!(seen.contains("a"));
        assert!(!seen.insert("a"));
        assert!(seen.insert("z"));
    }
}
