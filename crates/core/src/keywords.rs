//! Keyword extraction for articles and briefings.
//!
//! Simple term extraction: lowercase, strip HTML and URLs, keep words of
//! four or more characters, drop stopwords and bare numbers. The trending
//! detector and the knowledge-base query path both build on this.

use crate::briefing::Briefing;
use regex::Regex;
use std::sync::LazyLock;

/// Words too common in news copy to carry signal.
const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "have", "been", "will", "said", "says",
    "more", "about", "after", "their", "which", "when", "where", "there",
    "what", "some", "than", "into", "very", "just", "over", "also", "only",
    "many", "most", "such", "other", "would", "could", "should", "these",
    "those", "them", "then", "both", "each", "does", "were", "make", "made",
];

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static HTML_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&\w+;").unwrap());
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://|www\.)\S+").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w{4,}\b").unwrap());
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());

/// Extract candidate words from text: lowercased, HTML/URLs removed,
/// four or more characters each. Order of first occurrence is preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    let text = HTML_TAG.replace_all(&text, " ");
    let text = URL.replace_all(&text, " ");
    let text = HTML_ENTITY.replace_all(&text, " ");

    WORD.find_iter(&text).map(|m| m.as_str().to_string()).collect()
}

/// Extract keywords from text: tokenized words minus stopwords, bare
/// numbers, and years.
pub fn extract_keywords(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .filter(|w| !YEAR.is_match(w))
        .collect()
}

/// Extract the query keywords for a briefing: trending-story keywords first,
/// then keywords mined from headline titles, deduplicated in order, capped
/// at `max`.
pub fn briefing_keywords(briefing: &Briefing, max: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut keywords = Vec::new();

    for story in &briefing.trending_stories {
        let kw = story.keyword.to_lowercase();
        if !kw.is_empty() && seen.insert(kw.clone()) {
            keywords.push(kw);
        }
    }

    for article in &briefing.top_headlines {
        for kw in extract_keywords(&article.title) {
            if seen.insert(kw.clone()) {
                keywords.push(kw);
            }
        }
    }

    keywords.truncate(max);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::{Article, TrendingStory};
    use chrono::NaiveDate;

    #[test]
    fn tokenize_lowercases_and_drops_short_words() {
        let words = tokenize("NATO to Hold Summit in Kyiv");
        assert_eq!(words, vec!["nato", "hold", "summit", "kyiv"]);
    }

    #[test]
    fn tokenize_strips_html_and_urls() {
        let words = tokenize("<p>Sanctions &amp; exports</p> https://example.com/article");
        assert!(words.contains(&"sanctions".to_string()));
        assert!(words.contains(&"exports".to_string()));
        assert!(!words.iter().any(|w| w.contains("example")));
        assert!(!words.iter().any(|w| w.contains("http")));
    }

    #[test]
    fn stopwords_and_numbers_filtered() {
        let keywords = extract_keywords("Officials said that talks about 2024 begin 1000");
        assert!(!keywords.contains(&"said".to_string()));
        assert!(!keywords.contains(&"that".to_string()));
        assert!(!keywords.contains(&"about".to_string()));
        assert!(!keywords.contains(&"2024".to_string()));
        assert!(!keywords.contains(&"1000".to_string()));
        assert!(keywords.contains(&"officials".to_string()));
        assert!(keywords.contains(&"talks".to_string()));
    }

    #[test]
    fn briefing_keywords_prefer_trending() {
        let article = Article {
            source: "Wire".into(),
            title: "Grain exports resume".into(),
            link: String::new(),
            published: String::new(),
            summary: String::new(),
        };
        let briefing = Briefing {
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            generated_at: chrono::Utc::now(),
            total_articles_scanned: 1,
            trending_stories: vec![TrendingStory {
                keyword: "ceasefire".into(),
                source_count: 3,
                articles: vec![],
            }],
            top_headlines: vec![article],
        };

        let keywords = briefing_keywords(&briefing, 10);
        assert_eq!(keywords[0], "ceasefire");
        assert!(keywords.contains(&"grain".to_string()));
        assert!(keywords.contains(&"exports".to_string()));
    }

    #[test]
    fn briefing_keywords_respects_cap() {
        let briefing = Briefing {
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            generated_at: chrono::Utc::now(),
            total_articles_scanned: 0,
            trending_stories: (0..20)
                .map(|i| TrendingStory {
                    keyword: format!("keyword{i}"),
                    source_count: 2,
                    articles: vec![],
                })
                .collect(),
            top_headlines: vec![],
        };
        assert_eq!(briefing_keywords(&briefing, 5).len(), 5);
    }
}
