//! Briefing types — the structured snapshot of one collection run.
//!
//! A briefing aggregates the articles gathered by the external feed monitor,
//! identifies trending stories (keywords covered by two or more distinct
//! sources), and records the top headlines. Briefings are persisted as
//! `research/YYYY-MM-DD-briefing.json` and mined later as historical context.

use crate::keywords::extract_keywords;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashSet;

/// How many headlines a briefing keeps.
pub const TOP_HEADLINES: usize = 15;

/// How many trending stories a briefing keeps.
pub const MAX_TRENDING: usize = 5;

/// How many supporting articles each trending story keeps.
pub const MAX_STORY_ARTICLES: usize = 5;

/// A single collected article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Source outlet name.
    pub source: String,

    /// Headline.
    pub title: String,

    /// Link to the original article.
    #[serde(default)]
    pub link: String,

    /// Publication timestamp as reported by the feed (free-form).
    #[serde(default)]
    pub published: String,

    /// Article summary or lede.
    #[serde(default)]
    pub summary: String,
}

/// A keyword covered by multiple sources in the same run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingStory {
    /// The shared keyword.
    pub keyword: String,

    /// Number of distinct sources covering it.
    pub source_count: usize,

    /// Supporting articles (up to [`MAX_STORY_ARTICLES`]).
    pub articles: Vec<Article>,
}

/// The structured snapshot of one collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Briefing {
    /// The run date (also encoded in the briefing filename).
    pub date: NaiveDate,

    /// When the briefing was generated.
    pub generated_at: DateTime<Utc>,

    /// Total articles seen before truncation.
    pub total_articles_scanned: usize,

    /// Stories covered by two or more sources, most covered first.
    pub trending_stories: Vec<TrendingStory>,

    /// The first [`TOP_HEADLINES`] articles.
    pub top_headlines: Vec<Article>,
}

impl Briefing {
    /// Build a briefing from a run's collected articles.
    pub fn from_articles(date: NaiveDate, articles: Vec<Article>) -> Self {
        let trending_stories = identify_trending(&articles);
        let total = articles.len();
        let mut top_headlines = articles;
        top_headlines.truncate(TOP_HEADLINES);

        Self {
            date,
            generated_at: Utc::now(),
            total_articles_scanned: total,
            trending_stories,
            top_headlines,
        }
    }

    /// Canonical filename for this briefing: `YYYY-MM-DD-briefing.json`.
    pub fn filename(&self) -> String {
        format!("{}-briefing.json", self.date.format("%Y-%m-%d"))
    }
}

/// Identify stories covered by multiple sources.
///
/// A keyword counts once per article; a story is trending when articles from
/// at least two distinct sources mention it. Returns the top
/// [`MAX_TRENDING`] stories by distinct-source count, ties broken by keyword
/// so the output is deterministic.
pub fn identify_trending(articles: &[Article]) -> Vec<TrendingStory> {
    // BTreeMap keeps keyword iteration order stable across runs.
    let mut by_keyword: BTreeMap<String, Vec<&Article>> = BTreeMap::new();

    for article in articles {
        let text = format!("{} {}", article.title, article.summary);
        let unique: HashSet<String> = extract_keywords(&text).into_iter().collect();
        for keyword in unique {
            by_keyword.entry(keyword).or_default().push(article);
        }
    }

    let mut trending: Vec<TrendingStory> = by_keyword
        .into_iter()
        .filter_map(|(keyword, articles)| {
            let sources: HashSet<&str> =
                articles.iter().map(|a| a.source.as_str()).collect();
            if sources.len() < 2 {
                return None;
            }
            Some(TrendingStory {
                keyword,
                source_count: sources.len(),
                articles: articles
                    .into_iter()
                    .take(MAX_STORY_ARTICLES)
                    .cloned()
                    .collect(),
            })
        })
        .collect();

    trending.sort_by(|a, b| {
        b.source_count
            .cmp(&a.source_count)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    trending.truncate(MAX_TRENDING);
    trending
}
