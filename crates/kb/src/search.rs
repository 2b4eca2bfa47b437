//! Ranked keyword search over the index.

use chrono::NaiveDate;
use newsdesk_core::KnowledgeEntry;
use serde::{Deserialize, Serialize};

/// A keyword search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query keywords; matching is case-insensitive.
    pub keywords: Vec<String>,

    /// Restrict to these categories (empty = all).
    #[serde(default)]
    pub categories: Vec<String>,

    /// Inclusive date range filter; undated entries always pass.
    #[serde(default)]
    pub date_range: Option<(NaiveDate, NaiveDate)>,

    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl SearchQuery {
    /// A plain keyword query with the default limit.
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            categories: vec![],
            date_range: None,
            limit: default_limit(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A matched entry with its intersection size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub entry: KnowledgeEntry,
    /// How many query keywords the entry's keyword set shares.
    pub overlap: usize,
}

/// Rank entries against a query.
///
/// Ordering: intersection size descending, then most-recent date first
/// (undated entries after dated ones), then id ascending — a total order, so
/// results are deterministic. Entries sharing no keyword with the query are
/// not returned; an empty index or an empty result set is a normal value.
pub fn run<'a, I>(entries: I, query: &SearchQuery) -> Vec<SearchHit>
where
    I: IntoIterator<Item = &'a KnowledgeEntry>,
{
    // Queries are keyword sets: duplicates must not inflate intersections.
    let mut needles: Vec<String> = query.keywords.iter().map(|k| k.to_lowercase()).collect();
    needles.sort();
    needles.dedup();

    let mut hits: Vec<SearchHit> = entries
        .into_iter()
        .filter(|e| query.categories.is_empty() || query.categories.contains(&e.category))
        .filter(|e| match (query.date_range, e.date) {
            (Some((start, end)), Some(date)) => start <= date && date <= end,
            _ => true,
        })
        .filter_map(|e| {
            let overlap = e.keyword_overlap(&needles);
            (overlap > 0).then(|| SearchHit {
                entry: e.clone(),
                overlap,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.overlap
            .cmp(&a.overlap)
            .then_with(|| b.entry.date.cmp(&a.entry.date))
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });
    hits.truncate(query.limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, keywords: &[&str], date: Option<&str>) -> KnowledgeEntry {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "keywords": {}, "date": "{}"}}"#,
            serde_json::to_string(keywords).unwrap(),
            date.unwrap_or("ongoing"),
        ))
        .unwrap()
    }

    #[test]
    fn empty_index_returns_empty_list() {
        let entries: Vec<KnowledgeEntry> = vec![];
        let hits = run(entries.iter(), &SearchQuery::keywords(["ukraine"]));
        assert!(hits.is_empty());
    }

    #[test]
    fn larger_intersection_ranks_first() {
        let entries = vec![
            entry("2", &["ukraine"], None),
            entry("1", &["ukraine", "ceasefire"], None),
        ];
        let hits = run(
            entries.iter(),
            &SearchQuery::keywords(["ukraine", "ceasefire"]).with_limit(5),
        );
        let ids: Vec<&str> = hits.iter().map(|h| h.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(hits[0].overlap, 2);
        assert_eq!(hits[1].overlap, 1);
    }

    #[test]
    fn equal_intersection_breaks_tie_by_recency() {
        let entries = vec![
            entry("older", &["sanctions"], Some("2022-03-01")),
            entry("newer", &["sanctions"], Some("2026-01-15")),
            entry("undated", &["sanctions"], None),
        ];
        let hits = run(entries.iter(), &SearchQuery::keywords(["sanctions"]));
        let ids: Vec<&str> = hits.iter().map(|h| h.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older", "undated"]);
    }

    #[test]
    fn limit_is_respected() {
        let entries: Vec<KnowledgeEntry> = (0..20)
            .map(|i| entry(&format!("e{i:02}"), &["energy"], None))
            .collect();
        let hits = run(entries.iter(), &SearchQuery::keywords(["energy"]).with_limit(3));
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn no_shared_keywords_means_no_hit() {
        let entries = vec![entry("a", &["grain", "exports"], None)];
        let hits = run(entries.iter(), &SearchQuery::keywords(["ukraine"]));
        assert!(hits.is_empty());
    }

    #[test]
    fn empty_query_matches_nothing() {
        let entries = vec![entry("a", &["grain"], None)];
        let hits = run(entries.iter(), &SearchQuery::keywords(Vec::<String>::new()));
        assert!(hits.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let entries = vec![entry("a", &["NATO", "Summit"], None)];
        let hits = run(entries.iter(), &SearchQuery::keywords(["nato", "summit"]));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].overlap, 2);
    }

    #[test]
    fn category_filter_applies() {
        let mut a = entry("a", &["energy"], None);
        a.category = "events".into();
        let mut b = entry("b", &["energy"], None);
        b.category = "figures".into();

        let mut query = SearchQuery::keywords(["energy"]);
        query.categories = vec!["figures".into()];
        let hits = run([&a, &b], &query);
        let ids: Vec<&str> = hits.iter().map(|h| h.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn date_range_filter_passes_undated() {
        let entries = vec![
            entry("in", &["energy"], Some("2025-06-01")),
            entry("out", &["energy"], Some("2020-01-01")),
            entry("undated", &["energy"], None),
        ];
        let mut query = SearchQuery::keywords(["energy"]);
        query.date_range = Some((
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        ));
        let hits = run(entries.iter(), &query);
        let ids: Vec<&str> = hits.iter().map(|h| h.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["in", "undated"]);
    }
}
