//! Knowledge base entries — curated background on events, figures, and
//! narratives.
//!
//! Entries are JSON files grouped in category directories and are immutable
//! after load. Dates are lenient: the literal `"ongoing"`, an absent field,
//! or an unparsable string all load as an undated entry rather than failing
//! the file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A curated knowledge base entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Unique ID (falls back to the file stem at load time).
    #[serde(default)]
    pub id: String,

    /// Entry title.
    #[serde(default)]
    pub title: String,

    /// Category (falls back to the directory name at load time).
    #[serde(default)]
    pub category: String,

    /// Associated date; `None` covers "ongoing" and undated entries.
    #[serde(default, with = "lenient_date")]
    pub date: Option<NaiveDate>,

    /// One-paragraph summary.
    #[serde(default)]
    pub summary: String,

    /// Topic keywords used for retrieval.
    #[serde(default, alias = "topics")]
    pub keywords: Vec<String>,

    /// IDs of related entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_entries: Vec<String>,
}

impl KnowledgeEntry {
    /// Count how many of `query` (already lowercased) appear in this entry's
    /// keyword set, case-insensitively.
    pub fn keyword_overlap(&self, query: &[String]) -> usize {
        query
            .iter()
            .filter(|q| self.keywords.iter().any(|k| k.eq_ignore_ascii_case(q)))
            .count()
    }
}

/// Serde adapter for the knowledge base's lenient date field.
///
/// Reads `"YYYY-MM-DD"` as a date; `"ongoing"`, empty, missing, or malformed
/// values become `None`. Writes `None` back as `"ongoing"` to match the
/// curated corpus.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str("ongoing"),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_parses_dated() {
        let entry: KnowledgeEntry = serde_json::from_str(
            r#"{
                "id": "minsk-2",
                "title": "Minsk II agreement",
                "category": "events",
                "date": "2015-02-12",
                "summary": "Ceasefire framework for eastern Ukraine.",
                "keywords": ["minsk", "ceasefire", "ukraine"]
            }"#,
        )
        .unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2015, 2, 12));
        assert_eq!(entry.keywords.len(), 3);
    }

    #[test]
    fn ongoing_and_malformed_dates_load_as_none() {
        let ongoing: KnowledgeEntry =
            serde_json::from_str(r#"{"id": "a", "date": "ongoing"}"#).unwrap();
        assert!(ongoing.date.is_none());

        let malformed: KnowledgeEntry =
            serde_json::from_str(r#"{"id": "b", "date": "spring 2014"}"#).unwrap();
        assert!(malformed.date.is_none());

        let missing: KnowledgeEntry = serde_json::from_str(r#"{"id": "c"}"#).unwrap();
        assert!(missing.date.is_none());
    }

    #[test]
    fn topics_alias_accepted() {
        let entry: KnowledgeEntry =
            serde_json::from_str(r#"{"id": "a", "topics": ["sanctions", "energy"]}"#).unwrap();
        assert_eq!(entry.keywords, vec!["sanctions", "energy"]);
    }

    #[test]
    fn overlap_is_case_insensitive() {
        let entry: KnowledgeEntry = serde_json::from_str(
            r#"{"id": "a", "keywords": ["Ukraine", "Ceasefire", "NATO"]}"#,
        )
        .unwrap();
        let query = vec!["ukraine".to_string(), "ceasefire".to_string(), "grain".to_string()];
        assert_eq!(entry.keyword_overlap(&query), 2);
    }

    #[test]
    fn none_date_serializes_as_ongoing() {
        let entry: KnowledgeEntry = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""date":"ongoing""#));
    }
}
