//! Historical items — past briefings and published digests.
//!
//! Entries are immutable once stored and retained indefinitely. The `weight`
//! field is an annotation set by the temporal weighting pass; it is 0 until
//! then and never 0 afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which store a historical item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// A dated briefing JSON file under the research directory.
    Briefing,
    /// A published digest Markdown file under the posts directory.
    Digest,
}

/// One historical item, loaded from a dated file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// File stem the item was loaded from (e.g. `2026-07-01-briefing`).
    pub id: String,

    /// The item's date, parsed from its filename.
    pub date: NaiveDate,

    /// Textual content: a briefing summary or a digest excerpt.
    pub content: String,

    /// Source store tag.
    pub kind: HistoryKind,

    /// Recency weight, annotated by the weighting pass.
    #[serde(default)]
    pub weight: f32,
}

impl HistoryEntry {
    /// Age in whole days relative to `today`. Future-dated items clamp to 0.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.date).num_days().max(0)
    }
}
