//! Loading and direct lookups.

use crate::search::{SearchHit, SearchQuery};
use chrono::NaiveDate;
use newsdesk_core::KnowledgeEntry;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// The in-memory knowledge base index: id → entry.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: HashMap<String, KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Load every `*.json` entry under every immediate subdirectory of
    /// `root`.
    ///
    /// The subdirectory name becomes the entry's category when the file
    /// doesn't set one; a missing `id` falls back to the file stem.
    /// Duplicate ids upsert — the later file in path-sorted order wins.
    /// A missing root or unreadable file is never fatal: bad files are
    /// skipped with a warning and a missing tree loads zero entries.
    pub fn load(root: &Path) -> Self {
        let mut kb = Self::default();

        let Ok(read_dir) = std::fs::read_dir(root) else {
            info!(root = %root.display(), "No knowledge base found, starting empty");
            return kb;
        };

        let mut categories: Vec<_> = read_dir
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .collect();
        categories.sort();

        for category_dir in categories {
            let category = category_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            let Ok(read_dir) = std::fs::read_dir(&category_dir) else {
                continue;
            };
            let mut files: Vec<_> = read_dir
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
                .collect();
            files.sort();

            for path in files {
                let content = match std::fs::read_to_string(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                        continue;
                    }
                };
                let mut entry: KnowledgeEntry = match serde_json::from_str(&content) {
                    Ok(e) => e,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping corrupt entry");
                        continue;
                    }
                };

                if entry.id.is_empty() {
                    entry.id = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or_default()
                        .to_string();
                }
                if entry.category.is_empty() {
                    entry.category = category.clone();
                }

                if kb.entries.contains_key(&entry.id) {
                    debug!(id = %entry.id, path = %path.display(), "Duplicate id, overwriting");
                }
                kb.entries.insert(entry.id.clone(), entry);
            }
        }

        info!(count = kb.entries.len(), "Knowledge base loaded");
        kb
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct lookup by id.
    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries.get(id)
    }

    /// Resolve an entry's related ids, skipping dangling references.
    pub fn related(&self, id: &str) -> Vec<&KnowledgeEntry> {
        let Some(entry) = self.get(id) else {
            return Vec::new();
        };
        entry
            .related_entries
            .iter()
            .filter_map(|rid| self.get(rid))
            .collect()
    }

    /// Entries nearest to a target date by absolute day distance.
    /// Undated entries are excluded.
    pub fn nearest_by_date(&self, target: NaiveDate, limit: usize) -> Vec<&KnowledgeEntry> {
        let mut dated: Vec<(i64, &KnowledgeEntry)> = self
            .entries
            .values()
            .filter_map(|e| e.date.map(|d| ((target - d).num_days().abs(), e)))
            .collect();
        dated.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        dated.into_iter().take(limit).map(|(_, e)| e).collect()
    }

    /// Ranked keyword search; see [`SearchQuery`].
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit> {
        crate::search::run(self.entries.values(), query)
    }

    /// Entry count per category, sorted by category name.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.category.as_str()).or_default() += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        counts.sort();
        counts
    }
}
