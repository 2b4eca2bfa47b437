//! File-based historical store.
//!
//! Briefings live as `YYYY-MM-DD-briefing.json` under the research directory;
//! published digests as `YYYY-MM-DD-slug.md` under the posts directory. The
//! date is authoritative from the filename. Files whose names carry no
//! parsable date, and files that fail to parse, are skipped with a warning —
//! a bad item never fails the run.

use chrono::NaiveDate;
use newsdesk_core::error::HistoryError;
use newsdesk_core::{Briefing, HistoryEntry, HistoryKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How much of a digest body is kept as historical content.
pub const DIGEST_EXCERPT_CHARS: usize = 3000;

/// A store over the dated briefing and digest file trees.
///
/// Reads everything up front at the start of a run; there is no partial or
/// streaming load. Missing directories are valid empty states.
pub struct HistoryStore {
    research_dir: PathBuf,
    posts_dir: PathBuf,
}

impl HistoryStore {
    /// Create a store over the given research (briefings) and posts
    /// (digests) directories.
    pub fn new(research_dir: PathBuf, posts_dir: PathBuf) -> Self {
        Self {
            research_dir,
            posts_dir,
        }
    }

    /// Load all historical items: briefings plus digests, unweighted, in
    /// date-descending order.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let mut entries = self.load_briefings();
        entries.extend(self.load_digests());
        entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        debug!(count = entries.len(), "Historical store loaded");
        entries
    }

    /// Load past briefings from the research directory.
    pub fn load_briefings(&self) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();

        for path in dated_files(&self.research_dir, "json") {
            let Some((stem, date)) = stem_and_date(&path) else {
                warn!(path = %path.display(), "Skipping briefing with undated filename");
                continue;
            };
            if !stem.ends_with("-briefing") {
                continue;
            }

            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable briefing");
                    continue;
                }
            };
            let briefing: Briefing = match serde_json::from_str(&content) {
                Ok(b) => b,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping corrupt briefing");
                    continue;
                }
            };

            entries.push(HistoryEntry {
                id: stem,
                date,
                content: render_briefing(&briefing),
                kind: HistoryKind::Briefing,
                weight: 0.0,
            });
        }

        entries
    }

    /// Load published digests from the posts directory.
    ///
    /// The YAML frontmatter block is stripped and the body truncated to
    /// [`DIGEST_EXCERPT_CHARS`] characters.
    pub fn load_digests(&self) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();

        for path in dated_files(&self.posts_dir, "md") {
            let Some((stem, date)) = stem_and_date(&path) else {
                warn!(path = %path.display(), "Skipping digest with undated filename");
                continue;
            };

            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable digest");
                    continue;
                }
            };

            let body = strip_frontmatter(&content);
            entries.push(HistoryEntry {
                id: stem,
                date,
                content: body.chars().take(DIGEST_EXCERPT_CHARS).collect(),
                kind: HistoryKind::Digest,
                weight: 0.0,
            });
        }

        entries
    }

    /// Persist a briefing as `research/YYYY-MM-DD-briefing.json`.
    pub fn save_briefing(&self, briefing: &Briefing) -> Result<PathBuf, HistoryError> {
        std::fs::create_dir_all(&self.research_dir).map_err(|e| {
            HistoryError::Storage(format!("Failed to create research directory: {e}"))
        })?;

        let path = self.research_dir.join(briefing.filename());
        let json = serde_json::to_string_pretty(briefing)
            .map_err(|e| HistoryError::Storage(format!("Failed to serialize briefing: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| HistoryError::Storage(format!("Failed to write briefing: {e}")))?;

        debug!(path = %path.display(), "Briefing saved");
        Ok(path)
    }

    /// Count of discoverable briefing files (dated, correctly suffixed).
    pub fn briefing_count(&self) -> usize {
        dated_files(&self.research_dir, "json")
            .into_iter()
            .filter(|p| {
                stem_and_date(p).is_some_and(|(stem, _)| stem.ends_with("-briefing"))
            })
            .count()
    }

    /// Count of discoverable digest files (dated).
    pub fn digest_count(&self) -> usize {
        dated_files(&self.posts_dir, "md")
            .into_iter()
            .filter(|p| stem_and_date(p).is_some())
            .count()
    }
}

/// List files with the given extension in a directory, sorted by name for
/// deterministic load order. A missing directory yields nothing.
fn dated_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    paths.sort();
    paths
}

/// Extract the file stem and the `YYYY-MM-DD` prefix date from a path.
fn stem_and_date(path: &Path) -> Option<(String, NaiveDate)> {
    let stem = path.file_stem()?.to_str()?;
    let date_part: Vec<&str> = stem.splitn(4, '-').collect();
    if date_part.len() < 3 {
        return None;
    }
    let date_str = format!("{}-{}-{}", date_part[0], date_part[1], date_part[2]);
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").ok()?;
    Some((stem.to_string(), date))
}

/// Render a briefing's trending stories and headlines as historical content.
fn render_briefing(briefing: &Briefing) -> String {
    let mut out = format!(
        "Briefing {} — {} articles scanned\n",
        briefing.date, briefing.total_articles_scanned
    );

    if !briefing.trending_stories.is_empty() {
        out.push_str("Trending:\n");
        for story in &briefing.trending_stories {
            out.push_str(&format!(
                "- {} ({} sources)\n",
                story.keyword, story.source_count
            ));
        }
    }

    if !briefing.top_headlines.is_empty() {
        out.push_str("Headlines:\n");
        for article in &briefing.top_headlines {
            out.push_str(&format!("- [{}] {}\n", article.source, article.title));
        }
    }

    out
}

/// Strip a leading YAML frontmatter block (`--- ... ---`) from a digest.
fn strip_frontmatter(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("---") else {
        return content;
    };
    match rest.find("\n---") {
        Some(end) => {
            let after = &rest[end + 4..];
            // Skip the remainder of the closing delimiter line
            match after.find('\n') {
                Some(nl) => &after[nl + 1..],
                None => "",
            }
        }
        None => content,
    }
}
