//! `newsdesk monitor` — Build a dated briefing from snapshot files.
//!
//! Feed fetching is an external collaborator; this command consumes the
//! snapshot JSON files it drops into the inbox directory (each an array of
//! articles) and aggregates them into `research/YYYY-MM-DD-briefing.json`.

use chrono::NaiveDate;
use newsdesk_config::AppConfig;
use newsdesk_core::{Article, Briefing};
use newsdesk_history::HistoryStore;
use std::path::PathBuf;
use tracing::warn;

pub fn run(
    inbox: Option<PathBuf>,
    output: Option<PathBuf>,
    date: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let inbox = inbox.unwrap_or_else(|| config.content.inbox_path());
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    println!("📡 Collecting snapshots from {}", inbox.display());

    let articles = load_snapshots(&inbox);
    if articles.is_empty() {
        println!("  ⚠️  No articles found — briefing will be empty");
    }

    let briefing = Briefing::from_articles(date, articles);

    let path = match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&briefing)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)?;
            path
        }
        None => {
            let store = HistoryStore::new(
                config.content.research_path(),
                config.content.posts_path(),
            );
            store.save_briefing(&briefing)?
        }
    };

    println!("✅ Briefing saved to {}", path.display());
    println!("   Articles scanned: {}", briefing.total_articles_scanned);
    println!("   Trending stories: {}", briefing.trending_stories.len());
    for story in &briefing.trending_stories {
        println!("     - {} ({} sources)", story.keyword, story.source_count);
    }

    Ok(())
}

/// Load every snapshot JSON file in the inbox, in sorted order.
/// Unreadable or unparsable files are skipped, not fatal.
fn load_snapshots(inbox: &std::path::Path) -> Vec<Article> {
    let Ok(read_dir) = std::fs::read_dir(inbox) else {
        warn!(inbox = %inbox.display(), "Inbox directory not found");
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = read_dir
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut articles = Vec::new();
    for path in paths {
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot");
                continue;
            }
        };
        match serde_json::from_str::<Vec<Article>>(&content) {
            Ok(batch) => articles.extend(batch),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping corrupt snapshot");
            }
        }
    }
    articles
}
