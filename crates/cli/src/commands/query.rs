//! `newsdesk query` — Search the knowledge base.

use newsdesk_config::AppConfig;
use newsdesk_kb::{KnowledgeBase, SearchQuery};

pub fn run(
    keywords: Vec<String>,
    categories: Vec<String>,
    limit: usize,
    id: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let kb = KnowledgeBase::load(&config.content.knowledge_path());

    // Direct lookup by id
    if let Some(id) = id {
        match kb.get(&id) {
            Some(entry) => {
                println!("{}", serde_json::to_string_pretty(entry)?);
                let related = kb.related(&id);
                if !related.is_empty() && !json {
                    println!();
                    println!("Related entries:");
                    for r in related {
                        println!("  - {} ({})", r.id, r.title);
                    }
                }
            }
            None => return Err(format!("Entry not found: {id}").into()),
        }
        return Ok(());
    }

    if keywords.is_empty() {
        return Err("Provide --keywords or --id".into());
    }

    let query = SearchQuery {
        keywords,
        categories,
        date_range: None,
        limit,
    };
    let hits = kb.search(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    println!("🔍 Searched {} entries, {} matched", kb.len(), hits.len());
    for hit in &hits {
        let date = hit
            .entry
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "ongoing".into());
        println!(
            "  - {} ({}, {}) [{} shared keyword{}]",
            hit.entry.title,
            hit.entry.category,
            date,
            hit.overlap,
            if hit.overlap == 1 { "" } else { "s" }
        );
    }
    if hits.is_empty() {
        println!("   No matches. The knowledge base may need populating.");
    }

    Ok(())
}
