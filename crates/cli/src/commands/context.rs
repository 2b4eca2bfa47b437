//! `newsdesk context` — Assemble a drafting context bundle.
//!
//! Loads the briefing, mines its query keywords, searches the knowledge
//! base, weights the historical store, and writes the assembled bundle (and
//! optionally its rendered prompt) to the output directory.

use newsdesk_config::AppConfig;
use newsdesk_context::{AssemblyInput, ContextAssembler, ContextBudget};
use newsdesk_core::{Briefing, KnowledgeEntry, keywords::briefing_keywords};
use newsdesk_history::{HistoryStore, TemporalWeights};
use newsdesk_kb::{KnowledgeBase, SearchQuery};
use std::path::{Path, PathBuf};

/// How many query keywords to mine from a briefing.
const QUERY_KEYWORDS: usize = 10;

pub fn run(
    briefing_path: &Path,
    output_dir: Option<PathBuf>,
    prompt_out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Current briefing
    let content = std::fs::read_to_string(briefing_path)
        .map_err(|e| format!("Failed to read briefing {}: {e}", briefing_path.display()))?;
    let briefing: Briefing = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse briefing {}: {e}", briefing_path.display()))?;

    // Knowledge base matches for the briefing's keywords
    let kb = KnowledgeBase::load(&config.content.knowledge_path());
    let keywords = briefing_keywords(&briefing, QUERY_KEYWORDS);
    let query = SearchQuery {
        keywords: keywords.clone(),
        categories: vec![],
        date_range: None,
        limit: config.assembly.knowledge_limit,
    };
    let knowledge: Vec<KnowledgeEntry> =
        kb.search(&query).into_iter().map(|hit| hit.entry).collect();

    // Weighted history
    let store = HistoryStore::new(
        config.content.research_path(),
        config.content.posts_path(),
    );
    let tiers = TemporalWeights::new(
        config.temporal.boundaries_days.clone(),
        config.temporal.weights.clone(),
    )?
    .with_max_items(config.temporal.max_items.clone())?;
    let history = tiers.apply(briefing.date, store.load());

    // Assemble
    let assembler = ContextAssembler::new(ContextBudget {
        total: config.assembly.budget_tokens,
        history: config.assembly.history_tokens,
        knowledge: config.assembly.knowledge_tokens,
    });
    let bundle = assembler.assemble(&AssemblyInput {
        briefing: &briefing,
        history: &history,
        knowledge: &knowledge,
    })?;

    // Persist
    let output_dir = output_dir.unwrap_or_else(|| config.content.output_path());
    std::fs::create_dir_all(&output_dir)?;
    let bundle_path = output_dir.join(format!("{}-context.json", bundle.briefing_date));
    std::fs::write(&bundle_path, serde_json::to_string_pretty(&bundle)?)?;

    if let Some(prompt_path) = prompt_out {
        if let Some(parent) = prompt_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&prompt_path, bundle.render_prompt())?;
        println!("✅ Prompt written to {}", prompt_path.display());
    }

    println!("✅ Context bundle written to {}", bundle_path.display());
    println!("   Keywords searched: {}", keywords.join(", "));
    println!(
        "   Budget: {}/{} tokens ({:.1}%)",
        bundle.metadata.total_tokens,
        bundle.metadata.budget,
        bundle.metadata.utilization_pct
    );
    for section in &bundle.metadata.per_section {
        println!(
            "   {:17} {:>5} tokens, {}/{} items",
            section.name, section.tokens, section.items_included, section.items_total
        );
    }
    for drop in &bundle.metadata.drops {
        println!(
            "   dropped from {}: {} items ({} tokens) — {}",
            drop.section, drop.items_dropped, drop.tokens_dropped, drop.reason
        );
    }

    Ok(())
}
