//! `newsdesk status` — Show configuration and store counts.

use newsdesk_config::AppConfig;
use newsdesk_history::HistoryStore;
use newsdesk_kb::KnowledgeBase;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("📰 Newsdesk Status");
    println!("==================");
    println!("  Content root:  {}", config.content.root.display());
    println!("  Research dir:  {}", config.content.research_path().display());
    println!("  Posts dir:     {}", config.content.posts_path().display());
    println!("  Knowledge dir: {}", config.content.knowledge_path().display());
    println!("  Output dir:    {}", config.content.output_path().display());

    println!("\n  Recency tiers:");
    let t = &config.temporal;
    for (i, weight) in t.weights.iter().enumerate() {
        let range = match (i.checked_sub(1).map(|p| t.boundaries_days[p]), t.boundaries_days.get(i)) {
            (None, Some(end)) => format!("0–{end} days"),
            (Some(start), Some(end)) => format!("{}–{end} days", start + 1),
            (Some(start), None) => format!("> {start} days"),
            (None, None) => "all ages".into(),
        };
        println!("    tier {i}: {range:>12}  weight {weight}");
    }

    let store = HistoryStore::new(
        config.content.research_path(),
        config.content.posts_path(),
    );
    println!("\n  Briefings: {}", store.briefing_count());
    println!("  Digests:   {}", store.digest_count());

    let kb = KnowledgeBase::load(&config.content.knowledge_path());
    println!("  Knowledge entries: {}", kb.len());
    for (category, count) in kb.category_counts() {
        println!("    {category}: {count}");
    }
    if kb.is_empty() {
        println!("    (empty knowledge base is a valid state — populate when ready)");
    }

    println!(
        "\n  Assembly budget: {} tokens, {} knowledge matches per run",
        config.assembly.budget_tokens, config.assembly.knowledge_limit
    );

    Ok(())
}
