//! Context assembly pipeline.
//!
//! Assembles a drafting context from three sections:
//!
//! 1. **Briefing header** (today's trending stories and headlines) — never
//!    trimmed; a budget that cannot hold it is an error
//! 2. **Weighted history** (recency-weighted past briefings and digests) —
//!    lowest-weight items dropped first
//! 3. **Knowledge** (ranked knowledge base matches) — lowest-ranked dropped
//!    first
//!
//! # Determinism
//!
//! Assembly is deterministic: identical inputs always produce identical
//! sections, stats, and drop records. The bundle's run id is the only field
//! that varies between runs.

use crate::token::estimate_tokens;
use chrono::NaiveDate;
use newsdesk_core::{Briefing, HistoryEntry, KnowledgeEntry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Types ─────────────────────────────────────────────────────────────────

/// Token budget configuration.
#[derive(Debug, Clone)]
pub struct ContextBudget {
    /// Total token budget for the entire bundle.
    pub total: usize,
    /// Optional cap on the weighted-history section.
    pub history: Option<usize>,
    /// Optional cap on the knowledge section.
    pub knowledge: Option<usize>,
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            total: 4096,
            history: None,
            knowledge: None,
        }
    }
}

/// All inputs required for one assembly run.
pub struct AssemblyInput<'a> {
    /// The current briefing.
    pub briefing: &'a Briefing,
    /// Historical items, already weighted and sorted (weight desc).
    pub history: &'a [HistoryEntry],
    /// Knowledge base matches, already ranked (best first).
    pub knowledge: &'a [KnowledgeEntry],
}

/// The assembled bundle, ready to hand to the drafting collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBundle {
    /// Run id — the only field that differs between identical runs.
    pub id: Uuid,
    /// The briefing date this bundle grounds.
    pub briefing_date: NaiveDate,
    /// Rendered briefing header (never trimmed).
    pub briefing_summary: String,
    /// History items that fit the budget, in weight order.
    pub history: Vec<HistoryEntry>,
    /// Knowledge entries that fit the budget, in rank order.
    pub knowledge: Vec<KnowledgeEntry>,
    /// Assembly accounting.
    pub metadata: BundleMetadata,
}

/// Detailed metadata about the assembly process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Total tokens across all sections.
    pub total_tokens: usize,
    /// Configured token budget.
    pub budget: usize,
    /// Budget utilization percentage (0.0–100.0).
    pub utilization_pct: f32,
    /// Per-section statistics.
    pub per_section: Vec<SectionStats>,
    /// Items dropped from each section.
    pub drops: Vec<DropInfo>,
}

/// Statistics for a single bundle section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionStats {
    pub name: String,
    pub tokens: usize,
    pub items_included: usize,
    pub items_total: usize,
}

/// Information about items dropped during budget enforcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropInfo {
    pub section: String,
    pub items_dropped: usize,
    pub tokens_dropped: usize,
    pub reason: String,
}

/// Errors from context assembly.
#[derive(Debug, Clone)]
pub enum AssemblyError {
    /// The briefing header alone exceeds the budget.
    BudgetExceeded { briefing_tokens: usize, budget: usize },
}

impl std::fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BudgetExceeded {
                briefing_tokens,
                budget,
            } => write!(
                f,
                "Briefing header ({} tokens) exceeds budget ({} tokens)",
                briefing_tokens, budget
            ),
        }
    }
}

impl std::error::Error for AssemblyError {}

// ── Assembler ─────────────────────────────────────────────────────────────

/// The context assembler. Stateless — create one and reuse it.
pub struct ContextAssembler {
    budget: ContextBudget,
}

impl ContextAssembler {
    /// Create a new assembler with the given token budget.
    pub fn new(budget: ContextBudget) -> Self {
        Self { budget }
    }

    /// Create an assembler with the default budget (4096 tokens).
    pub fn with_default_budget() -> Self {
        Self::new(ContextBudget::default())
    }

    /// Assemble a bundle from the briefing, weighted history, and knowledge
    /// matches.
    ///
    /// # Algorithm
    ///
    /// 1. Render the briefing header (always included)
    /// 2. If it alone exceeds the budget → return error
    /// 3. Fill the remaining budget in priority order:
    ///    weighted history → knowledge matches
    /// 4. Return the bundle + accounting metadata
    pub fn assemble(&self, input: &AssemblyInput<'_>) -> Result<ContextBundle, AssemblyError> {
        let mut stats: Vec<SectionStats> = Vec::new();
        let mut drops: Vec<DropInfo> = Vec::new();

        // ── Section 1: briefing header (never trimmed) ─────────────────────
        let briefing_summary = render_briefing_header(input.briefing);
        let briefing_tokens = estimate_tokens(&briefing_summary);
        stats.push(SectionStats {
            name: "briefing".into(),
            tokens: briefing_tokens,
            items_included: 1,
            items_total: 1,
        });

        if briefing_tokens > self.budget.total {
            return Err(AssemblyError::BudgetExceeded {
                briefing_tokens,
                budget: self.budget.total,
            });
        }

        let mut remaining = self.budget.total - briefing_tokens;

        // ── Section 2: weighted history ────────────────────────────────────
        let history_budget = effective_budget(self.budget.history, remaining);
        let mut history_used = 0;
        let mut history: Vec<HistoryEntry> = Vec::new();
        let mut dropped = 0;
        let mut dropped_tokens = 0;

        for item in input.history {
            let block_tokens = estimate_tokens(&history_block(item));
            if history_used + block_tokens <= history_budget {
                history.push(item.clone());
                history_used += block_tokens;
            } else {
                dropped += 1;
                dropped_tokens += block_tokens;
            }
        }
        remaining -= history_used;
        stats.push(SectionStats {
            name: "weighted_history".into(),
            tokens: history_used,
            items_included: history.len(),
            items_total: input.history.len(),
        });
        if dropped > 0 {
            drops.push(DropInfo {
                section: "weighted_history".into(),
                items_dropped: dropped,
                tokens_dropped: dropped_tokens,
                reason: "Lowest-weight items dropped".into(),
            });
        }

        // ── Section 3: knowledge matches ───────────────────────────────────
        let knowledge_budget = effective_budget(self.budget.knowledge, remaining);
        let mut knowledge_used = 0;
        let mut knowledge: Vec<KnowledgeEntry> = Vec::new();
        let mut dropped = 0;
        let mut dropped_tokens = 0;

        for entry in input.knowledge {
            let block_tokens = estimate_tokens(&knowledge_block(entry));
            if knowledge_used + block_tokens <= knowledge_budget {
                knowledge.push(entry.clone());
                knowledge_used += block_tokens;
            } else {
                dropped += 1;
                dropped_tokens += block_tokens;
            }
        }
        stats.push(SectionStats {
            name: "knowledge".into(),
            tokens: knowledge_used,
            items_included: knowledge.len(),
            items_total: input.knowledge.len(),
        });
        if dropped > 0 {
            drops.push(DropInfo {
                section: "knowledge".into(),
                items_dropped: dropped,
                tokens_dropped: dropped_tokens,
                reason: "Lowest-ranked entries dropped".into(),
            });
        }

        // ── Final metadata ─────────────────────────────────────────────────
        let total_tokens: usize = stats.iter().map(|s| s.tokens).sum();
        let utilization_pct = (total_tokens as f32 / self.budget.total as f32) * 100.0;

        Ok(ContextBundle {
            id: Uuid::new_v4(),
            briefing_date: input.briefing.date,
            briefing_summary,
            history,
            knowledge,
            metadata: BundleMetadata {
                total_tokens,
                budget: self.budget.total,
                utilization_pct,
                per_section: stats,
                drops,
            },
        })
    }
}

impl ContextBundle {
    /// Render the bundle as prompt text for the drafting collaborator.
    ///
    /// Uses the same block formats the assembler budgets with, so the
    /// rendered prompt stays within the accounted token estimate.
    pub fn render_prompt(&self) -> String {
        let mut out = format!("=== DRAFTING CONTEXT: {} ===\n\n", self.briefing_date);
        out.push_str(&self.briefing_summary);

        if !self.history.is_empty() {
            out.push_str("\n## WEIGHTED HISTORY\n\n");
            for item in &self.history {
                out.push_str(&history_block(item));
            }
        }

        if !self.knowledge.is_empty() {
            out.push_str("\n## KNOWLEDGE BASE CONTEXT\n\n");
            for entry in &self.knowledge {
                out.push_str(&knowledge_block(entry));
            }
        }

        out
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

fn effective_budget(section_limit: Option<usize>, remaining: usize) -> usize {
    match section_limit {
        Some(limit) => limit.min(remaining),
        None => remaining,
    }
}

fn render_briefing_header(briefing: &Briefing) -> String {
    let mut out = format!(
        "Briefing {} — {} articles scanned\n",
        briefing.date, briefing.total_articles_scanned
    );

    if !briefing.trending_stories.is_empty() {
        let keywords: Vec<String> = briefing
            .trending_stories
            .iter()
            .map(|s| format!("{} ({} sources)", s.keyword, s.source_count))
            .collect();
        out.push_str(&format!("Trending: {}\n", keywords.join(", ")));
    }

    for article in briefing.top_headlines.iter().take(5) {
        out.push_str(&format!("- [{}] {}\n", article.source, article.title));
    }

    out
}

fn history_block(item: &HistoryEntry) -> String {
    format!(
        "**{}** (weight {:.2})\n{}\n\n",
        item.date, item.weight, item.content
    )
}

fn knowledge_block(entry: &KnowledgeEntry) -> String {
    let date = entry
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "ongoing".into());
    format!(
        "### {}\nDate: {} | Category: {}\n{}\n\n",
        entry.title, date, entry.category, entry.summary
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use newsdesk_core::{Article, HistoryKind};

    fn test_briefing() -> Briefing {
        Briefing {
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            generated_at: Utc::now(),
            total_articles_scanned: 12,
            trending_stories: vec![],
            top_headlines: vec![Article {
                source: "Wire A".into(),
                title: "Ceasefire talks resume".into(),
                link: String::new(),
                published: String::new(),
                summary: String::new(),
            }],
        }
    }

    fn test_history(id: &str, weight: f32, content: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            content: content.into(),
            kind: HistoryKind::Briefing,
            weight,
        }
    }

    fn test_knowledge(id: &str, title: &str) -> KnowledgeEntry {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "title": "{title}", "category": "events",
                "summary": "Background on {title}.", "keywords": ["test"]}}"#
        ))
        .unwrap()
    }

    fn input<'a>(
        briefing: &'a Briefing,
        history: &'a [HistoryEntry],
        knowledge: &'a [KnowledgeEntry],
    ) -> AssemblyInput<'a> {
        AssemblyInput {
            briefing,
            history,
            knowledge,
        }
    }

    #[test]
    fn briefing_header_always_included() {
        let asm = ContextAssembler::with_default_budget();
        let briefing = test_briefing();
        let bundle = asm.assemble(&input(&briefing, &[], &[])).unwrap();
        assert!(bundle.briefing_summary.contains("Ceasefire talks resume"));

        let section = &bundle.metadata.per_section[0];
        assert_eq!(section.name, "briefing");
        assert!(section.tokens > 0);
    }

    #[test]
    fn budget_exceeded_returns_error() {
        let asm = ContextAssembler::new(ContextBudget {
            total: 5, // impossibly small
            history: None,
            knowledge: None,
        });
        let briefing = test_briefing();
        let err = asm.assemble(&input(&briefing, &[], &[])).unwrap_err();
        assert!(err.to_string().contains("exceeds budget"));
    }

    #[test]
    fn sections_populated_within_budget() {
        let asm = ContextAssembler::new(ContextBudget {
            total: 8192,
            history: None,
            knowledge: None,
        });
        let briefing = test_briefing();
        let history = vec![
            test_history("h1", 1.0, "Last week's trending stories"),
            test_history("h2", 0.5, "Last month's digest excerpt"),
        ];
        let knowledge = vec![test_knowledge("k1", "Minsk II")];

        let bundle = asm.assemble(&input(&briefing, &history, &knowledge)).unwrap();
        assert_eq!(bundle.history.len(), 2);
        assert_eq!(bundle.knowledge.len(), 1);
        assert!(bundle.metadata.drops.is_empty());
        assert!(bundle.metadata.total_tokens <= 8192);
    }

    #[test]
    fn lowest_priority_items_dropped_first() {
        let briefing = test_briefing();
        let header_tokens = estimate_tokens(&render_briefing_header(&briefing));
        // Room for roughly one history block beyond the header
        let asm = ContextAssembler::new(ContextBudget {
            total: header_tokens + 30,
            history: None,
            knowledge: None,
        });

        let history = vec![
            test_history("h1", 1.0, "Recent and heavily weighted content"),
            test_history("h2", 0.25, "Old content that should be dropped first because it is long enough not to fit"),
        ];
        let bundle = asm.assemble(&input(&briefing, &history, &[])).unwrap();

        assert_eq!(bundle.history.len(), 1);
        assert_eq!(bundle.history[0].id, "h1");
        let drop = &bundle.metadata.drops[0];
        assert_eq!(drop.section, "weighted_history");
        assert_eq!(drop.items_dropped, 1);
        assert!(drop.tokens_dropped > 0);
    }

    #[test]
    fn section_caps_enforced() {
        let asm = ContextAssembler::new(ContextBudget {
            total: 8192,
            history: Some(10), // very tight cap
            knowledge: None,
        });
        let briefing = test_briefing();
        let history: Vec<HistoryEntry> = (0..10)
            .map(|i| {
                test_history(
                    &format!("h{i}"),
                    1.0,
                    "A history block long enough to exceed a ten token cap",
                )
            })
            .collect();

        let bundle = asm.assemble(&input(&briefing, &history, &[])).unwrap();
        assert!(bundle.history.len() < 10);
        assert!(
            bundle
                .metadata
                .drops
                .iter()
                .any(|d| d.section == "weighted_history")
        );
    }

    #[test]
    fn metadata_totals_accurate() {
        let asm = ContextAssembler::with_default_budget();
        let briefing = test_briefing();
        let history = vec![test_history("h1", 1.0, "Some content")];
        let bundle = asm.assemble(&input(&briefing, &history, &[])).unwrap();

        let sum: usize = bundle.metadata.per_section.iter().map(|s| s.tokens).sum();
        assert_eq!(bundle.metadata.total_tokens, sum);
        assert!(bundle.metadata.utilization_pct > 0.0);
        assert!(bundle.metadata.utilization_pct <= 100.0);
        assert_eq!(bundle.metadata.budget, 4096);
    }

    #[test]
    fn deterministic_assembly() {
        let asm = ContextAssembler::with_default_budget();
        let briefing = test_briefing();
        let history = vec![test_history("h1", 1.0, "fact 1")];
        let knowledge = vec![test_knowledge("k1", "Minsk II")];

        let a = asm.assemble(&input(&briefing, &history, &knowledge)).unwrap();
        let b = asm.assemble(&input(&briefing, &history, &knowledge)).unwrap();

        assert_eq!(a.briefing_summary, b.briefing_summary);
        assert_eq!(a.metadata.total_tokens, b.metadata.total_tokens);
        assert_eq!(a.render_prompt().len(), b.render_prompt().len());
        // Only the run id differs
        assert_ne!(a.id, b.id);
        let prompt_a = a.render_prompt();
        let prompt_b = b.render_prompt();
        assert_eq!(prompt_a, prompt_b);
    }

    #[test]
    fn prompt_contains_all_sections() {
        let asm = ContextAssembler::with_default_budget();
        let briefing = test_briefing();
        let history = vec![test_history("h1", 0.5, "Digest excerpt text")];
        let knowledge = vec![test_knowledge("k1", "Minsk II")];

        let bundle = asm.assemble(&input(&briefing, &history, &knowledge)).unwrap();
        let prompt = bundle.render_prompt();
        assert!(prompt.contains("=== DRAFTING CONTEXT: 2026-08-06 ==="));
        assert!(prompt.contains("## WEIGHTED HISTORY"));
        assert!(prompt.contains("(weight 0.50)"));
        assert!(prompt.contains("Digest excerpt text"));
        assert!(prompt.contains("## KNOWLEDGE BASE CONTEXT"));
        assert!(prompt.contains("### Minsk II"));
    }

    #[test]
    fn empty_sections_omitted_from_prompt() {
        let asm = ContextAssembler::with_default_budget();
        let briefing = test_briefing();
        let bundle = asm.assemble(&input(&briefing, &[], &[])).unwrap();
        let prompt = bundle.render_prompt();
        assert!(!prompt.contains("## WEIGHTED HISTORY"));
        assert!(!prompt.contains("## KNOWLEDGE BASE CONTEXT"));
    }
}
