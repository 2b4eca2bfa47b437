//! # Newsdesk Core
//!
//! Domain types and error definitions for the Newsdesk briefing pipeline.
//! This crate has **zero framework dependencies** — it defines the data
//! contracts that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Newsdesk is a batch pipeline: collect → brief → weight → search → assemble.
//! The types here describe what flows between those stages. Stores and
//! indexes live in their own crates; all of them depend inward on this one.

pub mod briefing;
pub mod error;
pub mod history;
pub mod keywords;
pub mod knowledge;

// Re-export key types at crate root for ergonomics
pub use briefing::{Article, Briefing, TrendingStory};
pub use error::{Error, HistoryError, KnowledgeError, Result};
pub use history::{HistoryEntry, HistoryKind};
pub use knowledge::KnowledgeEntry;
