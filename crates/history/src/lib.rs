//! Historical store and temporal weighting.
//!
//! Past briefings (`research/YYYY-MM-DD-briefing.json`) and published digests
//! (`posts/YYYY-MM-DD-slug.md`) are the pipeline's long-term memory. This
//! crate discovers them by the date encoded in their filenames, loads them as
//! [`HistoryEntry`] items, and assigns recency-decay weights so that newer
//! material outranks older material in the assembled context.

mod store;
mod temporal;

pub use store::{DIGEST_EXCERPT_CHARS, HistoryStore};
pub use temporal::TemporalWeights;

pub use newsdesk_core::history::{HistoryEntry, HistoryKind};
