//! Temporal weighting — recency-decay scoring for historical items.
//!
//! Items fall into ordered recency tiers by age. Each tier maps to a fixed
//! weight; weights strictly decrease with tier age. Boundaries are inclusive
//! upper bounds, so an item exactly on a boundary takes the more-recent tier.
//! Items older than the last boundary inherit the final weight — the clamp
//! policy. Weight 0 is never produced and no item is dropped by weighting.

use chrono::NaiveDate;
use newsdesk_core::HistoryEntry;
use newsdesk_core::error::HistoryError;

/// The recency tier table.
///
/// Invariants, checked by [`TemporalWeights::new`]:
/// - boundaries are positive and strictly increasing
/// - there is exactly one more weight than boundaries
/// - weights lie in `(0, 1]` and strictly decrease
#[derive(Debug, Clone)]
pub struct TemporalWeights {
    boundaries_days: Vec<i64>,
    weights: Vec<f32>,
    /// Per-tier item caps; empty = uncapped, 0 in a slot = that tier uncapped.
    max_items: Vec<usize>,
}

impl Default for TemporalWeights {
    /// The default table: ≤ 7 days → 1.0, ≤ 30 days → 0.5, older → 0.25.
    fn default() -> Self {
        Self {
            boundaries_days: vec![7, 30],
            weights: vec![1.0, 0.5, 0.25],
            max_items: vec![],
        }
    }
}

impl TemporalWeights {
    /// Build a tier table, validating the invariants above.
    pub fn new(boundaries_days: Vec<i64>, weights: Vec<f32>) -> Result<Self, HistoryError> {
        if weights.len() != boundaries_days.len() + 1 {
            return Err(HistoryError::InvalidTiers(format!(
                "expected {} weights for {} boundaries, got {}",
                boundaries_days.len() + 1,
                boundaries_days.len(),
                weights.len()
            )));
        }
        if boundaries_days.iter().any(|&b| b <= 0)
            || !boundaries_days.windows(2).all(|w| w[0] < w[1])
        {
            return Err(HistoryError::InvalidTiers(
                "boundaries must be positive and strictly increasing".into(),
            ));
        }
        if weights.iter().any(|&w| w <= 0.0 || w > 1.0) {
            return Err(HistoryError::InvalidTiers(
                "weights must lie in (0, 1]".into(),
            ));
        }
        if !weights.windows(2).all(|w| w[0] > w[1]) {
            return Err(HistoryError::InvalidTiers(
                "weights must strictly decrease with tier age".into(),
            ));
        }

        Ok(Self {
            boundaries_days,
            weights,
            max_items: vec![],
        })
    }

    /// Attach per-tier item caps (one per weight; 0 = uncapped).
    pub fn with_max_items(mut self, max_items: Vec<usize>) -> Result<Self, HistoryError> {
        if !max_items.is_empty() && max_items.len() != self.weights.len() {
            return Err(HistoryError::InvalidTiers(format!(
                "expected {} per-tier caps, got {}",
                self.weights.len(),
                max_items.len()
            )));
        }
        self.max_items = max_items;
        Ok(self)
    }

    /// Number of tiers (including the open-ended last tier).
    pub fn tier_count(&self) -> usize {
        self.weights.len()
    }

    /// Which tier an age in days falls into.
    pub fn tier_for(&self, age_days: i64) -> usize {
        let age = age_days.max(0);
        self.boundaries_days
            .iter()
            .position(|&b| age <= b)
            .unwrap_or(self.boundaries_days.len())
    }

    /// The weight for an age in days. Ages beyond the last boundary clamp to
    /// the final weight; negative ages (future dates) count as today.
    pub fn weight_for(&self, age_days: i64) -> f32 {
        self.weights[self.tier_for(age_days)]
    }

    /// Annotate every item with its tier weight and sort by weight
    /// descending, then date descending, then id ascending. No item is
    /// dropped unless a per-tier cap applies.
    pub fn apply(&self, today: NaiveDate, items: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        let mut weighted: Vec<HistoryEntry> = items
            .into_iter()
            .map(|mut item| {
                item.weight = self.weight_for(item.age_days(today));
                item
            })
            .collect();

        weighted.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.date.cmp(&a.date))
                .then_with(|| a.id.cmp(&b.id))
        });

        if self.max_items.is_empty() {
            return weighted;
        }

        // Per-tier caps: keep the first N of each tier (items are already in
        // recency order within a tier).
        let mut kept_per_tier = vec![0usize; self.tier_count()];
        weighted.retain(|item| {
            let tier = self.tier_for(item.age_days(today));
            let cap = self.max_items[tier];
            kept_per_tier[tier] += 1;
            cap == 0 || kept_per_tier[tier] <= cap
        });
        weighted
    }
}
