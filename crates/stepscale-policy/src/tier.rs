//! Tier table — admission and ordering of step adjustments.
//!
//! A tier applies a capacity adjustment while the metric's distance from
//! its alarm threshold lies in `[lower_bound, upper_bound)`. An absent lower
//! bound means negative infinity, an absent upper bound positive infinity.
//!
//! Admission only checks the shape of a single tier. Whether the whole set
//! partitions the metric-distance domain is left to the caller (see
//! [`TierTable::check_partition`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PolicyError, PolicyResult};
use crate::number::Number;
use crate::partition::{self, PartitionIssue};

/// A caller-declared adjustment tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentTier {
    /// Capacity delta, percentage, or exact capacity depending on the
    /// policy's adjustment type. Can be negative.
    pub adjustment: Number,
    /// Inclusive lower edge of the metric-distance interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<Number>,
    /// Exclusive upper edge of the metric-distance interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Number>,
}

impl AdjustmentTier {
    /// A tier with no bounds yet. Must be given at least one bound
    /// before it will be admitted.
    pub fn new(adjustment: impl Into<Number>) -> Self {
        Self {
            adjustment: adjustment.into(),
            lower_bound: None,
            upper_bound: None,
        }
    }

    /// Apply this tier when the distance is at or above `lower`.
    pub fn above(mut self, lower: impl Into<Number>) -> Self {
        self.lower_bound = Some(lower.into());
        self
    }

    /// Apply this tier when the distance is below `upper`.
    pub fn below(mut self, upper: impl Into<Number>) -> Self {
        self.upper_bound = Some(upper.into());
        self
    }

    fn is_unbounded(&self) -> bool {
        self.lower_bound.is_none() && self.upper_bound.is_none()
    }
}

/// One emitted `(lower, upper, adjustment)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepAdjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_interval_lower_bound: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_interval_upper_bound: Option<Number>,
    pub scaling_adjustment: Number,
}

impl StepAdjustment {
    /// Lower edge, with an absent bound read as negative infinity.
    pub fn effective_lower(&self) -> f64 {
        self.metric_interval_lower_bound
            .map_or(f64::NEG_INFINITY, |n| n.as_f64())
    }

    /// Upper edge, with an absent bound read as positive infinity.
    pub fn effective_upper(&self) -> f64 {
        self.metric_interval_upper_bound
            .map_or(f64::INFINITY, |n| n.as_f64())
    }
}

impl From<&AdjustmentTier> for StepAdjustment {
    fn from(tier: &AdjustmentTier) -> Self {
        Self {
            metric_interval_lower_bound: tier.lower_bound,
            metric_interval_upper_bound: tier.upper_bound,
            scaling_adjustment: tier.adjustment,
        }
    }
}

/// Insertion-ordered collection of admitted tiers.
///
/// Tiers are only ever appended; nothing is reordered, deduplicated or
/// removed.
#[derive(Debug, Clone, Default)]
pub struct TierTable {
    tiers: Vec<AdjustmentTier>,
}

impl TierTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a tier.
    ///
    /// Fails with [`PolicyError::InvalidTier`] when both bounds are absent;
    /// the table is left untouched in that case.
    pub fn add_adjustment(&mut self, tier: AdjustmentTier) -> PolicyResult<()> {
        if tier.is_unbounded() {
            return Err(PolicyError::InvalidTier { tier });
        }
        debug!(
            lower = ?tier.lower_bound,
            upper = ?tier.upper_bound,
            adjustment = %tier.adjustment,
            position = self.tiers.len(),
            "tier admitted"
        );
        self.tiers.push(tier);
        Ok(())
    }

    /// Materialize the tiers as emitted triples, in insertion order.
    pub fn snapshot(&self) -> Vec<StepAdjustment> {
        self.tiers.iter().map(StepAdjustment::from).collect()
    }

    /// Report gaps and overlaps across the admitted tiers.
    ///
    /// Purely advisory; admission never runs this.
    pub fn check_partition(&self) -> Vec<PartitionIssue> {
        partition::check_partition(&self.snapshot())
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjustmentTier> {
        self.tiers.iter()
    }
}
