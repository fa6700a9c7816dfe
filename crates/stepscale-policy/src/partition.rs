//! Opt-in gap/overlap check across a set of step adjustments.
//!
//! Tier admission is local: each tier is checked on its own. This module
//! is the global pass a caller can run once the full set is known. It never
//! rejects anything by itself; it only reports.

use std::fmt;

use serde::Serialize;

use crate::tier::StepAdjustment;

/// A cross-tier consistency problem. Indices refer to insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartitionIssue {
    /// Lower bound is not strictly below the upper bound, or a bound is NaN.
    Inverted { index: usize },
    /// More than one tier extends to negative infinity.
    MultipleUnboundedLower { indices: Vec<usize> },
    /// More than one tier extends to positive infinity.
    MultipleUnboundedUpper { indices: Vec<usize> },
    /// Two neighbouring tiers claim part of the same interval.
    Overlap { first: usize, second: usize },
    /// Nothing covers `[from, to)` between two neighbouring tiers.
    Gap {
        first: usize,
        second: usize,
        from: f64,
        to: f64,
    },
}

impl fmt::Display for PartitionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionIssue::Inverted { index } => {
                write!(f, "tier {index}: lower bound is not below upper bound")
            }
            PartitionIssue::MultipleUnboundedLower { indices } => {
                write!(f, "tiers {indices:?} all lack a lower bound")
            }
            PartitionIssue::MultipleUnboundedUpper { indices } => {
                write!(f, "tiers {indices:?} all lack an upper bound")
            }
            PartitionIssue::Overlap { first, second } => {
                write!(f, "tiers {first} and {second} overlap")
            }
            PartitionIssue::Gap {
                first,
                second,
                from,
                to,
            } => write!(f, "gap [{from}, {to}) between tiers {first} and {second}"),
        }
    }
}

/// Check that `steps` form one contiguous, non-overlapping run.
///
/// An empty result means the tiers are consistent. Covering the whole real
/// line is not required.
pub fn check_partition(steps: &[StepAdjustment]) -> Vec<PartitionIssue> {
    let mut issues = Vec::new();

    let mut ordered: Vec<usize> = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        // Negated so NaN bounds count as inverted.
        if !(step.effective_lower() < step.effective_upper()) {
            issues.push(PartitionIssue::Inverted { index });
        } else {
            ordered.push(index);
        }
    }

    let open_lower: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.metric_interval_lower_bound.is_none())
        .map(|(i, _)| i)
        .collect();
    if open_lower.len() > 1 {
        issues.push(PartitionIssue::MultipleUnboundedLower {
            indices: open_lower,
        });
    }

    let open_upper: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.metric_interval_upper_bound.is_none())
        .map(|(i, _)| i)
        .collect();
    if open_upper.len() > 1 {
        issues.push(PartitionIssue::MultipleUnboundedUpper {
            indices: open_upper,
        });
    }

    // Inverted tiers are already reported and stay out of the sweep.
    ordered.sort_by(|&a, &b| {
        steps[a]
            .effective_lower()
            .total_cmp(&steps[b].effective_lower())
            .then(a.cmp(&b))
    });

    // Sweep by lower bound, tracking the tier that reaches furthest so far.
    let mut reach: Option<(usize, f64)> = None;
    for &second in &ordered {
        let start = steps[second].effective_lower();
        let end = steps[second].effective_upper();
        match reach {
            Some((first, furthest)) => {
                if furthest > start {
                    issues.push(PartitionIssue::Overlap { first, second });
                } else if furthest < start {
                    issues.push(PartitionIssue::Gap {
                        first,
                        second,
                        from: furthest,
                        to: start,
                    });
                }
                if end > furthest {
                    reach = Some((second, end));
                }
            }
            None => reach = Some((second, end)),
        }
    }

    issues
}
