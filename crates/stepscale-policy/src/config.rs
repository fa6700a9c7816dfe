//! Policy-level configuration and the policy.toml declaration format.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::number::Number;
use crate::tier::AdjustmentTier;

/// How adjustment numbers are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdjustmentType {
    /// Add the adjustment to the current capacity. Negative values shrink it.
    #[default]
    ChangeInCapacity,
    /// Add this percentage of the current capacity to itself (-100 to 100).
    PercentChangeInCapacity,
    /// Set the capacity to exactly the adjustment.
    ExactCapacity,
}

/// How the alarm metric is aggregated before tiers are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MetricAggregationType {
    #[default]
    Average,
    Minimum,
    Maximum,
}

/// Policy-wide settings applied at compile time.
///
/// Fields are accepted as given. Cross-field consistency (for example a
/// minimum magnitude without percentage adjustments) is the consumer's
/// concern.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepScalingPolicyConfig {
    /// Explicit policy name. Generated from construct identity when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,
    #[serde(default)]
    pub adjustment_type: AdjustmentType,
    /// Grace period after a scaling activity. Scale-outs during the window
    /// are squashed to the largest one; scale-ins are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_seconds: Option<u64>,
    /// Minimum absolute effect of a percentage adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_adjustment_magnitude: Option<Number>,
    #[serde(default)]
    pub metric_aggregation_type: MetricAggregationType,
}

impl StepScalingPolicyConfig {
    pub fn with_policy_name(mut self, name: impl Into<String>) -> Self {
        self.policy_name = Some(name.into());
        self
    }

    pub fn with_adjustment_type(mut self, adjustment_type: AdjustmentType) -> Self {
        self.adjustment_type = adjustment_type;
        self
    }

    pub fn with_cooldown_seconds(mut self, secs: u64) -> Self {
        self.cooldown_seconds = Some(secs);
        self
    }

    pub fn with_min_adjustment_magnitude(mut self, magnitude: impl Into<Number>) -> Self {
        self.min_adjustment_magnitude = Some(magnitude.into());
        self
    }

    pub fn with_metric_aggregation_type(mut self, aggregation: MetricAggregationType) -> Self {
        self.metric_aggregation_type = aggregation;
        self
    }

    /// Log settings the consumer is likely to ignore. Never fails.
    pub(crate) fn note_unused_fields(&self) {
        if self.min_adjustment_magnitude.is_some()
            && self.adjustment_type != AdjustmentType::PercentChangeInCapacity
        {
            debug!(
                adjustment_type = ?self.adjustment_type,
                "min_adjustment_magnitude only applies to PercentChangeInCapacity"
            );
        }
    }
}

/// A policy declaration as written in `policy.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDeclaration {
    /// Construct id, the last component of the generated policy name.
    pub id: String,
    /// Opaque identifier of the resource whose capacity is adjusted.
    pub scalable_target: String,
    /// Enclosing construct path, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
    #[serde(default)]
    pub policy: StepScalingPolicyConfig,
    #[serde(default)]
    pub tiers: Vec<AdjustmentTier>,
}

impl PolicyDeclaration {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let declaration: PolicyDeclaration = toml::from_str(content)?;
        Ok(declaration)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a minimal declaration: scale in below the threshold,
    /// scale out above it.
    pub fn scaffold(id: &str, scalable_target: &str) -> Self {
        PolicyDeclaration {
            id: id.to_string(),
            scalable_target: scalable_target.to_string(),
            scope: Vec::new(),
            policy: StepScalingPolicyConfig::default().with_cooldown_seconds(60),
            tiers: vec![
                AdjustmentTier::new(-1).below(0),
                AdjustmentTier::new(1).above(0),
            ],
        }
    }
}
