//! Persisted resource record for a compiled policy.
//!
//! Mirrors the `AWS::ApplicationAutoScaling::ScalingPolicy` template shape:
//! PascalCase keys, `PolicyType = "StepScaling"`, and absent optionals left
//! out rather than written as null.

use serde::Serialize;

use crate::config::{AdjustmentType, MetricAggregationType};
use crate::number::Number;
use crate::policy::CompiledPolicy;
use crate::tier::StepAdjustment;

pub const RESOURCE_TYPE: &str = "AWS::ApplicationAutoScaling::ScalingPolicy";
pub const POLICY_TYPE: &str = "StepScaling";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalingPolicyResource {
    #[serde(skip)]
    logical_id: String,
    #[serde(rename = "Type")]
    pub resource_type: &'static str,
    pub properties: ScalingPolicyProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalingPolicyProperties {
    pub policy_name: String,
    pub policy_type: &'static str,
    pub scaling_target_id: String,
    pub step_scaling_policy_configuration: StepScalingPolicyConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StepScalingPolicyConfiguration {
    pub adjustment_type: AdjustmentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_adjustment_magnitude: Option<Number>,
    pub metric_aggregation_type: MetricAggregationType,
    pub step_adjustments: Vec<StepAdjustmentProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StepAdjustmentProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_interval_lower_bound: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_interval_upper_bound: Option<Number>,
    pub scaling_adjustment: Number,
}

impl From<&StepAdjustment> for StepAdjustmentProperty {
    fn from(step: &StepAdjustment) -> Self {
        Self {
            metric_interval_lower_bound: step.metric_interval_lower_bound,
            metric_interval_upper_bound: step.metric_interval_upper_bound,
            scaling_adjustment: step.scaling_adjustment,
        }
    }
}

impl ScalingPolicyResource {
    pub fn from_compiled(policy: &CompiledPolicy) -> Self {
        let logical_id: String = policy
            .policy_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .chain("Resource".chars())
            .collect();

        Self {
            logical_id,
            resource_type: RESOURCE_TYPE,
            properties: ScalingPolicyProperties {
                policy_name: policy.policy_name.clone(),
                policy_type: POLICY_TYPE,
                scaling_target_id: policy.scalable_target.to_string(),
                step_scaling_policy_configuration: StepScalingPolicyConfiguration {
                    adjustment_type: policy.adjustment_type,
                    cooldown: policy.cooldown_seconds,
                    min_adjustment_magnitude: policy.min_adjustment_magnitude,
                    metric_aggregation_type: policy.metric_aggregation_type,
                    step_adjustments: policy
                        .step_adjustments
                        .iter()
                        .map(StepAdjustmentProperty::from)
                        .collect(),
                },
            },
        }
    }

    /// Template key for this record.
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Render as a `{"Resources": {<logical id>: <record>}}` fragment.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut resources = serde_json::Map::new();
        resources.insert(self.logical_id.clone(), serde_json::to_value(self)?);
        let mut template = serde_json::Map::new();
        template.insert("Resources".to_string(), resources.into());
        serde_json::to_string_pretty(&template)
    }
}
