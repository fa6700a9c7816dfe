//! Step scaling policy compiler.
//!
//! A [`StepScalingAction`] owns one [`TierTable`] and a policy config. Tiers
//! may be added at any point before the policy is handed to the renderer;
//! [`StepScalingAction::compile`] always reads the table as it is now.

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::alarm::AlarmAction;
use crate::config::{
    AdjustmentType, MetricAggregationType, PolicyDeclaration, StepScalingPolicyConfig,
};
use crate::error::PolicyResult;
use crate::naming::NameGenerator;
use crate::number::Number;
use crate::partition::PartitionIssue;
use crate::tier::{AdjustmentTier, StepAdjustment, TierTable};

/// Opaque identifier of the resource whose capacity the policy adjusts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScalableTargetId(String);

impl ScalableTargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScalableTargetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ScalableTargetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ScalableTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference the scalable target uses to look up or attach the policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyRef(String);

impl PolicyRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference an alarm source uses to invoke the policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionRef(String);

impl ActionRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&PolicyRef> for ActionRef {
    fn from(policy: &PolicyRef) -> Self {
        Self(policy.0.clone())
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable snapshot of a policy, ready for the resource renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPolicy {
    pub policy_name: String,
    pub scalable_target: ScalableTargetId,
    pub adjustment_type: AdjustmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_adjustment_magnitude: Option<Number>,
    pub metric_aggregation_type: MetricAggregationType,
    /// Tiers in insertion order.
    pub step_adjustments: Vec<StepAdjustment>,
    pub policy_ref: PolicyRef,
    pub action_ref: ActionRef,
}

/// A step scaling policy under construction.
///
/// Adjusts the target's capacity in steps sized by the alarm metric's
/// distance from its threshold. Only takes effect once bound as an alarm
/// action (see [`StepScalingAction::as_alarm_action`]).
#[derive(Debug)]
pub struct StepScalingAction {
    target: ScalableTargetId,
    policy_name: String,
    config: StepScalingPolicyConfig,
    tiers: TierTable,
    policy_ref: PolicyRef,
    action_ref: ActionRef,
}

impl StepScalingAction {
    /// Create a policy for `target`.
    ///
    /// The name is `config.policy_name` when given, otherwise `names`
    /// generates one from `id`. Both references are fixed here and never
    /// change for the lifetime of the instance.
    pub fn new(
        target: impl Into<ScalableTargetId>,
        id: &str,
        config: StepScalingPolicyConfig,
        names: &mut dyn NameGenerator,
    ) -> Self {
        let target = target.into();
        let policy_name = match &config.policy_name {
            Some(name) => name.clone(),
            None => names.unique_name(id),
        };
        config.note_unused_fields();

        let policy_ref = PolicyRef(format!("{target}/scalingPolicy/{policy_name}"));
        let action_ref = ActionRef::from(&policy_ref);

        debug!(
            policy = %policy_name,
            target = %target,
            adjustment_type = ?config.adjustment_type,
            "step scaling policy created"
        );

        Self {
            target,
            policy_name,
            config,
            tiers: TierTable::new(),
            policy_ref,
            action_ref,
        }
    }

    /// Build a policy from a parsed declaration, admitting its tiers in
    /// order. Fails on the first invalid tier.
    pub fn from_declaration(
        declaration: &PolicyDeclaration,
        names: &mut dyn NameGenerator,
    ) -> anyhow::Result<Self> {
        let mut action = Self::new(
            declaration.scalable_target.as_str(),
            &declaration.id,
            declaration.policy.clone(),
            names,
        );
        for (index, tier) in declaration.tiers.iter().enumerate() {
            action
                .add_adjustment(tier.clone())
                .with_context(|| format!("tier {index} of policy {}", action.policy_name))?;
        }
        Ok(action)
    }

    /// Add an adjustment tier.
    ///
    /// Fails immediately if the tier has neither bound; nothing is recorded
    /// in that case.
    pub fn add_adjustment(&mut self, tier: AdjustmentTier) -> PolicyResult<()> {
        if let Err(e) = self.tiers.add_adjustment(tier) {
            warn!(policy = %self.policy_name, error = %e, "adjustment tier rejected");
            return Err(e);
        }
        Ok(())
    }

    /// Compile the current config and tiers.
    pub fn compile(&self) -> CompiledPolicy {
        CompiledPolicy {
            policy_name: self.policy_name.clone(),
            scalable_target: self.target.clone(),
            adjustment_type: self.config.adjustment_type,
            cooldown_seconds: self.config.cooldown_seconds,
            min_adjustment_magnitude: self.config.min_adjustment_magnitude,
            metric_aggregation_type: self.config.metric_aggregation_type,
            step_adjustments: self.tiers.snapshot(),
            policy_ref: self.policy_ref.clone(),
            action_ref: self.action_ref.clone(),
        }
    }

    /// The reference an alarm source binds to invoke this policy.
    pub fn as_alarm_action(&self) -> ActionRef {
        self.action_ref.clone()
    }

    pub fn policy_ref(&self) -> &PolicyRef {
        &self.policy_ref
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    pub fn scalable_target(&self) -> &ScalableTargetId {
        &self.target
    }

    pub fn config(&self) -> &StepScalingPolicyConfig {
        &self.config
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Report gaps and overlaps across the current tiers.
    pub fn check_partition(&self) -> Vec<PartitionIssue> {
        self.tiers.check_partition()
    }
}

impl AlarmAction for StepScalingAction {
    fn alarm_action_ref(&self) -> ActionRef {
        self.as_alarm_action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolicyError;
    use crate::naming::SequentialNames;

    fn action(config: StepScalingPolicyConfig) -> StepScalingAction {
        let mut names = SequentialNames::new("policy-");
        StepScalingAction::new("service/default/api", "Scaling", config, &mut names)
    }

    #[test]
    fn empty_config_compiles_with_defaults() {
        let compiled = action(StepScalingPolicyConfig::default()).compile();

        assert_eq!(compiled.adjustment_type, AdjustmentType::ChangeInCapacity);
        assert_eq!(compiled.metric_aggregation_type, MetricAggregationType::Average);
        assert_eq!(compiled.cooldown_seconds, None);
        assert_eq!(compiled.min_adjustment_magnitude, None);
        assert!(compiled.step_adjustments.is_empty());
    }

    #[test]
    fn tiers_emitted_in_insertion_order() {
        let mut policy = action(StepScalingPolicyConfig::default());
        policy.add_adjustment(AdjustmentTier::new(1).above(0)).unwrap();
        policy.add_adjustment(AdjustmentTier::new(-1).below(0)).unwrap();

        let json = serde_json::to_value(policy.compile().step_adjustments).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"metricIntervalLowerBound": 0, "scalingAdjustment": 1},
                {"metricIntervalUpperBound": 0, "scalingAdjustment": -1},
            ])
        );
    }

    #[test]
    fn rejected_tier_fails_at_call_time_and_leaves_policy_empty() {
        let mut policy = action(StepScalingPolicyConfig::default());

        let err = policy.add_adjustment(AdjustmentTier::new(5)).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidTier { .. }));
        assert_eq!(policy.tier_count(), 0);
        assert!(policy.compile().step_adjustments.is_empty());
    }

    #[test]
    fn percent_config_without_tiers() {
        let config = StepScalingPolicyConfig::default()
            .with_adjustment_type(AdjustmentType::PercentChangeInCapacity)
            .with_min_adjustment_magnitude(2);
        let compiled = action(config).compile();

        assert_eq!(
            compiled.adjustment_type,
            AdjustmentType::PercentChangeInCapacity
        );
        assert_eq!(compiled.min_adjustment_magnitude, Some(Number::Int(2)));
        assert!(compiled.step_adjustments.is_empty());
    }

    #[test]
    fn magnitude_without_percent_type_is_accepted() {
        let config = StepScalingPolicyConfig::default()
            .with_adjustment_type(AdjustmentType::ExactCapacity)
            .with_min_adjustment_magnitude(3);
        let compiled = action(config).compile();
        assert_eq!(compiled.min_adjustment_magnitude, Some(Number::Int(3)));
    }

    #[test]
    fn compile_is_idempotent() {
        let mut policy = action(StepScalingPolicyConfig::default().with_cooldown_seconds(30));
        policy.add_adjustment(AdjustmentTier::new(2).above(10)).unwrap();
        assert_eq!(policy.compile(), policy.compile());
    }

    #[test]
    fn compile_reflects_later_additions() {
        let mut policy = action(StepScalingPolicyConfig::default());
        policy.add_adjustment(AdjustmentTier::new(1).above(0)).unwrap();
        let first = policy.compile();

        policy.add_adjustment(AdjustmentTier::new(-1).below(0)).unwrap();
        let second = policy.compile();

        assert_eq!(second.step_adjustments.len(), first.step_adjustments.len() + 1);
        assert_eq!(second.step_adjustments[..1], first.step_adjustments[..]);
    }

    #[test]
    fn explicit_name_wins_over_generator() {
        let mut names = SequentialNames::new("gen-");
        let config = StepScalingPolicyConfig::default().with_policy_name("api-scale-out");
        let policy = StepScalingAction::new("t", "Scaling", config, &mut names);
        assert_eq!(policy.policy_name(), "api-scale-out");

        // The generator was not consulted.
        assert_eq!(names.unique_name("next"), "gen-next1");
    }

    #[test]
    fn generated_name_comes_from_injected_generator() {
        let policy = action(StepScalingPolicyConfig::default());
        assert_eq!(policy.policy_name(), "policy-Scaling1");
    }

    #[test]
    fn alarm_action_is_stable_and_matches_policy_ref() {
        let mut policy = action(StepScalingPolicyConfig::default());
        let before = policy.as_alarm_action();
        policy.add_adjustment(AdjustmentTier::new(1).above(0)).unwrap();

        assert_eq!(policy.as_alarm_action(), before);
        assert_eq!(before.as_str(), policy.policy_ref().as_str());

        let compiled = policy.compile();
        assert_eq!(compiled.action_ref, before);
        assert_eq!(&compiled.policy_ref, policy.policy_ref());
    }

    #[test]
    fn distinct_policies_have_distinct_refs() {
        let mut names = SequentialNames::new("p");
        let up = StepScalingAction::new("t", "Up", StepScalingPolicyConfig::default(), &mut names);
        let down =
            StepScalingAction::new("t", "Down", StepScalingPolicyConfig::default(), &mut names);
        assert_ne!(up.as_alarm_action(), down.as_alarm_action());
    }

    #[test]
    fn compiled_policy_shape() {
        let config = StepScalingPolicyConfig::default()
            .with_policy_name("api")
            .with_cooldown_seconds(60);
        let mut names = SequentialNames::new("p");
        let mut policy = StepScalingAction::new("svc", "Scaling", config, &mut names);
        policy
            .add_adjustment(AdjustmentTier::new(2.5).above(0).below(10))
            .unwrap();

        let json = serde_json::to_value(policy.compile()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "policyName": "api",
                "scalableTarget": "svc",
                "adjustmentType": "ChangeInCapacity",
                "cooldownSeconds": 60,
                "metricAggregationType": "Average",
                "stepAdjustments": [
                    {
                        "metricIntervalLowerBound": 0,
                        "metricIntervalUpperBound": 10,
                        "scalingAdjustment": 2.5
                    }
                ],
                "policyRef": "svc/scalingPolicy/api",
                "actionRef": "svc/scalingPolicy/api",
            })
        );
    }

    #[test]
    fn from_declaration_admits_tiers_in_order() {
        let decl = PolicyDeclaration::scaffold("ScaleOut", "service/default/api");
        let mut names = SequentialNames::new("p");
        let policy = StepScalingAction::from_declaration(&decl, &mut names).unwrap();

        assert_eq!(policy.tier_count(), 2);
        assert_eq!(policy.config().cooldown_seconds, Some(60));
        assert!(policy.check_partition().is_empty());
    }

    #[test]
    fn from_declaration_names_the_bad_tier() {
        let mut decl = PolicyDeclaration::scaffold("ScaleOut", "t");
        decl.tiers.push(AdjustmentTier::new(9));
        let mut names = SequentialNames::new("p");

        let err = StepScalingAction::from_declaration(&decl, &mut names).unwrap_err();
        assert!(err.to_string().starts_with("tier 2 of policy"));
        assert!(err.downcast_ref::<PolicyError>().is_some());
    }
}
