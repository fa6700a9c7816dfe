//! stepscale-policy — step scaling policy compiler.
//!
//! Takes a set of capacity-adjustment tiers keyed to a metric's distance
//! from its alarm threshold, admits them one at a time, and compiles them
//! together with policy-wide settings into a single declarative step
//! scaling policy. The compiled policy is plain data: rendering it into a
//! persisted resource record, attaching it to a scalable target and
//! invoking it from an alarm all happen elsewhere.
//!
//! # Flow
//!
//! ```text
//! StepScalingAction::new(target, id, config, names)
//!   .add_adjustment(tier)   -> TierTable admission (shape check only)
//!   .add_adjustment(tier)
//!   .compile()              -> CompiledPolicy (current tiers, insertion order)
//!   .as_alarm_action()      -> ActionRef (stable per instance)
//! ```
//!
//! # Components
//!
//! - **`tier`** — `AdjustmentTier` admission and the insertion-ordered `TierTable`
//! - **`policy`** — the compiler (`StepScalingAction`) and `CompiledPolicy`
//! - **`config`** — policy-level settings and the TOML declaration format
//! - **`naming`** — injected unique-name generators
//! - **`alarm`** — the alarm action capability
//! - **`partition`** — opt-in gap/overlap report across tiers
//! - **`render`** — the persisted `ScalingPolicy` resource record

pub mod alarm;
pub mod config;
pub mod error;
pub mod naming;
pub mod number;
pub mod partition;
pub mod policy;
pub mod render;
pub mod tier;

pub use alarm::{AlarmAction, AlarmActions};
pub use config::{
    AdjustmentType, MetricAggregationType, PolicyDeclaration, StepScalingPolicyConfig,
};
pub use error::{PolicyError, PolicyResult};
pub use naming::{NameGenerator, PathNames, SequentialNames};
pub use number::Number;
pub use partition::{check_partition, PartitionIssue};
pub use policy::{ActionRef, CompiledPolicy, PolicyRef, ScalableTargetId, StepScalingAction};
pub use render::ScalingPolicyResource;
pub use tier::{AdjustmentTier, StepAdjustment, TierTable};
