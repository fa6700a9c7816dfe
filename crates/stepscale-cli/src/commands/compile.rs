use std::fmt::{self, Write as _};
use std::path::Path;

use clap::ValueEnum;
use stepscale_policy::{
    CompiledPolicy, PathNames, PolicyDeclaration, ScalingPolicyResource, StepScalingAction,
};
use tracing::info;

/// What `compile` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The compiled policy.
    Json,
    /// The ScalingPolicy template fragment.
    Resource,
    /// A human-readable tier table.
    Text,
}

fn load(path: &str) -> anyhow::Result<StepScalingAction> {
    let declaration = PolicyDeclaration::from_file(Path::new(path))?;
    let mut names = PathNames::new(declaration.scope.clone());
    let action = StepScalingAction::from_declaration(&declaration, &mut names)?;
    info!(
        policy = %action.policy_name(),
        tiers = action.tier_count(),
        "policy loaded"
    );
    Ok(action)
}

pub fn compile(path: &str, format: OutputFormat) -> anyhow::Result<()> {
    let compiled = load(path)?.compile();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&compiled)?);
        }
        OutputFormat::Resource => {
            println!("{}", ScalingPolicyResource::from_compiled(&compiled).to_json()?);
        }
        OutputFormat::Text => {
            print!("{}", format_table(&compiled)?);
        }
    }

    Ok(())
}

pub fn check(path: &str) -> anyhow::Result<()> {
    let action = load(path)?;
    let issues = action.check_partition();

    if issues.is_empty() {
        println!("✓ {} tiers are contiguous", action.tier_count());
        return Ok(());
    }
    for issue in &issues {
        eprintln!("✗ {issue}");
    }
    anyhow::bail!("{} partition issue(s) in {}", issues.len(), action.policy_name())
}

fn format_table(policy: &CompiledPolicy) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Policy:      {}", policy.policy_name)?;
    writeln!(out, "Target:      {}", policy.scalable_target)?;
    writeln!(out, "Adjustment:  {:?}", policy.adjustment_type)?;
    writeln!(out, "Aggregation: {:?}", policy.metric_aggregation_type)?;
    if let Some(cooldown) = policy.cooldown_seconds {
        writeln!(out, "Cooldown:    {cooldown}s")?;
    }
    if let Some(magnitude) = policy.min_adjustment_magnitude {
        writeln!(out, "Min change:  {magnitude}")?;
    }
    writeln!(out)?;
    writeln!(out, "{:>10}  {:>10}  {:>10}", "lower", "upper", "adjust")?;
    for step in &policy.step_adjustments {
        let lower = step
            .metric_interval_lower_bound
            .map_or_else(|| "-inf".to_string(), |n| n.to_string());
        let upper = step
            .metric_interval_upper_bound
            .map_or_else(|| "+inf".to_string(), |n| n.to_string());
        writeln!(
            out,
            "{lower:>10}  {upper:>10}  {:>10}",
            step.scaling_adjustment.to_string()
        )?;
    }
    Ok(out)
}
