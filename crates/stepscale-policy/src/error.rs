//! Error types for the step scaling policy compiler.

use thiserror::Error;

use crate::tier::AdjustmentTier;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors raised while building a step scaling policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// A tier declared neither a lower nor an upper bound.
    #[error("at least one of lower_bound or upper_bound is required (adjustment {})", .tier.adjustment)]
    InvalidTier { tier: AdjustmentTier },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tier_message_names_the_adjustment() {
        let err = PolicyError::InvalidTier {
            tier: AdjustmentTier::new(5),
        };
        assert_eq!(
            err.to_string(),
            "at least one of lower_bound or upper_bound is required (adjustment 5)"
        );
    }
}
