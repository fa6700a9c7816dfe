//! Numeric values that keep their integer-ness through serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A signed integer or float.
///
/// Adjustments and interval bounds are declared as either; keeping the
/// distinction means an integral `1` is rendered as `1`, not `1.0`.
/// Non-finite floats have no JSON form and render as `null`;
/// [`check_partition`](crate::partition::check_partition) flags NaN bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value as an `f64`, for interval comparisons.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(v.into())
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}
