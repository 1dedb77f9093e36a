//! Per-request inference failures.

use super::FeatureName;

/// Errors raised while turning a feature vector into a risk estimate.
///
/// These are recoverable: each one is reported back to the caller of that
/// request and never affects the loaded artifacts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("expected {expected} features, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("{feature}: value is missing")]
    Missing { feature: FeatureName },

    #[error("{feature}: could not convert {raw:?} to a number")]
    NotNumeric { feature: FeatureName, raw: String },

    #[error("{feature}: value {value} is not finite")]
    NonFinite { feature: FeatureName, value: f64 },

    #[error("{feature}: value {value} is outside the expected range {range}")]
    OutOfRange {
        feature: FeatureName,
        value: f64,
        range: &'static str,
    },

    #[error("{component} expects {expected} features, got {got}")]
    ShapeMismatch {
        component: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("numerical failure: {0}")]
    Numeric(String),
}
