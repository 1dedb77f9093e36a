//! Domain layer: Core types for injury-risk inference.
//!
//! Pure Rust types with no I/O. The feature vector is a fixed-arity record
//! whose field order is the order the artifacts were fitted with.

mod error;
mod features;
mod risk;

pub use error::InferenceError;
pub use features::{FeatureName, FeatureVector, NUM_FEATURES};
pub use risk::RiskResult;
