//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary between
//! the inference pipeline and the fitted artifacts it runs.

mod model;

pub use model::{FeatureScaler, ProbabilityClassifier, POSITIVE_CLASS};
