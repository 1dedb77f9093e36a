//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: JSON exports of the fitted scaler and classifier, with
//!   optional SHA-256 manifest verification

pub mod artifacts;

pub use artifacts::{ArtifactLoadError, ArtifactLoader, FittedClassifier, FittedScaler};
