//! # Pitchrisk
//!
//! Pitcher injury-risk estimation from a fitted feature scaler and a fitted
//! binary classifier.
//!
//! This crate provides:
//! - Loading and verification of the scaler/classifier artifacts
//! - A stateless inference service over nine pitcher features
//! - A form boundary (field text + trigger in, display string out)
//! - Terminal UI for interactive use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (FeatureVector, RiskResult, InferenceError)
//! - `ports`: Trait definitions for the fitted scaler and classifier
//! - `adapters`: JSON artifact formats and the artifact loader
//! - `application`: The inference service and form boundary
//! - `config`: Environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use adapters::ArtifactLoadError;
pub use domain::{FeatureName, FeatureVector, InferenceError, RiskResult};

/// Result type for Pitchrisk operations
pub type Result<T> = std::result::Result<T, PitchriskError>;

/// Main error type for Pitchrisk
#[derive(Debug, thiserror::Error)]
pub enum PitchriskError {
    #[error("Artifact load failed: {0}")]
    Artifact(#[from] ArtifactLoadError),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
