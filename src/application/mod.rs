//! Application layer: Use cases and services.
//!
//! This module wires the domain types to the model ports: scoring a feature
//! vector, and the form boundary that turns a submission into display text.

mod form;
mod inference;

pub use form::{respond, FormResponse, RiskForm, PROMPT};
pub use inference::{load_service, ArtifactInferenceService, InferenceService};
