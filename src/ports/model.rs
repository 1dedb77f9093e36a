//! Model ports: Traits for the fitted scaler and classifier.
//!
//! These traits abstract the artifact format from the inference pipeline, so
//! the service can be driven by synthetic models in tests.

use crate::domain::InferenceError;

/// Class label treated as "injury".
pub const POSITIVE_CLASS: i64 = 1;

/// A fitted feature normalization.
pub trait FeatureScaler: Send + Sync {
    /// Number of features the transform was fitted on.
    fn n_features(&self) -> usize;

    /// Map raw features to the scale the classifier was trained on.
    ///
    /// The output has the same length and order as the input.
    ///
    /// # Errors
    /// Returns `InferenceError::ShapeMismatch` if `raw` has the wrong length.
    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// A fitted binary probability model.
pub trait ProbabilityClassifier: Send + Sync {
    /// Number of features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Class labels, in the order `predict_proba` reports them.
    fn classes(&self) -> [i64; 2];

    /// Probability distribution over the two classes.
    ///
    /// # Errors
    /// Returns `InferenceError::ShapeMismatch` if `normalized` has the wrong
    /// length, or `InferenceError::Numeric` if the result is not a distribution.
    fn predict_proba(&self, normalized: &[f64]) -> Result<[f64; 2], InferenceError>;

    /// Probability mass assigned to [`POSITIVE_CLASS`].
    ///
    /// # Errors
    /// Propagates `predict_proba` errors, and fails if no class carries the
    /// positive label.
    fn positive_probability(&self, normalized: &[f64]) -> Result<f64, InferenceError> {
        let idx = self
            .classes()
            .iter()
            .position(|&c| c == POSITIVE_CLASS)
            .ok_or_else(|| {
                InferenceError::Numeric(format!(
                    "classifier has no class labelled {POSITIVE_CLASS}"
                ))
            })?;
        Ok(self.predict_proba(normalized)?[idx])
    }
}
