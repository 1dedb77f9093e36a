//! Inference service: Scores a feature vector against the loaded artifacts.
//!
//! The pipeline is:
//! - Validate features (finite, optional range policy)
//! - Normalize with the fitted scaler
//! - Predict class probabilities
//! - Report the injury-class mass as a percentage

use std::sync::Arc;

use crate::adapters::artifacts::{ArtifactLoader, FittedClassifier, FittedScaler};
use crate::config::{AppConfig, RangePolicy};
use crate::domain::{FeatureVector, InferenceError, RiskResult, NUM_FEATURES};
use crate::ports::{FeatureScaler, ProbabilityClassifier};
use crate::PitchriskError;

/// Inference service backed by the JSON artifact adapter.
pub type ArtifactInferenceService = InferenceService<FittedScaler, FittedClassifier>;

/// Service for computing injury risk.
///
/// Holds the scaler and classifier behind `Arc` and never mutates them, so a
/// single service can be shared across threads and called concurrently.
pub struct InferenceService<S, C>
where
    S: FeatureScaler,
    C: ProbabilityClassifier,
{
    scaler: Arc<S>,
    classifier: Arc<C>,
    range_policy: RangePolicy,
}

impl<S, C> Clone for InferenceService<S, C>
where
    S: FeatureScaler,
    C: ProbabilityClassifier,
{
    fn clone(&self) -> Self {
        Self {
            scaler: Arc::clone(&self.scaler),
            classifier: Arc::clone(&self.classifier),
            range_policy: self.range_policy,
        }
    }
}

impl<S, C> InferenceService<S, C>
where
    S: FeatureScaler,
    C: ProbabilityClassifier,
{
    /// Create a new inference service.
    pub fn new(scaler: Arc<S>, classifier: Arc<C>) -> Self {
        Self {
            scaler,
            classifier,
            range_policy: RangePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_range_policy(mut self, range_policy: RangePolicy) -> Self {
        self.range_policy = range_policy;
        self
    }

    #[must_use]
    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    /// Compute the injury risk for one pitcher.
    ///
    /// Pure with respect to the loaded artifacts: the same vector always
    /// yields the same result.
    ///
    /// # Errors
    /// Returns `InferenceError` on non-finite values, on out-of-range values
    /// under `RangePolicy::Reject`, or if the artifacts do not accept a
    /// 9-feature vector.
    pub fn compute_risk(&self, features: &FeatureVector) -> Result<RiskResult, InferenceError> {
        features.validate()?;
        let features = self.apply_range_policy(features)?;

        tracing::debug!("Step 1: Normalizing {} features...", NUM_FEATURES);
        let normalized = self.scaler.transform(&features.to_array())?;

        tracing::debug!("Step 2: Predicting class probabilities...");
        let probability = self.classifier.positive_probability(&normalized)?;

        let risk = RiskResult::from_probability(probability)?;
        tracing::debug!("Inference complete: risk={:.2}%", risk.percentage());
        Ok(risk)
    }

    /// Compute the injury risk from values in fitted order.
    ///
    /// # Errors
    /// Returns `InferenceError::Arity` unless exactly 9 values are given, or
    /// any error from [`InferenceService::compute_risk`].
    pub fn compute_risk_from_slice(&self, values: &[f64]) -> Result<RiskResult, InferenceError> {
        self.compute_risk(&FeatureVector::from_slice(values)?)
    }

    fn apply_range_policy(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
        if self.range_policy == RangePolicy::PassThrough {
            return Ok(*features);
        }

        let out = features.out_of_range();
        let Some(&(feature, value)) = out.first() else {
            return Ok(*features);
        };

        match self.range_policy {
            RangePolicy::Reject => Err(InferenceError::OutOfRange {
                feature,
                value,
                range: feature.advisory_range(),
            }),
            RangePolicy::Clamp => {
                for (feature, value) in &out {
                    tracing::warn!(
                        "Clamping {} = {} into {}",
                        feature,
                        value,
                        feature.advisory_range()
                    );
                }
                Ok(features.clamped())
            }
            RangePolicy::PassThrough => Ok(*features),
        }
    }
}

/// Load both artifacts named by `config` and build a service over them.
///
/// # Errors
/// Returns `PitchriskError::Artifact` if either artifact cannot be loaded.
pub fn load_service(config: &AppConfig) -> Result<ArtifactInferenceService, PitchriskError> {
    let (scaler, classifier) = ArtifactLoader::new()
        .require_manifest(config.require_manifest)
        .load(&config.scaler_path, &config.model_path)?;

    tracing::info!("Inference service ready (range_policy={})", config.range_policy);
    Ok(InferenceService::new(Arc::new(scaler), Arc::new(classifier))
        .with_range_policy(config.range_policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifacts::load_artifacts;
    use crate::domain::FeatureName;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::path::Path;

    const EXAMPLE: [f64; NUM_FEATURES] = [100.0, 80.0, 2200.0, 12.0, 15.0, 95.0, 85.0, 50.0, 80.0];

    fn create_test_service() -> ArtifactInferenceService {
        load_service(&AppConfig::default()).expect("shipped artifacts should load")
    }

    /// Weights every feature differently so no permutation is neutral.
    fn synthetic_service() -> InferenceService<FittedScaler, FittedClassifier> {
        let scaler = FittedScaler::Standard {
            feature_names: None,
            mean: vec![0.0; NUM_FEATURES],
            scale: vec![1.0; NUM_FEATURES],
        };
        let classifier = FittedClassifier::Logistic {
            feature_names: None,
            classes: [0, 1],
            coefficients: (1..=NUM_FEATURES).map(|i| i as f64 * 1e-5).collect(),
            intercept: -2.0,
        };
        InferenceService::new(Arc::new(scaler), Arc::new(classifier))
    }

    #[test]
    fn test_example_scenario_is_pinned() {
        let service = create_test_service();
        let risk = service
            .compute_risk(&FeatureVector::from_array(EXAMPLE))
            .expect("Should run inference");
        assert!((risk.percentage() - 12.426_956).abs() < 1e-4);
        assert_eq!(risk.to_string(), "Injury Risk: 12.43%");
    }

    #[test]
    fn test_fitted_means_score_at_intercept() {
        let service = create_test_service();
        let means = [120.0, 110.0, 2250.0, 10.0, 15.0, 93.5, 83.0, 45.0, 84.0];
        let risk = service.compute_risk_from_slice(&means).expect("infer");
        assert_eq!(risk.to_string(), "Injury Risk: 16.80%");
    }

    #[test]
    fn test_results_stay_within_bounds() {
        let service = create_test_service();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let values: Vec<f64> = FeatureName::ALL
                .iter()
                .map(|f| {
                    let (lo, hi) = f.bounds();
                    // Sample well past the advisory range on both sides.
                    let span = hi - lo;
                    rng.gen_range((lo - 5.0 * span)..(hi + 5.0 * span))
                })
                .collect();
            let risk = service.compute_risk_from_slice(&values).expect("infer");
            assert!((0.0..=100.0).contains(&risk.percentage()));
        }

        let extreme = [1e300; NUM_FEATURES];
        let risk = service.compute_risk_from_slice(&extreme).expect("infer");
        assert!((0.0..=100.0).contains(&risk.percentage()));
    }

    #[test]
    fn test_deterministic() {
        let service = create_test_service();
        let features = FeatureVector::from_array(EXAMPLE);
        let first = service.compute_risk(&features).expect("infer");
        for _ in 0..10 {
            assert_eq!(service.compute_risk(&features).expect("infer"), first);
        }
    }

    #[test]
    fn test_order_sensitive() {
        let service = synthetic_service();
        let base = service.compute_risk_from_slice(&EXAMPLE).expect("infer");

        let mut reversed = EXAMPLE;
        reversed.reverse();
        let mut rotated = EXAMPLE;
        rotated.rotate_left(1);
        let mut swapped = EXAMPLE;
        swapped.swap(0, 1);

        for permuted in [reversed, rotated, swapped] {
            let risk = service.compute_risk_from_slice(&permuted).expect("infer");
            assert_ne!(risk, base, "permutation {permuted:?} scored the same");
        }

        let shipped = create_test_service();
        assert_ne!(
            shipped.compute_risk_from_slice(&swapped).expect("infer"),
            shipped.compute_risk_from_slice(&EXAMPLE).expect("infer")
        );
    }

    #[test]
    fn test_load_idempotent() {
        let scaler_path = Path::new("models/scaler.json");
        let model_path = Path::new("models/logistic_model.json");

        let (s1, c1) = load_artifacts(scaler_path, model_path).expect("first load");
        let (s2, c2) = load_artifacts(scaler_path, model_path).expect("second load");
        assert_eq!(s1, s2);
        assert_eq!(c1, c2);

        let a = InferenceService::new(Arc::new(s1), Arc::new(c1));
        let b = InferenceService::new(Arc::new(s2), Arc::new(c2));
        assert_eq!(
            a.compute_risk_from_slice(&EXAMPLE).expect("infer"),
            b.compute_risk_from_slice(&EXAMPLE).expect("infer")
        );
    }

    #[test]
    fn test_wrong_arity() {
        let service = create_test_service();
        let err = service
            .compute_risk_from_slice(&EXAMPLE[..7])
            .expect_err("must fail");
        assert_eq!(err, InferenceError::Arity { expected: 9, got: 7 });
    }

    #[test]
    fn test_non_finite_rejected() {
        let service = create_test_service();
        let mut features = FeatureVector::from_array(EXAMPLE);
        features.fastball_avg_spin = f64::INFINITY;
        let err = service.compute_risk(&features).expect_err("must fail");
        assert!(matches!(
            err,
            InferenceError::NonFinite {
                feature: FeatureName::FastballAvgSpin,
                ..
            }
        ));
    }

    #[test]
    fn test_artifact_shape_mismatch_surfaces_as_inference_error() {
        let scaler = FittedScaler::Standard {
            feature_names: None,
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        };
        let classifier = FittedClassifier::Logistic {
            feature_names: None,
            classes: [0, 1],
            coefficients: vec![1.0; 4],
            intercept: 0.0,
        };
        let service = InferenceService::new(Arc::new(scaler), Arc::new(classifier));
        let err = service
            .compute_risk_from_slice(&EXAMPLE)
            .expect_err("must fail");
        assert_eq!(
            err,
            InferenceError::ShapeMismatch {
                component: "scaler",
                expected: 4,
                got: 9
            }
        );
    }

    #[test]
    fn test_range_policies() {
        let mut features = FeatureVector::from_array(EXAMPLE);
        features.fastball_avg_speed = 130.0;

        let pass = create_test_service();
        assert_eq!(pass.range_policy(), RangePolicy::PassThrough);
        let passed = pass.compute_risk(&features).expect("pass through");

        let reject = create_test_service().with_range_policy(RangePolicy::Reject);
        let err = reject.compute_risk(&features).expect_err("must fail");
        assert_eq!(
            err,
            InferenceError::OutOfRange {
                feature: FeatureName::FastballAvgSpeed,
                value: 130.0,
                range: "80 - 105 mph",
            }
        );
        assert!(reject
            .compute_risk(&FeatureVector::from_array(EXAMPLE))
            .is_ok());

        let clamp = create_test_service().with_range_policy(RangePolicy::Clamp);
        let clamped = clamp.compute_risk(&features).expect("clamp");
        let mut at_bound = features;
        at_bound.fastball_avg_speed = 105.0;
        assert_eq!(clamped, pass.compute_risk(&at_bound).expect("infer"));
        assert_ne!(clamped, passed);
    }

    #[test]
    fn test_concurrent_requests_share_service() {
        let service = create_test_service();
        let expected = service.compute_risk_from_slice(&EXAMPLE).expect("infer");

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let service = service.clone();
                    s.spawn(move || service.compute_risk_from_slice(&EXAMPLE))
                })
                .collect();
            for handle in handles {
                let risk = handle.join().expect("thread").expect("infer");
                assert_eq!(risk, expected);
            }
        });
    }
}
