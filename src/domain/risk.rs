//! Risk estimate produced by the inference pipeline.

use super::InferenceError;

/// Injury-class probability for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskResult {
    /// Positive-class probability (0.0 to 1.0)
    probability: f64,
}

impl RiskResult {
    /// Wrap a classifier probability.
    ///
    /// # Errors
    /// Returns `InferenceError::Numeric` if the probability is not a finite
    /// value in `[0, 1]`.
    pub fn from_probability(probability: f64) -> Result<Self, InferenceError> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::Numeric(format!(
                "classifier returned probability {probability}"
            )));
        }
        Ok(Self { probability })
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Probability as a percentage in `[0, 100]`.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        (self.probability * 100.0).clamp(0.0, 100.0)
    }
}

impl std::fmt::Display for RiskResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Injury Risk: {:.2}%", self.percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_and_display() {
        let risk = RiskResult::from_probability(0.124_269_563_9).expect("valid");
        assert!((risk.percentage() - 12.426_956_39).abs() < 1e-6);
        assert_eq!(risk.to_string(), "Injury Risk: 12.43%");

        assert_eq!(
            RiskResult::from_probability(0.0).expect("valid").to_string(),
            "Injury Risk: 0.00%"
        );
        assert_eq!(
            RiskResult::from_probability(1.0).expect("valid").to_string(),
            "Injury Risk: 100.00%"
        );
    }

    #[test]
    fn test_rejects_invalid_probability() {
        assert!(RiskResult::from_probability(f64::NAN).is_err());
        assert!(RiskResult::from_probability(1.5).is_err());
        assert!(RiskResult::from_probability(-0.1).is_err());
    }
}
