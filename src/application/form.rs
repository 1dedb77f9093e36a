//! Form boundary: named field values plus a trigger in, display text out.
//!
//! Every per-request failure ends here as an `Error: ...` response; nothing
//! propagates past the form.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::InferenceService;
use crate::domain::{FeatureName, FeatureVector, InferenceError, RiskResult};
use crate::ports::{FeatureScaler, ProbabilityClassifier};

/// Shown until the user asks for a calculation.
pub const PROMPT: &str = "Enter values and click Calculate Risk.";

/// A submitted form: raw field text keyed by feature key, and the number of
/// times the calculate action has fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskForm {
    #[serde(default)]
    pub n_clicks: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_values")]
    pub values: BTreeMap<String, String>,
}

/// A field value as it arrives over JSON: text from an input box, or a bare
/// number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(serde_json::Number),
}

/// Keys are trimmed; numbers keep their JSON spelling; `null` drops the field.
fn deserialize_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<RawValue>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value? {
                RawValue::Text(text) => text,
                RawValue::Number(number) => number.to_string(),
            };
            Some((key.trim().to_string(), text))
        })
        .collect())
}

impl RiskForm {
    /// Form with no values and no trigger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with the default values for every feature.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut form = Self::new();
        for f in FeatureName::ALL {
            form.set(f.key(), f.default_value().to_string());
        }
        form
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key: String = key.into();
        self.values.insert(key.trim().to_string(), value.into());
    }

    /// Fire the calculate action once.
    pub fn trigger(&mut self) {
        self.n_clicks = Some(self.n_clicks.unwrap_or(0).saturating_add(1));
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.n_clicks.unwrap_or(0) > 0
    }

    fn raw_value(&self, feature: FeatureName) -> Option<&str> {
        self.values
            .get(feature.key())
            .or_else(|| {
                feature
                    .aliases()
                    .iter()
                    .find_map(|alias| self.values.get(*alias))
            })
            .map(String::as_str)
    }

    /// Parse the field text into an ordered feature vector.
    ///
    /// # Errors
    /// Returns `InferenceError::Missing` for an absent or blank field,
    /// `InferenceError::NotNumeric` for text that is not a number, and
    /// `InferenceError::NonFinite` for `inf`/`NaN`.
    pub fn to_features(&self) -> Result<FeatureVector, InferenceError> {
        for key in self.values.keys() {
            if FeatureName::from_key(key).is_none() {
                tracing::debug!("Ignoring unknown form field {:?}", key);
            }
        }

        let mut features = FeatureVector::default();
        for feature in FeatureName::ALL {
            let raw = self
                .raw_value(feature)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or(InferenceError::Missing { feature })?;

            let value: f64 = raw.parse().map_err(|_| InferenceError::NotNumeric {
                feature,
                raw: raw.to_string(),
            })?;
            if !value.is_finite() {
                return Err(InferenceError::NonFinite { feature, value });
            }
            features.set(feature, value);
        }
        Ok(features)
    }
}

/// What the form displays after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResponse {
    /// No calculation requested yet
    Prompt,
    /// Successful estimate
    Risk(RiskResult),
    /// Request failed
    Error(String),
}

impl FormResponse {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl std::fmt::Display for FormResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prompt => f.write_str(PROMPT),
            Self::Risk(risk) => write!(f, "{risk}"),
            Self::Error(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Score a submitted form.
///
/// Without a trigger the field values are not looked at.
pub fn respond<S, C>(service: &InferenceService<S, C>, form: &RiskForm) -> FormResponse
where
    S: FeatureScaler,
    C: ProbabilityClassifier,
{
    if !form.is_triggered() {
        return FormResponse::Prompt;
    }

    match form
        .to_features()
        .and_then(|features| service.compute_risk(&features))
    {
        Ok(risk) => FormResponse::Risk(risk),
        Err(e) => {
            tracing::debug!("Request failed: {}", e);
            FormResponse::Error(e.to_string())
        }
    }
}
