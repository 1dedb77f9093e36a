//! Artifact adapter: Fitted scaler and classifier loaded from JSON exports.
//!
//! The training pipeline exports two documents, each tagged with a `kind`:
//!
//! - `scaler.json`: `standard` (`mean`, `scale`) or `min_max` (`min`, `scale`)
//! - `logistic_model.json`: `logistic` (`coefficients`, `intercept`, `classes`)
//!
//! Both may carry `feature_names`; when present they must list known features
//! at their fitted positions, so a reordered export is rejected at load time.
//!
//! # Integrity
//!
//! If a `manifest.json` sits next to an artifact, the artifact's SHA-256 digest
//! must match the entry bound to its file name. The digest is computed over the
//! exact bytes that are parsed. With `require_manifest` set, an artifact that no
//! manifest binds is refused.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureName, InferenceError};
use crate::ports::{FeatureScaler, ProbabilityClassifier, POSITIVE_CLASS};

/// Default scaler file name inside an artifact directory.
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Default classifier file name inside an artifact directory.
pub const DEFAULT_MODEL_FILE: &str = "logistic_model.json";

/// Integrity manifest file name.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Only supported manifest version.
pub const MANIFEST_VERSION: u32 = 1;

/// Errors raised while loading artifacts. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("artifact not found at {0:?}")]
    Missing(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not a valid {expected} artifact: {source}")]
    Malformed {
        path: PathBuf,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("scaler was fitted on {scaler} features but classifier on {classifier}")]
    Incompatible { scaler: usize, classifier: usize },

    #[error("SHA-256 digest of {path:?} does not match its manifest entry")]
    DigestMismatch { path: PathBuf },

    #[error("manifest error: {0}")]
    Manifest(String),
}

/// Digest manifest binding artifact files to their SHA-256 hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    /// File name -> lowercase hex SHA-256
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Hash the named files inside `dir`.
    ///
    /// # Errors
    /// Returns error if any file is missing or unreadable.
    pub fn for_files(dir: &Path, names: &[&str]) -> Result<Self, ArtifactLoadError> {
        let mut files = BTreeMap::new();
        for name in names {
            let bytes = read_artifact(&dir.join(name))?;
            files.insert((*name).to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }

    fn read(path: &Path) -> Result<Self, ArtifactLoadError> {
        let bytes = read_artifact(path)?;
        let manifest: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ArtifactLoadError::Manifest(format!("invalid {path:?}: {e}")))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactLoadError::Manifest(format!(
                "unsupported manifest version: {}",
                manifest.version
            )));
        }
        Ok(manifest)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactLoadError> {
    if !path.exists() {
        return Err(ArtifactLoadError::Missing(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| ArtifactLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Fitted feature normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    /// `z = (x - mean) / scale`
    Standard {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `z = x * scale + min`
    MinMax {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl FittedScaler {
    fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Standard { feature_names, .. } | Self::MinMax { feature_names, .. } => {
                feature_names.as_deref()
            }
        }
    }

    fn check(&self) -> Result<(), String> {
        let (a, b) = match self {
            Self::Standard { mean, scale, .. } => (mean, scale),
            Self::MinMax { min, scale, .. } => (min, scale),
        };
        if a.is_empty() {
            return Err("scaler has no parameters".into());
        }
        if a.len() != b.len() {
            return Err(format!(
                "scaler parameter lengths differ ({} vs {})",
                a.len(),
                b.len()
            ));
        }
        check_finite("scaler", a.iter().chain(b.iter()))?;
        check_feature_names(self.feature_names(), a.len())
    }
}

impl FeatureScaler for FittedScaler {
    fn n_features(&self) -> usize {
        match self {
            Self::Standard { mean, .. } => mean.len(),
            Self::MinMax { min, .. } => min.len(),
        }
    }

    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_shape("scaler", self.n_features(), raw.len())?;
        let out = match self {
            Self::Standard { mean, scale, .. } => raw
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| {
                    // Constant features are fitted with a zero scale.
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    (x - m) / s
                })
                .collect(),
            Self::MinMax { min, scale, .. } => raw
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };
        Ok(out)
    }
}

fn default_classes() -> [i64; 2] {
    [0, POSITIVE_CLASS]
}

/// Fitted binary classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedClassifier {
    /// `p(classes[1]) = sigmoid(coefficients · z + intercept)`
    Logistic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        #[serde(default = "default_classes")]
        classes: [i64; 2],
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

impl FittedClassifier {
    fn check(&self) -> Result<(), String> {
        let Self::Logistic {
            feature_names,
            classes,
            coefficients,
            intercept,
        } = self;
        if coefficients.is_empty() {
            return Err("classifier has no coefficients".into());
        }
        check_finite(
            "classifier",
            coefficients.iter().chain(std::iter::once(intercept)),
        )?;
        if classes[0] == classes[1] || !classes.contains(&POSITIVE_CLASS) {
            return Err(format!(
                "classifier classes must be two distinct labels including {POSITIVE_CLASS}, got {classes:?}"
            ));
        }
        check_feature_names(feature_names.as_deref(), coefficients.len())
    }
}

impl ProbabilityClassifier for FittedClassifier {
    fn n_features(&self) -> usize {
        let Self::Logistic { coefficients, .. } = self;
        coefficients.len()
    }

    fn classes(&self) -> [i64; 2] {
        let Self::Logistic { classes, .. } = self;
        *classes
    }

    fn predict_proba(&self, normalized: &[f64]) -> Result<[f64; 2], InferenceError> {
        let Self::Logistic {
            coefficients,
            intercept,
            ..
        } = self;
        check_shape("classifier", coefficients.len(), normalized.len())?;

        let logit = coefficients
            .iter()
            .zip(normalized)
            .map(|(c, z)| c * z)
            .sum::<f64>()
            + intercept;
        if logit.is_nan() {
            return Err(InferenceError::Numeric("decision function is NaN".into()));
        }

        let p = sigmoid(logit);
        Ok([1.0 - p, p])
    }
}

/// Logistic function without overflow for large `|t|`.
fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}

fn check_shape(component: &'static str, expected: usize, got: usize) -> Result<(), InferenceError> {
    if expected != got {
        return Err(InferenceError::ShapeMismatch {
            component,
            expected,
            got,
        });
    }
    Ok(())
}

fn check_finite<'a>(what: &str, values: impl Iterator<Item = &'a f64>) -> Result<(), String> {
    if values.into_iter().any(|v| !v.is_finite()) {
        return Err(format!("{what} parameters must be finite"));
    }
    Ok(())
}

/// Names must match the parameter count, and known features must sit at
/// their fitted positions.
fn check_feature_names(names: Option<&[String]>, n: usize) -> Result<(), String> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.len() != n {
        return Err(format!(
            "feature_names has {} entries but parameters have {n}",
            names.len()
        ));
    }
    for (i, name) in names.iter().enumerate() {
        if let Some(feature) = FeatureName::from_key(name) {
            if feature.index() != i {
                return Err(format!(
                    "feature {name:?} listed at position {i}, expected {}",
                    feature.index()
                ));
            }
        }
    }
    Ok(())
}

/// Loads and verifies the artifact pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactLoader {
    require_manifest: bool,
}

impl ArtifactLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse artifacts not bound by a manifest.
    #[must_use]
    pub fn require_manifest(mut self, require: bool) -> Self {
        self.require_manifest = require;
        self
    }

    /// Load both artifacts and check they agree on the feature count.
    ///
    /// # Errors
    /// Returns `ArtifactLoadError` if either file is missing, unreadable,
    /// malformed, fails its digest check, or the two disagree.
    pub fn load(
        &self,
        scaler_path: &Path,
        model_path: &Path,
    ) -> Result<(FittedScaler, FittedClassifier), ArtifactLoadError> {
        let scaler = self.load_scaler(scaler_path)?;
        let classifier = self.load_classifier(model_path)?;

        if scaler.n_features() != classifier.n_features() {
            return Err(ArtifactLoadError::Incompatible {
                scaler: scaler.n_features(),
                classifier: classifier.n_features(),
            });
        }

        tracing::info!(
            "Loaded artifacts (scaler={:?}, classifier={:?}, n_features={})",
            scaler_path,
            model_path,
            scaler.n_features()
        );
        Ok((scaler, classifier))
    }

    /// Load a fitted scaler.
    ///
    /// # Errors
    /// See [`ArtifactLoader::load`].
    pub fn load_scaler(&self, path: &Path) -> Result<FittedScaler, ArtifactLoadError> {
        let bytes = self.read_verified(path)?;
        let scaler: FittedScaler =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Malformed {
                path: path.to_path_buf(),
                expected: "scaler",
                source,
            })?;
        scaler.check().map_err(|reason| ArtifactLoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(scaler)
    }

    /// Load a fitted classifier.
    ///
    /// # Errors
    /// See [`ArtifactLoader::load`].
    pub fn load_classifier(&self, path: &Path) -> Result<FittedClassifier, ArtifactLoadError> {
        let bytes = self.read_verified(path)?;
        let classifier: FittedClassifier =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Malformed {
                path: path.to_path_buf(),
                expected: "classifier",
                source,
            })?;
        classifier.check().map_err(|reason| ArtifactLoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(classifier)
    }

    fn read_verified(&self, path: &Path) -> Result<Vec<u8>, ArtifactLoadError> {
        let bytes = read_artifact(path)?;

        let manifest_path = path
            .parent()
            .map_or_else(|| PathBuf::from(MANIFEST_FILE), |p| p.join(MANIFEST_FILE));
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if !manifest_path.exists() {
            if self.require_manifest {
                return Err(ArtifactLoadError::Manifest(format!(
                    "{MANIFEST_FILE} required but not found next to {path:?}"
                )));
            }
            return Ok(bytes);
        }

        let manifest = ArtifactManifest::read(&manifest_path)?;
        match manifest.files.get(file_name) {
            Some(expected) => {
                if !expected.eq_ignore_ascii_case(&sha256_hex(&bytes)) {
                    return Err(ArtifactLoadError::DigestMismatch {
                        path: path.to_path_buf(),
                    });
                }
                tracing::debug!("Verified digest of {:?}", path);
            }
            None if self.require_manifest => {
                return Err(ArtifactLoadError::Manifest(format!(
                    "{manifest_path:?} does not bind {file_name:?}"
                )));
            }
            None => tracing::warn!("{:?} is not listed in {:?}", path, manifest_path),
        }
        Ok(bytes)
    }
}

/// Load the scaler and classifier with default settings.
///
/// # Errors
/// See [`ArtifactLoader::load`].
pub fn load_artifacts(
    scaler_path: &Path,
    model_path: &Path,
) -> Result<(FittedScaler, FittedClassifier), ArtifactLoadError> {
    ArtifactLoader::new().load(scaler_path, model_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn standard_scaler(n: usize) -> FittedScaler {
        FittedScaler::Standard {
            feature_names: None,
            mean: vec![1.0; n],
            scale: vec![2.0; n],
        }
    }

    fn logistic(n: usize) -> FittedClassifier {
        FittedClassifier::Logistic {
            feature_names: None,
            classes: [0, 1],
            coefficients: vec![0.5; n],
            intercept: 0.0,
        }
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) {
        let json = serde_json::to_vec(value).expect("serialize artifact");
        fs::write(path, json).expect("write artifact");
    }

    fn write_pair(dir: &Path, n: usize) -> (PathBuf, PathBuf) {
        let scaler_path = dir.join(DEFAULT_SCALER_FILE);
        let model_path = dir.join(DEFAULT_MODEL_FILE);
        write_json(&scaler_path, &standard_scaler(n));
        write_json(&model_path, &logistic(n));
        (scaler_path, model_path)
    }

    #[test]
    fn test_load_shipped_artifacts() {
        let (scaler, classifier) = load_artifacts(
            Path::new("models/scaler.json"),
            Path::new("models/logistic_model.json"),
        )
        .expect("shipped artifacts should load");
        assert_eq!(scaler.n_features(), 9);
        assert_eq!(classifier.n_features(), 9);
        assert_eq!(classifier.classes(), [0, 1]);
    }

    #[test]
    fn test_missing_file() {
        let temp = tempdir().expect("tempdir");
        let (scaler_path, _) = write_pair(temp.path(), 9);
        let err = load_artifacts(&scaler_path, &temp.path().join("nope.json"))
            .expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::Missing(_)));
    }

    #[test]
    fn test_malformed_contents() {
        let temp = tempdir().expect("tempdir");
        let (scaler_path, model_path) = write_pair(temp.path(), 9);

        fs::write(&model_path, b"\x80\x04\x95 not json").expect("write");
        let err = load_artifacts(&scaler_path, &model_path).expect_err("must fail");
        assert!(matches!(
            err,
            ArtifactLoadError::Malformed {
                expected: "classifier",
                ..
            }
        ));

        // A scaler document is not a classifier.
        fs::copy(&scaler_path, &model_path).expect("copy");
        let err = load_artifacts(&scaler_path, &model_path).expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::Malformed { .. }));
    }

    #[test]
    fn test_parameter_lengths_must_agree() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_SCALER_FILE);
        write_json(
            &path,
            &FittedScaler::Standard {
                feature_names: None,
                mean: vec![0.0; 9],
                scale: vec![1.0; 8],
            },
        );
        let err = ArtifactLoader::new().load_scaler(&path).expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::Invalid { .. }));
    }

    #[test]
    fn test_reordered_feature_names_rejected() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_MODEL_FILE);
        let mut names: Vec<String> = FeatureName::ALL.iter().map(|f| f.key().to_string()).collect();
        names.swap(0, 1);
        write_json(
            &path,
            &FittedClassifier::Logistic {
                feature_names: Some(names),
                classes: [0, 1],
                coefficients: vec![0.1; 9],
                intercept: 0.0,
            },
        );
        let err = ArtifactLoader::new()
            .load_classifier(&path)
            .expect_err("must fail");
        assert!(err.to_string().contains("position"));
    }

    #[test]
    fn test_classes_must_include_positive_label() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_MODEL_FILE);
        write_json(
            &path,
            &FittedClassifier::Logistic {
                feature_names: None,
                classes: [0, 2],
                coefficients: vec![0.1; 9],
                intercept: 0.0,
            },
        );
        assert!(ArtifactLoader::new().load_classifier(&path).is_err());
    }

    #[test]
    fn test_incompatible_feature_counts() {
        let temp = tempdir().expect("tempdir");
        let (scaler_path, model_path) = write_pair(temp.path(), 9);
        write_json(&model_path, &logistic(8));
        let err = load_artifacts(&scaler_path, &model_path).expect_err("must fail");
        assert!(matches!(
            err,
            ArtifactLoadError::Incompatible {
                scaler: 9,
                classifier: 8
            }
        ));
    }

    #[test]
    fn test_manifest_verifies_digests() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        let (scaler_path, model_path) = write_pair(dir, 9);

        let manifest =
            ArtifactManifest::for_files(dir, &[DEFAULT_SCALER_FILE, DEFAULT_MODEL_FILE])
                .expect("hash artifacts");
        write_json(&dir.join(MANIFEST_FILE), &manifest);

        let loader = ArtifactLoader::new().require_manifest(true);
        loader
            .load(&scaler_path, &model_path)
            .expect("bound artifacts should load");

        // Tamper with the classifier after hashing.
        let mut tampered = logistic(9);
        let FittedClassifier::Logistic { intercept, .. } = &mut tampered;
        *intercept = 3.0;
        write_json(&model_path, &tampered);
        let err = loader.load(&scaler_path, &model_path).expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::DigestMismatch { .. }));
    }

    #[test]
    fn test_required_manifest_must_exist_and_bind() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        let (scaler_path, model_path) = write_pair(dir, 9);

        let loader = ArtifactLoader::new().require_manifest(true);
        let err = loader.load(&scaler_path, &model_path).expect_err("must fail");
        assert!(matches!(err, ArtifactLoadError::Manifest(_)));

        // Manifest that binds only the scaler.
        let manifest = ArtifactManifest::for_files(dir, &[DEFAULT_SCALER_FILE]).expect("hash");
        write_json(&dir.join(MANIFEST_FILE), &manifest);
        let err = loader.load(&scaler_path, &model_path).expect_err("must fail");
        assert!(err.to_string().contains(DEFAULT_MODEL_FILE));

        // Optional mode tolerates the unbound classifier.
        ArtifactLoader::new()
            .load(&scaler_path, &model_path)
            .expect("optional manifest");
    }

    #[test]
    fn test_standard_transform() {
        let scaler = FittedScaler::Standard {
            feature_names: None,
            mean: vec![10.0, 0.0, 5.0],
            scale: vec![2.0, 0.5, 0.0],
        };
        let z = scaler.transform(&[14.0, 1.0, 7.0]).expect("transform");
        assert_eq!(z, vec![2.0, 2.0, 2.0]);

        let err = scaler.transform(&[1.0, 2.0]).expect_err("must fail");
        assert_eq!(
            err,
            InferenceError::ShapeMismatch {
                component: "scaler",
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = FittedScaler::MinMax {
            feature_names: None,
            min: vec![-1.0, 0.0],
            scale: vec![0.1, 0.5],
        };
        let z = scaler.transform(&[20.0, 4.0]).expect("transform");
        assert!((z[0] - 1.0).abs() < 1e-12);
        assert!((z[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_probabilities() {
        let model = FittedClassifier::Logistic {
            feature_names: None,
            classes: [0, 1],
            coefficients: vec![1.0, -1.0],
            intercept: 0.0,
        };
        let p = model.predict_proba(&[0.5, 0.5]).expect("predict");
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((p[1] - 0.5).abs() < 1e-12);

        let p = model.predict_proba(&[800.0, -800.0]).expect("predict");
        assert!((p[1] - 1.0).abs() < 1e-12);
        let p = model.predict_proba(&[-800.0, 800.0]).expect("predict");
        assert!(p[1] >= 0.0 && p[1] < 1e-12);

        assert!(model.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_positive_probability_follows_class_labels() {
        let model = FittedClassifier::Logistic {
            feature_names: None,
            classes: [1, 0],
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        let p = model.predict_proba(&[2.0]).expect("predict");
        let positive = model.positive_probability(&[2.0]).expect("predict");
        assert!((positive - p[0]).abs() < f64::EPSILON);
        assert!(positive < 0.5);
    }
}
