//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PITCHRISK_ARTIFACT_DIR` | `models` |
//! | `PITCHRISK_SCALER_PATH` | `<artifact dir>/scaler.json` |
//! | `PITCHRISK_MODEL_PATH` | `<artifact dir>/logistic_model.json` |
//! | `PITCHRISK_RANGE_POLICY` | `pass` (`pass`, `reject`, `clamp`) |
//! | `PITCHRISK_REQUIRE_MANIFEST` | `false` |

use std::path::PathBuf;
use std::str::FromStr;

use crate::adapters::artifacts::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};
use crate::PitchriskError;

pub const ARTIFACT_DIR_ENV: &str = "PITCHRISK_ARTIFACT_DIR";
pub const SCALER_PATH_ENV: &str = "PITCHRISK_SCALER_PATH";
pub const MODEL_PATH_ENV: &str = "PITCHRISK_MODEL_PATH";
pub const RANGE_POLICY_ENV: &str = "PITCHRISK_RANGE_POLICY";
pub const REQUIRE_MANIFEST_ENV: &str = "PITCHRISK_REQUIRE_MANIFEST";

const DEFAULT_ARTIFACT_DIR: &str = "models";

/// What to do with feature values outside their advisory range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Score the values as given.
    #[default]
    PassThrough,
    /// Fail the request.
    Reject,
    /// Clamp into the advisory range, then score.
    Clamp,
}

impl FromStr for RangePolicy {
    type Err = PitchriskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" | "passthrough" | "pass_through" | "off" => Ok(Self::PassThrough),
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            other => Err(PitchriskError::Config(format!(
                "{RANGE_POLICY_ENV} must be one of pass, reject, clamp (got {other:?})"
            ))),
        }
    }
}

impl std::fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PassThrough => write!(f, "pass"),
            Self::Reject => write!(f, "reject"),
            Self::Clamp => write!(f, "clamp"),
        }
    }
}

pub(crate) fn parse_bool(v: &str) -> Option<bool> {
    match v.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
    pub range_policy: RangePolicy,
    pub require_manifest: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dir = PathBuf::from(DEFAULT_ARTIFACT_DIR);
        Self {
            scaler_path: dir.join(DEFAULT_SCALER_FILE),
            model_path: dir.join(DEFAULT_MODEL_FILE),
            range_policy: RangePolicy::default(),
            require_manifest: false,
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    /// Returns `PitchriskError::Config` on an unrecognised range policy.
    pub fn from_env() -> Result<Self, PitchriskError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `PitchriskError::Config` on an unrecognised range policy or a
    /// manifest flag that is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PitchriskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let dir = var(ARTIFACT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR));
        let scaler_path = var(SCALER_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| dir.join(DEFAULT_SCALER_FILE));
        let model_path = var(MODEL_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| dir.join(DEFAULT_MODEL_FILE));

        let range_policy = match var(RANGE_POLICY_ENV) {
            Some(v) => v.parse()?,
            None => RangePolicy::default(),
        };
        let require_manifest = match var(REQUIRE_MANIFEST_ENV) {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                PitchriskError::Config(format!(
                    "{REQUIRE_MANIFEST_ENV} must be a boolean such as true or false (got {v:?})"
                ))
            })?,
            None => false,
        };

        let config = Self {
            scaler_path,
            model_path,
            range_policy,
            require_manifest,
        };
        tracing::debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}
