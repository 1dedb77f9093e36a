//! Pitcher features for injury-risk prediction.
//!
//! Nine workload and pitch-characteristic values, in the exact order the
//! scaler and classifier were fitted with.

use super::InferenceError;

/// Number of features the fitted artifacts expect.
pub const NUM_FEATURES: usize = 9;

/// Named feature positions, declared in fitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureName {
    InningsPitchedFormatted,
    InningsPitchedPreviousYear,
    FastballAvgSpin,
    OffspeedAvgBreak,
    FastballAvgBreakZInduced,
    FastballAvgSpeed,
    BreakingAvgSpeed,
    ArmAngle,
    OffspeedAvgSpeed,
}

impl FeatureName {
    /// All features in fitted order.
    pub const ALL: [FeatureName; NUM_FEATURES] = [
        Self::InningsPitchedFormatted,
        Self::InningsPitchedPreviousYear,
        Self::FastballAvgSpin,
        Self::OffspeedAvgBreak,
        Self::FastballAvgBreakZInduced,
        Self::FastballAvgSpeed,
        Self::BreakingAvgSpeed,
        Self::ArmAngle,
        Self::OffspeedAvgSpeed,
    ];

    /// Position of this feature in the fitted vector.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical key used in requests and artifact metadata.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::InningsPitchedFormatted => "innings_pitched_formatted",
            Self::InningsPitchedPreviousYear => "innings_pitched_previous_year",
            Self::FastballAvgSpin => "fastball_avg_spin",
            Self::OffspeedAvgBreak => "offspeed_avg_break",
            Self::FastballAvgBreakZInduced => "fastball_avg_break_z_induced",
            Self::FastballAvgSpeed => "fastball_avg_speed",
            Self::BreakingAvgSpeed => "breaking_avg_speed",
            Self::ArmAngle => "arm_angle",
            Self::OffspeedAvgSpeed => "offspeed_avg_speed",
        }
    }

    /// Short form identifiers accepted in place of the canonical key.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::InningsPitchedFormatted => &["p_formatted_ip"],
            Self::InningsPitchedPreviousYear => &["ip_py"],
            _ => &[],
        }
    }

    /// Resolve a request key (canonical or alias).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key || f.aliases().contains(&key))
    }

    /// Human-readable label for forms.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InningsPitchedFormatted => "Formatted Innings Pitched",
            Self::InningsPitchedPreviousYear => "Innings Pitched Previous Year",
            Self::FastballAvgSpin => "Fastball Avg Spin Rate",
            Self::OffspeedAvgBreak => "Offspeed Avg Break",
            Self::FastballAvgBreakZInduced => "Fastball Avg Break Z-Induced",
            Self::FastballAvgSpeed => "Fastball Avg Speed",
            Self::BreakingAvgSpeed => "Breaking Avg Speed",
            Self::ArmAngle => "Arm Angle",
            Self::OffspeedAvgSpeed => "Offspeed Avg Speed",
        }
    }

    /// Placeholder shown in an empty input.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::InningsPitchedFormatted => "Enter formatted innings pitched",
            Self::InningsPitchedPreviousYear => "Enter previous year's innings pitched",
            Self::FastballAvgSpin => "Enter fastball spin rate (rpm)",
            Self::OffspeedAvgBreak => "Enter offspeed break (inches)",
            Self::FastballAvgBreakZInduced => "Enter z-induced fastball break",
            Self::FastballAvgSpeed => "Enter fastball speed (mph)",
            Self::BreakingAvgSpeed => "Enter breaking speed (mph)",
            Self::ArmAngle => "Enter arm angle (degrees)",
            Self::OffspeedAvgSpeed => "Enter offspeed speed (mph)",
        }
    }

    /// Expected range, for display only.
    #[must_use]
    pub fn advisory_range(self) -> &'static str {
        match self {
            Self::InningsPitchedFormatted => "0 - 300",
            Self::InningsPitchedPreviousYear => "0 - 300",
            Self::FastballAvgSpin => "1500 - 3000 rpm",
            Self::OffspeedAvgBreak => "0 - 20 inches",
            Self::FastballAvgBreakZInduced => "0 - 30 inches",
            Self::FastballAvgSpeed => "80 - 105 mph",
            Self::BreakingAvgSpeed => "70 - 95 mph",
            Self::ArmAngle => "-75 - 90 degrees",
            Self::OffspeedAvgSpeed => "60 - 85 mph",
        }
    }

    /// Numeric bounds of the advisory range (inclusive).
    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::InningsPitchedFormatted | Self::InningsPitchedPreviousYear => (0.0, 300.0),
            Self::FastballAvgSpin => (1500.0, 3000.0),
            Self::OffspeedAvgBreak => (0.0, 20.0),
            Self::FastballAvgBreakZInduced => (0.0, 30.0),
            Self::FastballAvgSpeed => (80.0, 105.0),
            Self::BreakingAvgSpeed => (70.0, 95.0),
            Self::ArmAngle => (-75.0, 90.0),
            Self::OffspeedAvgSpeed => (60.0, 85.0),
        }
    }

    /// Value pre-filled in a fresh form.
    #[must_use]
    pub fn default_value(self) -> f64 {
        match self {
            Self::InningsPitchedFormatted => 100.0,
            Self::InningsPitchedPreviousYear => 80.0,
            Self::FastballAvgSpin => 2200.0,
            Self::OffspeedAvgBreak => 12.0,
            Self::FastballAvgBreakZInduced => 15.0,
            Self::FastballAvgSpeed => 95.0,
            Self::BreakingAvgSpeed => 85.0,
            Self::ArmAngle => 50.0,
            Self::OffspeedAvgSpeed => 80.0,
        }
    }
}

impl std::fmt::Display for FeatureName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw feature values for a single pitcher.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    /// Innings pitched this season, formatted (0-300 typical)
    pub innings_pitched_formatted: f64,

    /// Innings pitched in the previous season (0-300 typical)
    pub innings_pitched_previous_year: f64,

    /// Fastball average spin rate in rpm (1500-3000 typical)
    pub fastball_avg_spin: f64,

    /// Offspeed average break in inches (0-20 typical)
    pub offspeed_avg_break: f64,

    /// Fastball average induced vertical break in inches (0-30 typical)
    pub fastball_avg_break_z_induced: f64,

    /// Fastball average velocity in mph (80-105 typical)
    pub fastball_avg_speed: f64,

    /// Breaking ball average velocity in mph (70-95 typical)
    pub breaking_avg_speed: f64,

    /// Arm angle in degrees (-75 to 90 typical)
    pub arm_angle: f64,

    /// Offspeed average velocity in mph (60-85 typical)
    pub offspeed_avg_speed: f64,
}

impl FeatureVector {
    /// Values in fitted order.
    #[must_use]
    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.innings_pitched_formatted,
            self.innings_pitched_previous_year,
            self.fastball_avg_spin,
            self.offspeed_avg_break,
            self.fastball_avg_break_z_induced,
            self.fastball_avg_speed,
            self.breaking_avg_speed,
            self.arm_angle,
            self.offspeed_avg_speed,
        ]
    }

    /// Build from values in fitted order.
    #[must_use]
    pub fn from_array(v: [f64; NUM_FEATURES]) -> Self {
        Self {
            innings_pitched_formatted: v[0],
            innings_pitched_previous_year: v[1],
            fastball_avg_spin: v[2],
            offspeed_avg_break: v[3],
            fastball_avg_break_z_induced: v[4],
            fastball_avg_speed: v[5],
            breaking_avg_speed: v[6],
            arm_angle: v[7],
            offspeed_avg_speed: v[8],
        }
    }

    /// Build from a slice in fitted order.
    ///
    /// # Errors
    /// Returns `InferenceError::Arity` if the slice does not hold exactly 9 values.
    pub fn from_slice(v: &[f64]) -> Result<Self, InferenceError> {
        let arr: [f64; NUM_FEATURES] = v.try_into().map_err(|_| InferenceError::Arity {
            expected: NUM_FEATURES,
            got: v.len(),
        })?;
        Ok(Self::from_array(arr))
    }

    /// The default form values.
    #[must_use]
    pub fn sample() -> Self {
        Self::from_array(FeatureName::ALL.map(FeatureName::default_value))
    }

    #[must_use]
    pub fn get(&self, name: FeatureName) -> f64 {
        self.to_array()[name.index()]
    }

    pub fn set(&mut self, name: FeatureName, value: f64) {
        let mut values = self.to_array();
        values[name.index()] = value;
        *self = Self::from_array(values);
    }

    /// Check every value is finite.
    ///
    /// # Errors
    /// Returns `InferenceError::NonFinite` naming the first offending feature.
    pub fn validate(&self) -> Result<(), InferenceError> {
        for (feature, value) in FeatureName::ALL.into_iter().zip(self.to_array()) {
            if !value.is_finite() {
                return Err(InferenceError::NonFinite { feature, value });
            }
        }
        Ok(())
    }

    /// Features whose value lies outside the advisory range.
    #[must_use]
    pub fn out_of_range(&self) -> Vec<(FeatureName, f64)> {
        FeatureName::ALL
            .into_iter()
            .zip(self.to_array())
            .filter(|(feature, value)| {
                let (lo, hi) = feature.bounds();
                !(lo..=hi).contains(value)
            })
            .collect()
    }

    /// Copy with every value clamped into its advisory range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let values = self.to_array();
        Self::from_array(FeatureName::ALL.map(|f| {
            let (lo, hi) = f.bounds();
            values[f.index()].clamp(lo, hi)
        }))
    }
}
