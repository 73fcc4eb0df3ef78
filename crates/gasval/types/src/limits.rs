use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive numeric bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LimitRange {
    pub min: f64,
    pub max: f64,
}

impl LimitRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds `0..=max`.
    pub const fn up_to(max: f64) -> Self {
        Self { min: 0.0, max }
    }

    /// `min <= value <= max`. Always false for NaN.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Both bounds finite and ordered.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// True when every value inside `self` is also inside `outer`.
    pub fn is_within(&self, outer: &LimitRange) -> bool {
        outer.min <= self.min && self.max <= outer.max
    }
}

impl fmt::Display for LimitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.min, self.max)
    }
}

/// Pressure (kPa, absolute) and temperature (K) envelope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatingRange {
    pub pressure_kpa: LimitRange,
    pub temperature_k: LimitRange,
}

impl OperatingRange {
    pub fn contains(&self, pressure_kpa: f64, temperature_k: f64) -> bool {
        self.pressure_kpa.contains(pressure_kpa) && self.temperature_k.contains(temperature_k)
    }
}
