//! Operating-condition checks against the normal and extended envelopes.

use std::sync::Arc;

use gasval_types::{LimitRange, OperationalRange};
use serde::{Deserialize, Serialize};

use crate::tables::ReferenceTables;

/// Result of checking pressure and temperature against one envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeCheck {
    pub range: OperationalRange,
    pub is_valid: bool,
    pub pressure_ok: bool,
    pub temperature_ok: bool,
    /// One entry per failing dimension.
    pub warnings: Vec<String>,
}

/// Both envelopes evaluated for the same conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeAssessment {
    pub normal: RangeCheck,
    pub extended: RangeCheck,
}

/// Pure validator over the operating ranges of a reference dataset.
#[derive(Clone, Debug)]
pub struct RangeValidator {
    tables: Arc<ReferenceTables>,
}

impl RangeValidator {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self { tables }
    }

    pub fn validate(
        &self,
        pressure_kpa: f64,
        temperature_k: f64,
        range: OperationalRange,
    ) -> RangeCheck {
        let bounds = self.tables.operating(range);
        let pressure_ok = bounds.pressure_kpa.contains(pressure_kpa);
        let temperature_ok = bounds.temperature_k.contains(temperature_k);

        let mut warnings = Vec::new();
        if !pressure_ok {
            warnings.push(out_of_range_warning(
                "pressure",
                pressure_kpa,
                "kPa",
                range,
                &bounds.pressure_kpa,
            ));
        }
        if !temperature_ok {
            warnings.push(out_of_range_warning(
                "temperature",
                temperature_k,
                "K",
                range,
                &bounds.temperature_k,
            ));
        }

        RangeCheck {
            range,
            is_valid: pressure_ok && temperature_ok,
            pressure_ok,
            temperature_ok,
            warnings,
        }
    }

    pub fn validate_both(&self, pressure_kpa: f64, temperature_k: f64) -> RangeAssessment {
        RangeAssessment {
            normal: self.validate(pressure_kpa, temperature_k, OperationalRange::Normal),
            extended: self.validate(pressure_kpa, temperature_k, OperationalRange::Extended),
        }
    }
}

impl Default for RangeValidator {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceTables::default()))
    }
}

fn out_of_range_warning(
    dimension: &str,
    value: f64,
    unit: &str,
    range: OperationalRange,
    bounds: &LimitRange,
) -> String {
    if value.is_finite() {
        format!(
            "{} {} {} outside {} range ({} {})",
            dimension, value, unit, range, bounds, unit
        )
    } else {
        format!(
            "{} is not a valid number; {} range requires {} {}",
            dimension, range, bounds, unit
        )
    }
}
