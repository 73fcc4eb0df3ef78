//! Descriptive strings for the report document.
//!
//! Pure formatting over a [`ValidationCriteriaResult`] and the report fields:
//! the same inputs always give the same four strings.

use gasval_types::{ComponentMeasurement, GasQuality, LimitRange, Reading, ValidationCriteriaResult};
use serde::{Deserialize, Serialize};

use crate::aggregator::celsius_to_kelvin;
use crate::tables::ReferenceTables;

/// Populated components needed to call a composition "full".
pub const FULL_COMPOSITION_MIN_COMPONENTS: usize = 10;

/// Report fields consumed by the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFields {
    pub components: Vec<ComponentMeasurement>,
    #[serde(default)]
    pub temperature_c: Reading,
    #[serde(default)]
    pub pressure_kpa: Reading,
    /// Superior heating value, MJ/m³.
    #[serde(default)]
    pub heating_value: Reading,
    #[serde(default)]
    pub relative_density: Reading,
}

impl ReportFields {
    pub fn populated_components(&self) -> usize {
        self.components
            .iter()
            .filter(|m| m.molar_percent.is_populated())
            .count()
    }

    pub fn has_gross_proxies(&self) -> bool {
        self.heating_value.is_populated() && self.relative_density.is_populated()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDescriptors {
    pub pressure_range: String,
    pub temperature_range: String,
    pub composition_compatibility: String,
    pub z_method: String,
}

pub fn describe_report(
    result: &ValidationCriteriaResult,
    fields: &ReportFields,
    tables: &ReferenceTables,
) -> ReportDescriptors {
    ReportDescriptors {
        pressure_range: describe_pressure(&fields.pressure_kpa, tables),
        temperature_range: describe_temperature(&fields.temperature_c, tables),
        composition_compatibility: describe_composition(result),
        z_method: describe_z_method(result, fields),
    }
}

fn describe_pressure(pressure: &Reading, tables: &ReferenceTables) -> String {
    let Some(p) = pressure.value() else {
        return "Pressure not reported or not numeric".to_string();
    };
    let label = format!("{} kPa", trim_number(p, 3));
    placement(&label, p, &tables.normal.pressure_kpa, &tables.extended.pressure_kpa, "kPa")
}

fn describe_temperature(temperature: &Reading, tables: &ReferenceTables) -> String {
    let Some(c) = temperature.value() else {
        return "Temperature not reported or not numeric".to_string();
    };
    let k = celsius_to_kelvin(c);
    let label = format!("{} °C ({} K)", trim_number(c, 2), trim_number(k, 2));
    placement(&label, k, &tables.normal.temperature_k, &tables.extended.temperature_k, "K")
}

fn placement(label: &str, value: f64, normal: &LimitRange, extended: &LimitRange, unit: &str) -> String {
    if normal.contains(value) {
        format!("{}: within normal range ({} {})", label, normal, unit)
    } else if extended.contains(value) {
        format!(
            "{}: within extended range ({} {}), outside normal range",
            label, extended, unit
        )
    } else {
        format!("{}: outside extended range ({} {})", label, extended, unit)
    }
}

fn describe_composition(result: &ValidationCriteriaResult) -> String {
    let mut text = match result.gas_quality {
        GasQuality::Pipeline => "Composition compatible with AGA-8 pipeline quality limits".to_string(),
        GasQuality::Intermediate => {
            "Composition compatible with AGA-8 intermediate quality limits (outside pipeline limits)"
                .to_string()
        }
        GasQuality::OutOfSpecification => {
            let offenders: Vec<String> = result
                .failed_checks()
                .map(|c| format!("{} = {}", c.component.label(), c.value))
                .collect();
            if offenders.is_empty() {
                "Composition out of AGA-8 specification".to_string()
            } else {
                format!(
                    "Composition out of AGA-8 specification (outside intermediate limits: {})",
                    offenders.join("; ")
                )
            }
        }
    };
    let bad_inputs = result
        .input_issues
        .iter()
        .filter(|i| i.field != "temperature_c" && i.field != "pressure_kpa")
        .count();
    if bad_inputs > 0 {
        text.push_str(&format!("; {} component value(s) missing or not numeric", bad_inputs));
    }
    text
}

fn describe_z_method(result: &ValidationCriteriaResult, fields: &ReportFields) -> String {
    let populated = fields.populated_components();
    if populated >= FULL_COMPOSITION_MIN_COMPONENTS {
        format!("{} (full composition, {} components)", result.method, populated)
    } else if fields.has_gross_proxies() {
        "AGA-8 GROSS (heating value + relative density)".to_string()
    } else {
        "Undetermined: neither a full composition nor heating value and relative density reported"
            .to_string()
    }
}

/// Fixed-point formatting without trailing zeros.
fn trim_number(value: f64, places: usize) -> String {
    let text = format!("{:.*}", places, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
