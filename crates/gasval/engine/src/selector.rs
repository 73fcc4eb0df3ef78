//! Choice of equation of state from composition quality and operating
//! conditions.
//!
//! Decision order, first match wins:
//!
//! ```text
//!   OutOfSpecification ─────────────────────────────► GERG-2008
//!   Intermediate ───────────────────────────────────► GERG-2008
//!   Pipeline + normal range ─┬─ DETAIL envelope ok ─► AGA-8 DETAIL
//!                            └─ otherwise ──────────► AGA-8 GROSS
//!   Pipeline + extended range only ─────────────────► GERG-2008
//!   neither range ──────────────────────────────────► GERG-2008 (invalid)
//! ```

use std::sync::Arc;

use gasval_types::{
    reading_of, ComponentId, ComponentMeasurement, GasQuality, MethodSelection, OperationalRange,
    ValidationMethod,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::Classifier;
use crate::range::{RangeAssessment, RangeValidator};
use crate::tables::ReferenceTables;

/// Outcome of the three DETAIL sub-criteria.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailAssessment {
    pub pressure_ok: bool,
    pub temperature_ok: bool,
    pub methane_ok: bool,
    /// Human-readable description of each failed criterion.
    pub failures: Vec<String>,
}

impl DetailAssessment {
    pub fn satisfied(&self) -> bool {
        self.pressure_ok && self.temperature_ok && self.methane_ok
    }
}

/// Selects the analytical method for a composition at given conditions.
#[derive(Clone, Debug)]
pub struct MethodSelector {
    classifier: Classifier,
    ranges: RangeValidator,
}

impl MethodSelector {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self {
            classifier: Classifier::new(tables.clone()),
            ranges: RangeValidator::new(tables),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn ranges(&self) -> &RangeValidator {
        &self.ranges
    }

    pub fn tables(&self) -> &ReferenceTables {
        self.classifier.tables()
    }

    pub fn select(
        &self,
        components: &[ComponentMeasurement],
        temperature_k: f64,
        pressure_kpa: f64,
    ) -> MethodSelection {
        let quality = self.classifier.classify(components);
        let ranges = self.ranges.validate_both(pressure_kpa, temperature_k);
        let selection = self.decide(components, quality, &ranges, temperature_k, pressure_kpa);
        debug!(
            quality = ?quality,
            method = ?selection.method,
            range = ?selection.operational_range,
            valid = selection.is_valid,
            "Selected validation method"
        );
        selection
    }

    /// Evaluate the DETAIL envelope for pipeline gas in the normal range.
    pub fn detail_criteria(
        &self,
        components: &[ComponentMeasurement],
        temperature_k: f64,
        pressure_kpa: f64,
    ) -> DetailAssessment {
        let envelope = &self.tables().detail;
        let methane = reading_of(components, ComponentId::Methane).and_then(|r| r.value());

        let pressure_ok = pressure_kpa <= envelope.max_pressure_kpa;
        let temperature_ok = envelope.temperature_k.contains(temperature_k);
        let methane_ok = methane.is_some_and(|v| v >= envelope.min_methane_percent);

        let mut failures = Vec::new();
        if !pressure_ok {
            failures.push(format!(
                "pressure {} kPa above {} kPa",
                pressure_kpa, envelope.max_pressure_kpa
            ));
        }
        if !temperature_ok {
            failures.push(format!(
                "temperature {:.2} K outside {} K",
                temperature_k, envelope.temperature_k
            ));
        }
        if !methane_ok {
            failures.push(match methane {
                Some(v) => format!(
                    "methane {} mol% below {} mol%",
                    v, envelope.min_methane_percent
                ),
                None => "methane not reported".to_string(),
            });
        }

        DetailAssessment {
            pressure_ok,
            temperature_ok,
            methane_ok,
            failures,
        }
    }

    fn decide(
        &self,
        components: &[ComponentMeasurement],
        quality: GasQuality,
        ranges: &RangeAssessment,
        temperature_k: f64,
        pressure_kpa: f64,
    ) -> MethodSelection {
        match quality {
            GasQuality::OutOfSpecification | GasQuality::Intermediate => {
                let extended_ok = ranges.extended.is_valid;
                let mut reason = match quality {
                    GasQuality::OutOfSpecification => {
                        "Composition out of AGA-8 specification: GERG-2008 required".to_string()
                    }
                    _ => "Intermediate-quality composition outside the AGA-8 pipeline limits: \
                          GERG-2008 required"
                        .to_string(),
                };
                if !extended_ok {
                    reason.push_str("; conditions outside the extended operating range");
                }
                MethodSelection {
                    method: ValidationMethod::Gerg2008,
                    gas_quality: quality,
                    operational_range: if extended_ok {
                        OperationalRange::Extended
                    } else {
                        OperationalRange::Normal
                    },
                    is_valid: extended_ok,
                    reason,
                    warnings: ranges.extended.warnings.clone(),
                }
            }
            GasQuality::Pipeline if ranges.normal.is_valid => {
                let detail = self.detail_criteria(components, temperature_k, pressure_kpa);
                let (method, reason) = if detail.satisfied() {
                    (
                        ValidationMethod::Aga8Detail,
                        "Pipeline-quality composition within the normal operating range and \
                         the AGA-8 DETAIL envelope"
                            .to_string(),
                    )
                } else {
                    (
                        ValidationMethod::Aga8Gross,
                        format!(
                            "Pipeline-quality composition within the normal operating range; \
                             AGA-8 DETAIL envelope not met ({}): AGA-8 GROSS",
                            detail.failures.join(", ")
                        ),
                    )
                };
                MethodSelection {
                    method,
                    gas_quality: quality,
                    operational_range: OperationalRange::Normal,
                    is_valid: true,
                    reason,
                    warnings: Vec::new(),
                }
            }
            GasQuality::Pipeline if ranges.extended.is_valid => MethodSelection {
                method: ValidationMethod::Gerg2008,
                gas_quality: quality,
                operational_range: OperationalRange::Extended,
                is_valid: true,
                reason: "Pipeline-quality composition outside the normal operating range but \
                         within the extended range: GERG-2008 required"
                    .to_string(),
                warnings: ranges.normal.warnings.clone(),
            },
            GasQuality::Pipeline => {
                let mut warnings = ranges.normal.warnings.clone();
                warnings.extend(ranges.extended.warnings.iter().cloned());
                MethodSelection {
                    method: ValidationMethod::Gerg2008,
                    gas_quality: quality,
                    operational_range: OperationalRange::Extended,
                    is_valid: false,
                    reason: "Conditions outside both the normal and the extended operating \
                             ranges: no method is valid"
                        .to_string(),
                    warnings,
                }
            }
        }
    }
}

impl Default for MethodSelector {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceTables::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_gas() -> Vec<ComponentMeasurement> {
        vec![
            ComponentMeasurement::known(ComponentId::Methane, 95.0),
            ComponentMeasurement::known(ComponentId::Ethane, 3.0),
            ComponentMeasurement::known(ComponentId::Nitrogen, 1.0),
            ComponentMeasurement::known(ComponentId::CarbonDioxide, 1.0),
        ]
    }

    #[test]
    fn pipeline_in_detail_envelope_uses_detail() {
        let selector = MethodSelector::default();
        let s = selector.select(&scenario_gas(), 298.15, 5_000.0);
        assert_eq!(s.gas_quality, GasQuality::Pipeline);
        assert_eq!(s.method, ValidationMethod::Aga8Detail);
        assert_eq!(s.operational_range, OperationalRange::Normal);
        assert!(s.is_valid);
        assert!(s.warnings.is_empty());
    }

    #[test]
    fn pipeline_above_detail_pressure_uses_gross() {
        let selector = MethodSelector::default();
        let s = selector.select(&scenario_gas(), 298.15, 12_000.0);
        assert_eq!(s.method, ValidationMethod::Aga8Gross);
        assert_eq!(s.operational_range, OperationalRange::Normal);
        assert!(s.is_valid);
        assert!(s.reason.contains("12000 kPa"));
    }

    #[test]
    fn detail_pressure_bound_is_inclusive() {
        let selector = MethodSelector::default();
        let s = selector.select(&scenario_gas(), 298.15, 10_342.0);
        assert_eq!(s.method, ValidationMethod::Aga8Detail);
    }

    #[test]
    fn cold_pipeline_gas_uses_gross() {
        let selector = MethodSelector::default();
        let s = selector.select(&scenario_gas(), 260.0, 5_000.0);
        assert_eq!(s.method, ValidationMethod::Aga8Gross);
        assert!(s.reason.contains("temperature"));
    }

    #[test]
    fn pipeline_without_methane_entry_uses_gross() {
        let tables = ReferenceTables {
            version: "no-methane-bound".into(),
            pipeline: crate::tables::CompositionTable::new()
                .with(ComponentId::Nitrogen, 0.0, 100.0),
            intermediate: crate::tables::CompositionTable::new()
                .with(ComponentId::Nitrogen, 0.0, 100.0),
            ..ReferenceTables::default()
        };
        let selector = MethodSelector::new(Arc::new(tables));
        let gas = vec![
            ComponentMeasurement::known(ComponentId::Methane, 50.0),
            ComponentMeasurement::known(ComponentId::Nitrogen, 50.0),
        ];
        let s = selector.select(&gas, 298.15, 5_000.0);
        assert_eq!(s.gas_quality, GasQuality::Pipeline);
        assert_eq!(s.method, ValidationMethod::Aga8Gross);
        assert!(s.reason.contains("methane 50 mol% below 60 mol%"));

        let s = selector.select(&gas[1..], 298.15, 5_000.0);
        assert_eq!(s.method, ValidationMethod::Aga8Gross);
        assert!(s.reason.contains("methane not reported"));
    }

    #[test]
    fn pipeline_in_extended_only_uses_gerg() {
        let selector = MethodSelector::default();
        let s = selector.select(&scenario_gas(), 298.15, 50_000.0);
        assert_eq!(s.method, ValidationMethod::Gerg2008);
        assert_eq!(s.operational_range, OperationalRange::Extended);
        assert!(s.is_valid);
        assert_eq!(s.warnings.len(), 1);
    }

    #[test]
    fn pipeline_outside_both_ranges_is_invalid() {
        let selector = MethodSelector::default();
        let s = selector.select(&scenario_gas(), 298.15, 80_000.0);
        assert_eq!(s.method, ValidationMethod::Gerg2008);
        assert_eq!(s.operational_range, OperationalRange::Extended);
        assert!(!s.is_valid);
        assert_eq!(s.warnings.len(), 2);
    }

    #[test]
    fn intermediate_gas_uses_gerg_with_extended_range() {
        let selector = MethodSelector::default();
        let gas = vec![
            ComponentMeasurement::known(ComponentId::Methane, 80.0),
            ComponentMeasurement::known(ComponentId::Ethane, 15.0),
            ComponentMeasurement::known(ComponentId::Nitrogen, 5.0),
        ];
        let s = selector.select(&gas, 298.15, 5_000.0);
        assert_eq!(s.gas_quality, GasQuality::Intermediate);
        assert_eq!(s.method, ValidationMethod::Gerg2008);
        assert_eq!(s.operational_range, OperationalRange::Extended);
        assert!(s.is_valid);
    }

    #[test]
    fn out_of_spec_validity_follows_extended_range() {
        let selector = MethodSelector::default();
        let gas = vec![
            ComponentMeasurement::known(ComponentId::Methane, 38.0),
            ComponentMeasurement::known(ComponentId::Nitrogen, 60.0),
            ComponentMeasurement::known(ComponentId::CarbonDioxide, 2.0),
        ];
        let ok = selector.select(&gas, 298.15, 5_000.0);
        assert_eq!(ok.gas_quality, GasQuality::OutOfSpecification);
        assert_eq!(ok.method, ValidationMethod::Gerg2008);
        assert!(ok.reason.contains("out of AGA-8 specification"));
        assert_eq!(ok.operational_range, OperationalRange::Extended);
        assert!(ok.is_valid);

        let bad = selector.select(&gas, 298.15, 90_000.0);
        assert_eq!(bad.operational_range, OperationalRange::Normal);
        assert!(!bad.is_valid);
        assert!(bad.reason.contains("extended operating range"));
    }

    #[test]
    fn detail_criteria_report_each_failure() {
        let selector = MethodSelector::default();
        let gas = vec![ComponentMeasurement::known(ComponentId::Methane, 55.0)];
        let d = selector.detail_criteria(&gas, 340.0, 11_000.0);
        assert!(!d.satisfied());
        assert_eq!(d.failures.len(), 3);
    }
}
