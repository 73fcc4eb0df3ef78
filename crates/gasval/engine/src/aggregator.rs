//! Consolidated validation of a full report.

use std::sync::Arc;

use gasval_types::{
    CheckStatus, ComponentCheck, ComponentKey, ComponentMeasurement, InputIssue, Reading,
    ValidationCriteriaResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::report::{describe_report, ReportDescriptors, ReportFields};
use crate::selector::MethodSelector;
use crate::tables::ReferenceTables;

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Validation result together with its descriptive strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportEvaluation {
    pub result: ValidationCriteriaResult,
    pub descriptors: ReportDescriptors,
}

/// Runs classification and method selection, then explains every component
/// against the table matching the overall quality.
#[derive(Clone, Debug)]
pub struct CriteriaAggregator {
    selector: MethodSelector,
}

impl CriteriaAggregator {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self {
            selector: MethodSelector::new(tables),
        }
    }

    pub fn selector(&self) -> &MethodSelector {
        &self.selector
    }

    pub fn tables(&self) -> &ReferenceTables {
        self.selector.tables()
    }

    /// Numeric entry point: temperature in °C, pressure in kPa (absolute).
    pub fn evaluate(
        &self,
        components: &[ComponentMeasurement],
        temperature_c: f64,
        pressure_kpa: f64,
    ) -> ValidationCriteriaResult {
        self.evaluate_readings(
            components,
            Reading::from(temperature_c),
            Reading::from(pressure_kpa),
        )
    }

    /// Boundary entry point for unparsed conditions.
    ///
    /// A condition that is not a number fails both range checks and is
    /// listed in `input_issues`.
    pub fn evaluate_readings(
        &self,
        components: &[ComponentMeasurement],
        temperature_c: Reading,
        pressure_kpa: Reading,
    ) -> ValidationCriteriaResult {
        let mut issues = Vec::new();
        for m in components {
            if let Some(issue) = input_issue(&m.component.to_string(), &m.molar_percent) {
                issues.push(issue);
            }
            if let ComponentKey::Unlisted(name) = &m.component {
                warn!(component = %name, "Unlisted component: no composition limits apply");
            }
        }
        issues.extend(input_issue("temperature_c", &temperature_c));
        issues.extend(input_issue("pressure_kpa", &pressure_kpa));
        if !issues.is_empty() {
            warn!(count = issues.len(), "Report contains missing or non-numeric inputs");
        }

        let temperature_k = temperature_c.value().map(celsius_to_kelvin).unwrap_or(f64::NAN);
        let pressure = pressure_kpa.value().unwrap_or(f64::NAN);

        let selection = self.selector.select(components, temperature_k, pressure);
        let tier = selection.gas_quality.explanatory_tier();
        let classifier = self.selector.classifier();

        let checks = components
            .iter()
            .map(|m| {
                let limits = classifier.limits_for(&m.component, tier).copied();
                let status = CheckStatus::evaluate(&m.molar_percent, limits.as_ref());
                let limits_description = match (&limits, &m.component) {
                    (Some(range), _) => format!("{} mol% ({} limits)", range, tier),
                    (None, ComponentKey::Unlisted(_)) => "limits: none (unlisted component)".into(),
                    (None, ComponentKey::Known(_)) => "limits: none".into(),
                };
                ComponentCheck {
                    component: m.component.clone(),
                    value: m.molar_percent.clone(),
                    status,
                    within_limits: status.passes(),
                    limits,
                    limits_description,
                    tier_used: tier,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            checks = checks.len(),
            failed = checks.iter().filter(|c| !c.within_limits).count(),
            tier = %tier,
            "Built component checks"
        );

        ValidationCriteriaResult::from_selection(selection, checks, issues)
    }

    /// Evaluate a report document and derive its descriptive strings.
    pub fn evaluate_report(&self, fields: &ReportFields) -> ReportEvaluation {
        let result = self.evaluate_readings(
            &fields.components,
            fields.temperature_c.clone(),
            fields.pressure_kpa.clone(),
        );
        let descriptors = describe_report(&result, fields, self.tables());
        ReportEvaluation {
            result,
            descriptors,
        }
    }
}

impl Default for CriteriaAggregator {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceTables::default()))
    }
}

fn input_issue(field: &str, reading: &Reading) -> Option<InputIssue> {
    let message = match reading {
        Reading::Value(_) => return None,
        Reading::Missing => format!("{}: no value supplied", field),
        Reading::Malformed(raw) => format!("{}: {:?} is not a number", field, raw),
    };
    Some(InputIssue {
        field: field.to_string(),
        reading: reading.clone(),
        message,
    })
}
