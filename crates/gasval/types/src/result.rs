//! Validation outcomes handed to the report layer.

use serde::{Deserialize, Serialize};

use crate::component::ComponentKey;
use crate::limits::LimitRange;
use crate::quality::{GasQuality, OperationalRange, QualityTier, ValidationMethod};
use crate::reading::Reading;

/// Outcome of one component against one limit table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Value inside the table bounds.
    Within,
    /// Value outside the table bounds.
    OutOfLimits,
    /// The table has no entry for this component.
    Unconstrained,
    /// A bound applies but the value is not a number.
    Malformed,
    /// A bound applies but no value was supplied.
    Missing,
}

impl CheckStatus {
    /// Evaluate a reading against optional bounds. Fails closed on bad readings.
    pub fn evaluate(reading: &Reading, limits: Option<&LimitRange>) -> Self {
        let Some(limits) = limits else {
            return CheckStatus::Unconstrained;
        };
        match reading {
            Reading::Value(v) if limits.contains(*v) => CheckStatus::Within,
            Reading::Value(_) => CheckStatus::OutOfLimits,
            Reading::Missing => CheckStatus::Missing,
            Reading::Malformed(_) => CheckStatus::Malformed,
        }
    }

    pub fn passes(&self) -> bool {
        matches!(self, CheckStatus::Within | CheckStatus::Unconstrained)
    }
}

/// Explanatory per-component line of a validation result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentCheck {
    pub component: ComponentKey,
    pub value: Reading,
    pub status: CheckStatus,
    pub within_limits: bool,
    /// `None` when the table has no entry ("limits: none").
    pub limits: Option<LimitRange>,
    pub limits_description: String,
    pub tier_used: QualityTier,
}

/// An input that could not be used as a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputIssue {
    pub field: String,
    pub reading: Reading,
    pub message: String,
}

/// Method decision for a composition at given conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodSelection {
    pub method: ValidationMethod,
    pub gas_quality: GasQuality,
    pub operational_range: OperationalRange,
    pub is_valid: bool,
    pub reason: String,
    /// Range warnings from the operating-range checks that decided the outcome.
    pub warnings: Vec<String>,
}

/// Consolidated validation of a full report.
///
/// `component_checks` has exactly one entry per input component, in input
/// order. `is_valid` only reflects the operating conditions; gas quality
/// affects the method, never validity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationCriteriaResult {
    pub method: ValidationMethod,
    pub gas_quality: GasQuality,
    pub operational_range: OperationalRange,
    pub is_valid: bool,
    pub reason: String,
    pub warnings: Vec<String>,
    pub component_checks: Vec<ComponentCheck>,
    pub input_issues: Vec<InputIssue>,
}

impl ValidationCriteriaResult {
    pub fn from_selection(
        selection: MethodSelection,
        component_checks: Vec<ComponentCheck>,
        input_issues: Vec<InputIssue>,
    ) -> Self {
        Self {
            method: selection.method,
            gas_quality: selection.gas_quality,
            operational_range: selection.operational_range,
            is_valid: selection.is_valid,
            reason: selection.reason,
            warnings: selection.warnings,
            component_checks,
            input_issues,
        }
    }

    /// Checks that did not pass.
    pub fn failed_checks(&self) -> impl Iterator<Item = &ComponentCheck> {
        self.component_checks.iter().filter(|c| !c.within_limits)
    }

    pub fn has_input_issues(&self) -> bool {
        !self.input_issues.is_empty()
    }
}
