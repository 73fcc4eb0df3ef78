//! Report validation command

use std::path::Path;
use std::sync::Arc;

use colored::*;
use gasval_engine::{CriteriaAggregator, ReferenceTables, ReportEvaluation, ReportFields};
use gasval_types::{CheckStatus, ComponentCheck};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{self, print_field, print_warning, OutputFormat};

/// Table row for one component check
#[derive(Debug, Serialize, Tabled)]
struct CheckRow {
    component: String,
    #[tabled(rename = "mol %")]
    value: String,
    status: String,
    limits: String,
}

impl From<&ComponentCheck> for CheckRow {
    fn from(check: &ComponentCheck) -> Self {
        let status = match check.status {
            CheckStatus::Within => "OK".green().to_string(),
            CheckStatus::Unconstrained => "OK (no limit)".green().to_string(),
            CheckStatus::OutOfLimits => "OUT OF LIMITS".red().to_string(),
            CheckStatus::Malformed => "NOT A NUMBER".red().to_string(),
            CheckStatus::Missing => "MISSING".red().to_string(),
        };
        Self {
            component: check.component.label().to_string(),
            value: check.value.to_string(),
            status,
            limits: check.limits_description.clone(),
        }
    }
}

/// Read a report document (JSON, or YAML by extension)
pub fn read_report(path: &Path) -> CliResult<ReportFields> {
    let contents = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(&contents)?)
    } else {
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Execute the validate command
pub fn execute(file: &Path, tables: Arc<ReferenceTables>, format: OutputFormat) -> CliResult<()> {
    let fields = read_report(file)?;
    let evaluation = CriteriaAggregator::new(tables.clone()).evaluate_report(&fields);

    match format {
        OutputFormat::Table => print_evaluation(&evaluation, &tables.version),
        _ => output::print_single(&evaluation, format)?,
    }
    Ok(())
}

fn print_evaluation(evaluation: &ReportEvaluation, tables_version: &str) {
    let result = &evaluation.result;
    let validity = if result.is_valid {
        "valid".green().bold()
    } else {
        "INVALID".red().bold()
    };

    print_field("Method", result.method);
    print_field("Gas quality", result.gas_quality);
    print_field("Operational range", result.operational_range);
    print_field("Validity", validity);
    print_field("Reason", &result.reason);
    print_field("Reference tables", tables_version);
    println!();
    print_field("Pressure", &evaluation.descriptors.pressure_range);
    print_field("Temperature", &evaluation.descriptors.temperature_range);
    print_field("Composition", &evaluation.descriptors.composition_compatibility);
    print_field("Z method", &evaluation.descriptors.z_method);
    println!();

    output::print_table(result.component_checks.iter().map(CheckRow::from).collect());

    for warning in &result.warnings {
        print_warning(warning);
    }
    for issue in &result.input_issues {
        print_warning(&issue.message);
    }
}
