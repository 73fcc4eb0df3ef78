//! CEP monitoring commands

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Subcommand;
use colored::*;
use gasval_cep::{CepChart, CepMonitor, CepSample, EditRecord, FieldChange, SampleId};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{CliError, CliResult};
use crate::output::{self, print_field, print_info, print_success, OutputFormat};

/// CEP subcommands
#[derive(Subcommand)]
pub enum CepCommands {
    /// Control-chart statistics for a component or property
    Stats {
        /// Tracked quantity (e.g. methane, fatorCompressibilidade)
        quantity: String,
    },

    /// Add a completed report to the history
    Ingest {
        /// Sample file (JSON)
        file: PathBuf,
    },

    /// Correct values of a stored sample (audited)
    Edit {
        /// Sample ID
        id: String,

        /// Change to apply, as name=value (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE", required = true)]
        set: Vec<String>,

        /// Why the values are being corrected
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Show the audit trail of a sample
    History {
        /// Sample ID
        id: String,
    },

    /// Remove every stored sample
    Clear {
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Sample document accepted by `ingest`
#[derive(Debug, Deserialize)]
struct SampleDocument {
    #[serde(default)]
    id: Option<SampleId>,
    bulletin_number: String,
    collection_date: NaiveDate,
    #[serde(default)]
    components: BTreeMap<String, f64>,
    #[serde(default)]
    properties: BTreeMap<String, f64>,
}

impl From<SampleDocument> for CepSample {
    fn from(doc: SampleDocument) -> Self {
        let mut sample = CepSample::new(doc.bulletin_number, doc.collection_date);
        if let Some(id) = doc.id {
            sample.id = id;
        }
        sample.components = doc.components;
        sample.properties = doc.properties;
        sample
    }
}

/// Table row for a chart point
#[derive(Debug, Serialize, Tabled)]
struct PointRow {
    bulletin: String,
    date: String,
    value: String,
    status: String,
    #[tabled(rename = "in window")]
    used: String,
}

/// Table row for an audit entry
#[derive(Debug, Serialize, Tabled)]
struct EditRow {
    timestamp: String,
    reason: String,
    changes: String,
}

impl From<&EditRecord> for EditRow {
    fn from(record: &EditRecord) -> Self {
        let changes = record
            .changed_fields
            .iter()
            .map(|name| {
                let previous = record
                    .previous_values
                    .get(name)
                    .copied()
                    .flatten()
                    .map_or_else(|| "-".to_string(), |v| v.to_string());
                let new = record
                    .new_values
                    .get(name)
                    .map_or_else(|| "-".to_string(), |v| v.to_string());
                format!("{}: {} → {}", name, previous, new)
            })
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            timestamp: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            reason: record.reason.clone(),
            changes,
        }
    }
}

fn parse_id(id: &str) -> CliResult<SampleId> {
    id.parse()
        .map_err(|e| CliError::InvalidInput(format!("sample id {:?}: {}", id, e)))
}

/// Split `name=value`, accepting `,` as decimal separator.
fn parse_assignment(text: &str) -> CliResult<(String, f64)> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| CliError::InvalidInput(format!("{:?}: expected name=value", text)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidInput(format!("{:?}: empty field name", text)));
    }
    let value = value.trim();
    let normalized = if value.contains(',') && !value.contains('.') {
        value.replace(',', ".")
    } else {
        value.to_string()
    };
    let value = normalized
        .parse::<f64>()
        .map_err(|_| CliError::InvalidInput(format!("{:?}: {:?} is not a number", text, value)))?;
    Ok((name.to_string(), value))
}

/// A name already present among the sample's properties (and not its
/// components) is edited there; anything else is a component.
fn resolve_changes(sample: &CepSample, assignments: &[String]) -> CliResult<Vec<FieldChange>> {
    assignments
        .iter()
        .map(|text| {
            let (name, value) = parse_assignment(text)?;
            let change = if !sample.components.contains_key(&name)
                && sample.properties.contains_key(&name)
            {
                FieldChange::property(name, value)
            } else {
                FieldChange::component(name, value)
            };
            Ok(change)
        })
        .collect()
}

fn print_chart(chart: &CepChart) {
    match &chart.statistics {
        Some(stats) => {
            print_field("Quantity", &chart.quantity);
            print_field("Mean", stats.mean);
            print_field("Mobile range mean", stats.mobile_range_mean);
            print_field("UCL", stats.upper_control_limit);
            print_field("LCL", stats.lower_control_limit);
            print_field("Values used", stats.sample_count);
        }
        None => print_info(&format!(
            "No statistics for {}: fewer than 2 valid values in the history",
            chart.quantity
        )),
    }
    println!();

    let rows = chart
        .points
        .iter()
        .map(|p| PointRow {
            bulletin: p.bulletin_number.clone(),
            date: p.collection_date.to_string(),
            value: p.value.map_or_else(|| "-".to_string(), |v| v.to_string()),
            status: match p.in_control {
                Some(true) => "in control".green().to_string(),
                Some(false) => "OUT OF CONTROL".red().bold().to_string(),
                None => "-".dimmed().to_string(),
            },
            used: (if p.used_in_calculation { "✓" } else { "" }).to_string(),
        })
        .collect();
    output::print_table(rows);
}

fn read_sample(path: &Path) -> CliResult<CepSample> {
    let contents = std::fs::read_to_string(path)?;
    let doc: SampleDocument = serde_json::from_str(&contents)?;
    Ok(doc.into())
}

/// Execute a CEP command
pub fn execute(command: CepCommands, monitor: &CepMonitor, format: OutputFormat) -> CliResult<()> {
    match command {
        CepCommands::Stats { quantity } => {
            let chart = monitor.chart(&quantity)?;
            match format {
                OutputFormat::Table => print_chart(&chart),
                _ => output::print_single(&chart, format)?,
            }
            Ok(())
        }

        CepCommands::Ingest { file } => {
            let sample = read_sample(&file)?;
            let id = sample.id;
            monitor.ingest(sample)?;
            print_success(&format!("Ingested sample: {}", id));
            Ok(())
        }

        CepCommands::Edit { id, set, reason } => {
            let id = parse_id(&id)?;
            let current = monitor.store().get_sample(id)?;
            let changes = resolve_changes(&current, &set)?;
            let updated = monitor.edit_sample(id, &changes, reason.as_deref().unwrap_or_default())?;
            match format {
                OutputFormat::Table => print_success(&format!(
                    "Updated sample {} ({} audited edit(s))",
                    id,
                    updated.edit_history.len()
                )),
                _ => output::print_single(&updated, format)?,
            }
            Ok(())
        }

        CepCommands::History { id } => {
            let sample = monitor.store().get_sample(parse_id(&id)?)?;
            match format {
                OutputFormat::Table => {
                    print_field("Bulletin", &sample.bulletin_number);
                    print_field("Collected", sample.collection_date);
                    println!();
                    output::print_table(sample.edit_history.iter().map(EditRow::from).collect());
                }
                _ => output::print_single(&sample.edit_history, format)?,
            }
            Ok(())
        }

        CepCommands::Clear { yes } => {
            if !yes {
                return Err(CliError::InvalidInput(
                    "refusing to clear the historical store without --yes".into(),
                ));
            }
            let removed = monitor.clear()?;
            print_success(&format!("Removed {} sample(s)", removed));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_accept_comma_decimals() {
        assert_eq!(
            parse_assignment("fatorCompressibilidade=0,9971").unwrap(),
            ("fatorCompressibilidade".to_string(), 0.9971)
        );
        assert_eq!(
            parse_assignment(" methane = 90.5 ").unwrap(),
            ("methane".to_string(), 90.5)
        );
        assert!(parse_assignment("methane").is_err());
        assert!(parse_assignment("=1").is_err());
        assert!(parse_assignment("methane=abc").is_err());
    }

    #[test]
    fn changes_target_the_existing_section() {
        let sample = CepSample::new("B-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with_component("methane", 90.0)
            .with_property("fatorCompressibilidade", 0.998);
        let changes = resolve_changes(
            &sample,
            &[
                "fatorCompressibilidade=0.997".to_string(),
                "methane=91".to_string(),
                "ethane=3".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(changes[0], FieldChange::property("fatorCompressibilidade", 0.997));
        assert_eq!(changes[1], FieldChange::component("methane", 91.0));
        assert_eq!(changes[2], FieldChange::component("ethane", 3.0));
    }

    #[test]
    fn sample_document_without_id_gets_one() {
        let doc: SampleDocument = serde_json::from_str(
            r#"{"bulletin_number":"BOL-7","collection_date":"2024-03-01","components":{"methane":90.1}}"#,
        )
        .unwrap();
        let sample = CepSample::from(doc);
        assert_eq!(sample.bulletin_number, "BOL-7");
        assert_eq!(sample.value_of("methane"), Some(90.1));
        assert!(sample.edit_history.is_empty());
    }

    #[test]
    fn edit_row_lists_changes() {
        let mut sample = CepSample::new("B-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with_component("methane", 90.0);
        let record = sample
            .apply_edit(
                &[FieldChange::component("methane", 90.5)],
                "typo",
                chrono::Utc::now(),
            )
            .unwrap()
            .clone();
        let row = EditRow::from(&record);
        assert_eq!(row.changes, "methane: 90 → 90.5");
        assert_eq!(row.reason, "typo");
    }

    #[test]
    fn clear_requires_confirmation() {
        let sample = CepSample::new("B-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with_component("methane", 90.0);
        let store = gasval_cep::InMemoryStore::with_samples(vec![sample]).unwrap();
        let monitor = CepMonitor::new(std::sync::Arc::new(store));

        let err = execute(CepCommands::Clear { yes: false }, &monitor, OutputFormat::Table)
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert_eq!(monitor.samples().unwrap().len(), 1);

        execute(CepCommands::Clear { yes: true }, &monitor, OutputFormat::Table).unwrap();
        assert!(monitor.samples().unwrap().is_empty());
    }
}
