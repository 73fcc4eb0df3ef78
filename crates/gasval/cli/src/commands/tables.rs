//! Reference tables command

use gasval_engine::ReferenceTables;
use gasval_types::ComponentId;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{self, print_field, OutputFormat};

/// Table row: one component across both tiers
#[derive(Debug, Serialize, Tabled)]
struct LimitRow {
    component: String,
    formula: String,
    #[tabled(rename = "pipeline (mol %)")]
    pipeline: String,
    #[tabled(rename = "intermediate (mol %)")]
    intermediate: String,
}

fn limit_rows(tables: &ReferenceTables) -> Vec<LimitRow> {
    let describe = |range: Option<&gasval_types::LimitRange>| {
        range.map_or_else(|| "none".to_string(), |r| r.to_string())
    };
    ComponentId::ALL
        .into_iter()
        .map(|id| LimitRow {
            component: id.display_name().to_string(),
            formula: id.formula().to_string(),
            pipeline: describe(tables.pipeline.get(id)),
            intermediate: describe(tables.intermediate.get(id)),
        })
        .collect()
}

/// Execute the tables command
pub fn execute(tables: &ReferenceTables, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            print_field("Version", &tables.version);
            print_field(
                "Normal range",
                format!(
                    "{} kPa, {} K",
                    tables.normal.pressure_kpa, tables.normal.temperature_k
                ),
            );
            print_field(
                "Extended range",
                format!(
                    "{} kPa, {} K",
                    tables.extended.pressure_kpa, tables.extended.temperature_k
                ),
            );
            print_field(
                "DETAIL envelope",
                format!(
                    "P ≤ {} kPa, {} K, methane ≥ {} mol%",
                    tables.detail.max_pressure_kpa,
                    tables.detail.temperature_k,
                    tables.detail.min_methane_percent
                ),
            );
            println!();
            output::print_table(limit_rows(tables));
        }
        _ => output::print_single(tables, format)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_component() {
        let rows = limit_rows(&ReferenceTables::default());
        assert_eq!(rows.len(), ComponentId::ALL.len());
        let argon = rows.iter().find(|r| r.formula == "Ar").unwrap();
        assert_eq!(argon.pipeline, "none");
        let methane = rows.iter().find(|r| r.formula == "CH4").unwrap();
        assert_eq!(methane.pipeline, "70 – 100");
    }
}
