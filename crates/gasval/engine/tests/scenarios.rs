//! End-to-end validation scenarios over the built-in reference dataset.

use std::sync::Arc;

use gasval_engine::*;
use gasval_types::{
    ComponentId, ComponentMeasurement, GasQuality, OperationalRange, Reading, ValidationMethod,
};

fn typical_gas() -> Vec<ComponentMeasurement> {
    vec![
        ComponentMeasurement::known(ComponentId::Methane, 95.0),
        ComponentMeasurement::known(ComponentId::Ethane, 3.0),
        ComponentMeasurement::known(ComponentId::Nitrogen, 1.0),
        ComponentMeasurement::known(ComponentId::CarbonDioxide, 1.0),
    ]
}

#[test]
fn pipeline_gas_at_moderate_conditions_uses_detail() {
    let aggregator = CriteriaAggregator::default();
    let result = aggregator.evaluate(&typical_gas(), 25.0, 5_000.0);

    assert_eq!(result.gas_quality, GasQuality::Pipeline);
    assert_eq!(result.method, ValidationMethod::Aga8Detail);
    assert_eq!(result.operational_range, OperationalRange::Normal);
    assert!(result.is_valid);
    assert!(result.warnings.is_empty());
    assert!(result.component_checks.iter().all(|c| c.within_limits));
}

#[test]
fn pipeline_gas_at_high_pressure_uses_gerg_extended() {
    let aggregator = CriteriaAggregator::default();
    let result = aggregator.evaluate(&typical_gas(), 25.0, 50_000.0);

    assert_eq!(result.gas_quality, GasQuality::Pipeline);
    assert_eq!(result.method, ValidationMethod::Gerg2008);
    assert_eq!(result.operational_range, OperationalRange::Extended);
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("50000 kPa"));
}

#[test]
fn high_nitrogen_gas_is_out_of_specification() {
    let aggregator = CriteriaAggregator::default();
    let gas = vec![
        ComponentMeasurement::known(ComponentId::Methane, 38.0),
        ComponentMeasurement::known(ComponentId::Nitrogen, 60.0),
        ComponentMeasurement::known(ComponentId::CarbonDioxide, 2.0),
    ];

    let result = aggregator.evaluate(&gas, 25.0, 5_000.0);
    assert_eq!(result.gas_quality, GasQuality::OutOfSpecification);
    assert_eq!(result.method, ValidationMethod::Gerg2008);
    assert!(result.reason.contains("out of AGA-8 specification"));
    assert!(result.is_valid);

    let result = aggregator.evaluate(&gas, 25.0, 75_000.0);
    assert_eq!(result.method, ValidationMethod::Gerg2008);
    assert!(!result.is_valid);
}

#[test]
fn report_document_is_evaluated_end_to_end() {
    let json = r#"{
        "components": [
            { "name": "Metano (CH₄)", "molar_percent": "95,0" },
            { "name": "ethane", "molar_percent": 3.0 },
            { "name": "N2", "molar_percent": 1.0 },
            { "name": "CO2", "molar_percent": 1.0 },
            { "name": "xenon", "molar_percent": 0.0 }
        ],
        "temperature_c": 25.0,
        "pressure_kpa": "5000",
        "heating_value": 38.2,
        "relative_density": 0.58
    }"#;
    let fields: ReportFields = serde_json::from_str(json).unwrap();
    assert_eq!(fields.components[0].molar_percent, Reading::Value(95.0));

    let eval = CriteriaAggregator::default().evaluate_report(&fields);
    assert_eq!(eval.result.method, ValidationMethod::Aga8Detail);
    assert!(!eval.result.has_input_issues());
    assert_eq!(
        eval.descriptors.z_method,
        "AGA-8 GROSS (heating value + relative density)"
    );
    assert!(eval.result.component_checks[4].component.is_unlisted());
}

#[test]
fn synthetic_tables_change_the_outcome_without_code_changes() {
    let yaml = r#"
version: stricter-1
pipeline:
  - { component: methane, min: 96, max: 100 }
intermediate:
  - { component: methane, min: 90, max: 100 }
normal:
  pressure_kpa: { min: 0, max: 35000 }
  temperature_k: { min: 90, max: 450 }
extended:
  pressure_kpa: { min: 0, max: 70000 }
  temperature_k: { min: 60, max: 700 }
"#;
    let tables = Arc::new(ReferenceTables::from_yaml_str(yaml).unwrap());
    let aggregator = CriteriaAggregator::new(tables);
    let result = aggregator.evaluate(&typical_gas(), 25.0, 5_000.0);
    assert_eq!(result.gas_quality, GasQuality::Intermediate);
    assert_eq!(result.method, ValidationMethod::Gerg2008);
}

#[test]
fn reference_tables_load_from_file() {
    let dir = std::env::temp_dir().join(format!("gasval_tables_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tables.json");
    let json = serde_json::to_string_pretty(&ReferenceTables::default()).unwrap();
    std::fs::write(&path, json).unwrap();

    let loaded = ReferenceTables::load(&path).unwrap();
    assert_eq!(loaded, ReferenceTables::default());

    let err = ReferenceTables::load(dir.join("tables.toml")).unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedFormat(_)));

    let _ = std::fs::remove_dir_all(&dir);
}
