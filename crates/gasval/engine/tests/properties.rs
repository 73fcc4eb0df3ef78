//! Property tests: classification tiers, table monotonicity and the DETAIL guard.

use std::sync::Arc;

use gasval_engine::*;
use gasval_types::{
    ComponentId, ComponentMeasurement, GasQuality, OperationalRange, QualityTier, ValidationMethod,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn default_tables() -> Arc<ReferenceTables> {
    Arc::new(ReferenceTables::default())
}

/// Place each fraction inside the bounds of the matching table entry,
/// keeping only the entries whose flag is set.
fn inside(table: &CompositionTable, picks: &[(bool, f64)]) -> Vec<ComponentMeasurement> {
    table
        .iter()
        .zip(picks)
        .filter(|(_, (keep, _))| *keep)
        .map(|((id, range), (_, f))| {
            ComponentMeasurement::known(id, range.min + f * (range.max - range.min))
        })
        .collect()
}

fn arb_picks() -> impl Strategy<Value = Vec<(bool, f64)>> {
    prop::collection::vec((any::<bool>(), 0.0f64..=1.0), 21)
}

/// Arbitrary composition over every known component, values 0..100 mol%.
fn arb_composition() -> impl Strategy<Value = Vec<ComponentMeasurement>> {
    prop::collection::vec((0usize..ComponentId::ALL.len(), 0.0f64..100.0), 1..12).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(i, v)| ComponentMeasurement::known(ComponentId::ALL[i], v))
                .collect()
        },
    )
}

fn arb_conditions() -> impl Strategy<Value = (f64, f64)> {
    // (temperature K, pressure kPa), spanning well beyond the extended range.
    (40.0f64..800.0, 0.0f64..90_000.0)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn compositions_inside_pipeline_table_classify_as_pipeline(picks in arb_picks()) {
        let tables = default_tables();
        let classifier = Classifier::new(tables.clone());
        let gas = inside(&tables.pipeline, &picks);
        prop_assert_eq!(classifier.classify(&gas), GasQuality::Pipeline);
    }

    #[test]
    fn one_component_beyond_both_tables_is_out_of_spec(
        picks in arb_picks(),
        which in 0usize..20,
        excess in 0.001f64..50.0,
    ) {
        let tables = default_tables();
        let classifier = Classifier::new(tables.clone());
        let mut gas = inside(&tables.pipeline, &picks);

        let (id, outer) = tables.intermediate.iter().nth(which % tables.intermediate.len()).unwrap();
        gas.retain(|m| m.component.id() != Some(id));
        gas.push(ComponentMeasurement::known(id, outer.max + excess));

        prop_assert_eq!(classifier.classify(&gas), GasQuality::OutOfSpecification);
    }

    #[test]
    fn pipeline_compliance_implies_intermediate_compliance(gas in arb_composition()) {
        let classifier = Classifier::new(default_tables());
        if classifier.is_within(&gas, QualityTier::Pipeline) {
            prop_assert!(classifier.is_within(&gas, QualityTier::Intermediate));
        }
    }

    #[test]
    fn detail_only_when_every_guard_holds(
        gas in arb_composition(),
        (temperature_k, pressure_kpa) in arb_conditions(),
    ) {
        let selector = MethodSelector::new(default_tables());
        let selection = selector.select(&gas, temperature_k, pressure_kpa);
        if selection.method == ValidationMethod::Aga8Detail {
            prop_assert_eq!(selector.classifier().classify(&gas), GasQuality::Pipeline);
            prop_assert!(
                selector
                    .ranges()
                    .validate(pressure_kpa, temperature_k, OperationalRange::Normal)
                    .is_valid
            );
            prop_assert!(selector.detail_criteria(&gas, temperature_k, pressure_kpa).satisfied());
            prop_assert!(selection.is_valid);
        }
    }

    #[test]
    fn quality_never_affects_validity_beyond_ranges(
        gas in arb_composition(),
        (temperature_k, pressure_kpa) in arb_conditions(),
    ) {
        let selector = MethodSelector::new(default_tables());
        let selection = selector.select(&gas, temperature_k, pressure_kpa);
        let extended = selector
            .ranges()
            .validate(pressure_kpa, temperature_k, OperationalRange::Extended);
        prop_assert_eq!(selection.is_valid, extended.is_valid);
    }

    #[test]
    fn selection_and_classification_are_idempotent(
        gas in arb_composition(),
        (temperature_k, pressure_kpa) in arb_conditions(),
    ) {
        let selector = MethodSelector::new(default_tables());
        prop_assert_eq!(
            selector.classifier().classify(&gas),
            selector.classifier().classify(&gas)
        );
        prop_assert_eq!(
            selector.select(&gas, temperature_k, pressure_kpa),
            selector.select(&gas, temperature_k, pressure_kpa)
        );
    }

    #[test]
    fn aggregator_emits_one_check_per_component(
        gas in arb_composition(),
        temperature_c in -200.0f64..400.0,
        pressure_kpa in 0.0f64..90_000.0,
    ) {
        let aggregator = CriteriaAggregator::new(default_tables());
        let result = aggregator.evaluate(&gas, temperature_c, pressure_kpa);
        prop_assert_eq!(result.component_checks.len(), gas.len());
        let expected_tier = result.gas_quality.explanatory_tier();
        for (check, m) in result.component_checks.iter().zip(&gas) {
            prop_assert_eq!(&check.component, &m.component);
            prop_assert_eq!(check.tier_used, expected_tier);
        }
    }
}
