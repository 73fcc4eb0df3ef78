//! Gas quality classification against the composition limit tables.

use std::sync::Arc;

use gasval_types::{
    CheckStatus, ComponentKey, ComponentMeasurement, GasQuality, LimitRange, QualityTier, Reading,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tables::{CompositionTable, ReferenceTables};

/// One component failing one table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LimitViolation {
    pub component: ComponentKey,
    pub observed: Reading,
    pub status: CheckStatus,
    pub limits: LimitRange,
}

/// Per-table list of violations, for user-facing explanation.
///
/// Not used by the classification decision itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TierDiagnostics {
    pub pipeline: Vec<LimitViolation>,
    pub intermediate: Vec<LimitViolation>,
}

impl TierDiagnostics {
    pub fn for_tier(&self, tier: QualityTier) -> &[LimitViolation] {
        match tier {
            QualityTier::Pipeline => &self.pipeline,
            QualityTier::Intermediate => &self.intermediate,
        }
    }
}

/// Classifies compositions into [`GasQuality`] tiers.
///
/// The check is strictly conjunctive: one component outside a table's bounds
/// fails the whole table, however small the excess.
#[derive(Clone, Debug)]
pub struct Classifier {
    tables: Arc<ReferenceTables>,
}

impl Classifier {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Strictest tier whose table every component satisfies.
    pub fn classify(&self, components: &[ComponentMeasurement]) -> GasQuality {
        let quality = if self.is_within(components, QualityTier::Pipeline) {
            GasQuality::Pipeline
        } else if self.is_within(components, QualityTier::Intermediate) {
            GasQuality::Intermediate
        } else {
            GasQuality::OutOfSpecification
        };
        debug!(
            components = components.len(),
            quality = ?quality,
            tables = %self.tables.version,
            "Classified composition"
        );
        quality
    }

    /// True iff every component is unconstrained by the tier's table or
    /// has a numeric value inside its bounds.
    pub fn is_within(&self, components: &[ComponentMeasurement], tier: QualityTier) -> bool {
        let table = self.tables.composition(tier);
        components
            .iter()
            .all(|m| Self::status_in(table, m).passes())
    }

    /// Violations per table.
    pub fn diagnostics(&self, components: &[ComponentMeasurement]) -> TierDiagnostics {
        TierDiagnostics {
            pipeline: self.violations(components, QualityTier::Pipeline),
            intermediate: self.violations(components, QualityTier::Intermediate),
        }
    }

    /// Bounds of `component` in the tier's table, if any.
    pub fn limits_for(&self, component: &ComponentKey, tier: QualityTier) -> Option<&LimitRange> {
        component
            .id()
            .and_then(|id| self.tables.composition(tier).get(id))
    }

    fn violations(&self, components: &[ComponentMeasurement], tier: QualityTier) -> Vec<LimitViolation> {
        let table = self.tables.composition(tier);
        components
            .iter()
            .filter_map(|m| {
                let limits = m.component.id().and_then(|id| table.get(id))?;
                let status = CheckStatus::evaluate(&m.molar_percent, Some(limits));
                (!status.passes()).then(|| LimitViolation {
                    component: m.component.clone(),
                    observed: m.molar_percent.clone(),
                    status,
                    limits: *limits,
                })
            })
            .collect()
    }

    fn status_in(table: &CompositionTable, m: &ComponentMeasurement) -> CheckStatus {
        let limits = m.component.id().and_then(|id| table.get(id));
        CheckStatus::evaluate(&m.molar_percent, limits)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceTables::default()))
    }
}
