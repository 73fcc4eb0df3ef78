//! Reference data: composition limit tables, operating ranges and the
//! AGA-8 DETAIL envelope.
//!
//! The tables are an immutable, versioned value. Classifier, range validator
//! and selector receive them at construction, so a regulatory update is a
//! data change: load a new document, build new engine components.

use std::collections::BTreeMap;
use std::path::Path;

use gasval_types::{ComponentId, LimitRange, OperatingRange, OperationalRange, QualityTier};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};

/// Version tag of the built-in dataset.
pub const DEFAULT_TABLES_VERSION: &str = "aga8-part2-2017";

// ── Composition table ───────────────────────────────────────────────────

/// Per-component molar-percent bounds for one quality tier.
///
/// A component without an entry is unconstrained.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LimitEntry>", into = "Vec<LimitEntry>")]
pub struct CompositionTable {
    limits: BTreeMap<ComponentId, LimitRange>,
}

/// Serialized form of one table row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitEntry {
    pub component: String,
    pub min: f64,
    pub max: f64,
}

impl CompositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, component: ComponentId, min: f64, max: f64) -> Self {
        self.limits.insert(component, LimitRange::new(min, max));
        self
    }

    pub fn get(&self, component: ComponentId) -> Option<&LimitRange> {
        self.limits.get(&component)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &LimitRange)> {
        self.limits.iter().map(|(id, range)| (*id, range))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Components whose bounds in `self` are not nested inside `outer`,
    /// including components constrained by `outer` but not by `self`.
    pub fn not_nested_in(&self, outer: &CompositionTable) -> Vec<ComponentId> {
        let mut offenders: Vec<ComponentId> = outer
            .iter()
            .filter(|(id, outer_range)| match self.get(*id) {
                Some(inner) => !inner.is_within(outer_range),
                None => true,
            })
            .map(|(id, _)| id)
            .collect();
        offenders.sort();
        offenders
    }

    fn validate(&self, table: &str) -> EngineResult<()> {
        for (id, range) in self.iter() {
            if !range.is_well_formed() {
                return Err(EngineError::InvalidTable {
                    table: table.to_string(),
                    detail: format!("{}: bounds {} are not an ordered finite range", id, range),
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<LimitEntry>> for CompositionTable {
    type Error = EngineError;

    fn try_from(entries: Vec<LimitEntry>) -> Result<Self, Self::Error> {
        let mut limits = BTreeMap::new();
        for entry in entries {
            let id: ComponentId = entry.component.parse()?;
            if limits
                .insert(id, LimitRange::new(entry.min, entry.max))
                .is_some()
            {
                return Err(EngineError::DuplicateEntry {
                    table: "composition".into(),
                    component: id.to_string(),
                });
            }
        }
        Ok(Self { limits })
    }
}

impl From<CompositionTable> for Vec<LimitEntry> {
    fn from(table: CompositionTable) -> Self {
        table
            .limits
            .into_iter()
            .map(|(id, range)| LimitEntry {
                component: id.as_str().to_string(),
                min: range.min,
                max: range.max,
            })
            .collect()
    }
}

// ── DETAIL envelope ─────────────────────────────────────────────────────

/// Conditions under which pipeline gas may use AGA-8 DETAIL instead of GROSS.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailEnvelope {
    pub max_pressure_kpa: f64,
    pub temperature_k: LimitRange,
    pub min_methane_percent: f64,
}

impl Default for DetailEnvelope {
    fn default() -> Self {
        Self {
            max_pressure_kpa: 10_342.0,
            temperature_k: LimitRange::new(269.0, 335.0),
            min_methane_percent: 60.0,
        }
    }
}

// ── Reference tables ────────────────────────────────────────────────────

/// Complete, versioned reference dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub version: String,
    pub pipeline: CompositionTable,
    pub intermediate: CompositionTable,
    pub normal: OperatingRange,
    pub extended: OperatingRange,
    #[serde(default)]
    pub detail: DetailEnvelope,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        use ComponentId::*;

        let pipeline = CompositionTable::new()
            .with(Methane, 70.0, 100.0)
            .with(Nitrogen, 0.0, 20.0)
            .with(CarbonDioxide, 0.0, 20.0)
            .with(Ethane, 0.0, 10.0)
            .with(Propane, 0.0, 3.5)
            .with(IsoButane, 0.0, 1.5)
            .with(NormalButane, 0.0, 1.5)
            .with(IsoPentane, 0.0, 0.5)
            .with(NormalPentane, 0.0, 0.5)
            .with(NormalHexane, 0.0, 0.1)
            .with(NormalHeptane, 0.0, 0.05)
            .with(NormalOctane, 0.0, 0.05)
            .with(NormalNonane, 0.0, 0.05)
            .with(NormalDecane, 0.0, 0.05)
            .with(Hydrogen, 0.0, 10.0)
            .with(Oxygen, 0.0, 0.02)
            .with(CarbonMonoxide, 0.0, 3.0)
            .with(Water, 0.0, 0.015)
            .with(HydrogenSulfide, 0.0, 0.02)
            .with(Helium, 0.0, 0.5);

        let intermediate = CompositionTable::new()
            .with(Methane, 30.0, 100.0)
            .with(Nitrogen, 0.0, 55.0)
            .with(CarbonDioxide, 0.0, 30.0)
            .with(Ethane, 0.0, 25.0)
            .with(Propane, 0.0, 14.0)
            .with(IsoButane, 0.0, 6.0)
            .with(NormalButane, 0.0, 6.0)
            .with(IsoPentane, 0.0, 4.0)
            .with(NormalPentane, 0.0, 4.0)
            .with(NormalHexane, 0.0, 1.0)
            .with(NormalHeptane, 0.0, 0.5)
            .with(NormalOctane, 0.0, 0.5)
            .with(NormalNonane, 0.0, 0.5)
            .with(NormalDecane, 0.0, 0.5)
            .with(Hydrogen, 0.0, 30.0)
            .with(Oxygen, 0.0, 1.0)
            .with(CarbonMonoxide, 0.0, 3.0)
            .with(Water, 0.0, 0.02)
            .with(HydrogenSulfide, 0.0, 3.0)
            .with(Helium, 0.0, 3.0);

        Self {
            version: DEFAULT_TABLES_VERSION.to_string(),
            pipeline,
            intermediate,
            normal: OperatingRange {
                pressure_kpa: LimitRange::up_to(35_000.0),
                temperature_k: LimitRange::new(90.0, 450.0),
            },
            extended: OperatingRange {
                pressure_kpa: LimitRange::up_to(70_000.0),
                temperature_k: LimitRange::new(60.0, 700.0),
            },
            detail: DetailEnvelope::default(),
        }
    }
}

impl ReferenceTables {
    pub fn composition(&self, tier: QualityTier) -> &CompositionTable {
        match tier {
            QualityTier::Pipeline => &self.pipeline,
            QualityTier::Intermediate => &self.intermediate,
        }
    }

    pub fn operating(&self, range: OperationalRange) -> &OperatingRange {
        match range {
            OperationalRange::Normal => &self.normal,
            OperationalRange::Extended => &self.extended,
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let tables: ReferenceTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        let tables: ReferenceTables = serde_yaml::from_str(yaml)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let parse: fn(&str) -> EngineResult<Self> = match extension.as_str() {
            "json" => Self::from_json_str,
            "yaml" | "yml" => Self::from_yaml_str,
            other => return Err(EngineError::UnsupportedFormat(other.to_string())),
        };
        let tables = parse(&std::fs::read_to_string(path)?)?;
        debug!(
            path = %path.display(),
            version = %tables.version,
            "Loaded reference tables"
        );
        Ok(tables)
    }

    /// Check that every range is usable.
    ///
    /// A non-monotone dataset (Intermediate not a superset of Pipeline) is
    /// accepted with a warning.
    pub fn validate(&self) -> EngineResult<()> {
        if self.version.trim().is_empty() {
            return Err(EngineError::InvalidTable {
                table: "reference".into(),
                detail: "version must not be empty".into(),
            });
        }
        self.pipeline.validate("pipeline")?;
        self.intermediate.validate("intermediate")?;

        for (name, range) in [("normal", &self.normal), ("extended", &self.extended)] {
            if !range.pressure_kpa.is_well_formed() || !range.temperature_k.is_well_formed() {
                return Err(EngineError::InvalidTable {
                    table: name.into(),
                    detail: format!(
                        "pressure {} kPa / temperature {} K is not an ordered finite range",
                        range.pressure_kpa, range.temperature_k
                    ),
                });
            }
        }

        let detail = &self.detail;
        if !detail.max_pressure_kpa.is_finite()
            || !detail.min_methane_percent.is_finite()
            || !detail.temperature_k.is_well_formed()
        {
            return Err(EngineError::InvalidTable {
                table: "detail".into(),
                detail: "DETAIL envelope bounds must be finite and ordered".into(),
            });
        }

        let offenders = self.pipeline.not_nested_in(&self.intermediate);
        if !offenders.is_empty() {
            warn!(
                version = %self.version,
                components = ?offenders,
                "Intermediate table is not a superset of the pipeline table"
            );
        }
        if !self.normal.pressure_kpa.is_within(&self.extended.pressure_kpa)
            || !self.normal.temperature_k.is_within(&self.extended.temperature_k)
        {
            warn!(version = %self.version, "Normal operating range is not inside the extended range");
        }
        Ok(())
    }
}
