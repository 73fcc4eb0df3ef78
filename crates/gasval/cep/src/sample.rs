//! Historical samples and their audit trail.
//!
//! A sample's values change only through [`CepSample::apply_edit`], which
//! appends an [`EditRecord`] for every accepted correction. The history is
//! append-only; statistics always read the current values.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CepError, CepResult};

// ── Identifiers ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(pub Uuid);

impl SampleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SampleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(SampleId)
    }
}

// ── Field changes ───────────────────────────────────────────────────────

/// Which map of a sample a value lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSection {
    /// Component molar percentages.
    Component,
    /// Derived or measured properties (compressibility factor, density, ...).
    Property,
}

/// One requested correction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub section: FieldSection,
    pub name: String,
    pub value: f64,
}

impl FieldChange {
    pub fn component(name: impl Into<String>, value: f64) -> Self {
        Self {
            section: FieldSection::Component,
            name: name.into(),
            value,
        }
    }

    pub fn property(name: impl Into<String>, value: f64) -> Self {
        Self {
            section: FieldSection::Property,
            name: name.into(),
            value,
        }
    }
}

/// Audit entry appended by every accepted edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub timestamp: DateTime<Utc>,
    pub reason: String,
    pub changed_fields: Vec<String>,
    /// `None` when the field did not exist before the edit.
    pub previous_values: BTreeMap<String, Option<f64>>,
    pub new_values: BTreeMap<String, f64>,
}

// ── Sample ──────────────────────────────────────────────────────────────

/// A completed report kept for statistical monitoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CepSample {
    pub id: SampleId,
    pub bulletin_number: String,
    pub collection_date: NaiveDate,
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
    #[serde(default)]
    pub properties: BTreeMap<String, f64>,
    #[serde(default)]
    pub edit_history: Vec<EditRecord>,
}

impl CepSample {
    pub fn new(bulletin_number: impl Into<String>, collection_date: NaiveDate) -> Self {
        Self {
            id: SampleId::new(),
            bulletin_number: bulletin_number.into(),
            collection_date,
            components: BTreeMap::new(),
            properties: BTreeMap::new(),
            edit_history: Vec::new(),
        }
    }

    pub fn with_component(mut self, name: impl Into<String>, value: f64) -> Self {
        self.components.insert(name.into(), value);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: f64) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Value of a tracked quantity: components first, then properties.
    pub fn value_of(&self, quantity: &str) -> Option<f64> {
        self.components
            .get(quantity)
            .or_else(|| self.properties.get(quantity))
            .copied()
    }

    pub fn is_edited(&self) -> bool {
        !self.edit_history.is_empty()
    }

    /// Check a freshly ingested sample.
    pub fn validate(&self) -> CepResult<()> {
        if self.bulletin_number.trim().is_empty() {
            return Err(CepError::InvalidSample(format!(
                "{}: bulletin number must not be empty",
                self.id
            )));
        }
        for (name, value) in self.components.iter().chain(&self.properties) {
            check_value(name, *value)?;
        }
        Ok(())
    }

    /// Apply a set of corrections and append the audit entry.
    ///
    /// Nothing is modified unless every change is acceptable.
    pub fn apply_edit(
        &mut self,
        changes: &[FieldChange],
        reason: &str,
        at: DateTime<Utc>,
    ) -> CepResult<&EditRecord> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CepError::MissingReason);
        }
        if changes.is_empty() {
            return Err(CepError::NoChanges);
        }

        let mut seen = BTreeSet::new();
        for change in changes {
            if change.name.trim().is_empty() {
                return Err(CepError::InvalidValue {
                    field: change.name.clone(),
                    detail: "field name must not be empty".into(),
                });
            }
            check_value(&change.name, change.value)?;
            if !seen.insert((change.section as u8, change.name.as_str())) {
                return Err(CepError::InvalidValue {
                    field: change.name.clone(),
                    detail: "changed more than once in the same edit".into(),
                });
            }
        }

        let mut record = EditRecord {
            timestamp: at,
            reason: reason.to_string(),
            changed_fields: Vec::with_capacity(changes.len()),
            previous_values: BTreeMap::new(),
            new_values: BTreeMap::new(),
        };
        for change in changes {
            let map = match change.section {
                FieldSection::Component => &mut self.components,
                FieldSection::Property => &mut self.properties,
            };
            let previous = map.insert(change.name.clone(), change.value);
            record.changed_fields.push(change.name.clone());
            record.previous_values.insert(change.name.clone(), previous);
            record.new_values.insert(change.name.clone(), change.value);
        }

        self.edit_history.push(record);
        Ok(&self.edit_history[self.edit_history.len() - 1])
    }
}

fn check_value(field: &str, value: f64) -> CepResult<()> {
    if !value.is_finite() {
        return Err(CepError::InvalidValue {
            field: field.to_string(),
            detail: format!("{} is not a finite number", value),
        });
    }
    if value < 0.0 {
        return Err(CepError::InvalidValue {
            field: field.to_string(),
            detail: format!("{} is negative", value),
        });
    }
    Ok(())
}
