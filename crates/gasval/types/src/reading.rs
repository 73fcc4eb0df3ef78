//! Measured values as they arrive from a report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::{ComponentId, ComponentKey};

/// A parsed measurement.
///
/// Text input is parsed once, at the boundary. A reading that is not a
/// finite number is kept as [`Reading::Missing`] or [`Reading::Malformed`]
/// so that every bound applied to it fails instead of defaulting to zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<RawReading>", into = "Option<RawReading>")]
pub enum Reading {
    Value(f64),
    Missing,
    Malformed(String),
}

/// Wire form of a [`Reading`]: a JSON number, a JSON string, or null.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReading {
    Number(f64),
    Text(String),
}

impl Reading {
    /// Parse decimal text. Accepts `,` as the decimal separator when no `.` is present.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Reading::Missing;
        }
        let candidate = if trimmed.contains(',') && !trimmed.contains('.') {
            trimmed.replace(',', ".")
        } else {
            trimmed.to_string()
        };
        match candidate.parse::<f64>() {
            Ok(v) if v.is_finite() => Reading::Value(v),
            _ => Reading::Malformed(trimmed.to_string()),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    /// Present and strictly positive. Used to count populated components.
    pub fn is_populated(&self) -> bool {
        self.value().is_some_and(|v| v > 0.0)
    }
}

impl Default for Reading {
    fn default() -> Self {
        Reading::Missing
    }
}

impl From<f64> for Reading {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Reading::Value(v)
        } else {
            Reading::Malformed(v.to_string())
        }
    }
}

impl From<&str> for Reading {
    fn from(text: &str) -> Self {
        Reading::parse(text)
    }
}

impl From<Option<f64>> for Reading {
    fn from(v: Option<f64>) -> Self {
        v.map(Reading::from).unwrap_or(Reading::Missing)
    }
}

impl From<Option<RawReading>> for Reading {
    fn from(raw: Option<RawReading>) -> Self {
        match raw {
            None => Reading::Missing,
            Some(RawReading::Number(v)) => Reading::from(v),
            Some(RawReading::Text(text)) => Reading::parse(&text),
        }
    }
}

impl From<Reading> for Option<RawReading> {
    fn from(reading: Reading) -> Self {
        match reading {
            Reading::Value(v) => Some(RawReading::Number(v)),
            Reading::Missing => None,
            Reading::Malformed(raw) => Some(RawReading::Text(raw)),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => write!(f, "{}", v),
            Reading::Missing => write!(f, "(missing)"),
            Reading::Malformed(raw) => write!(f, "{:?} (not a number)", raw),
        }
    }
}

/// One line of a composition: a component and its molar percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentMeasurement {
    #[serde(rename = "name")]
    pub component: ComponentKey,
    #[serde(default)]
    pub molar_percent: Reading,
}

impl ComponentMeasurement {
    pub fn new(component: impl Into<ComponentKey>, molar_percent: impl Into<Reading>) -> Self {
        Self {
            component: component.into(),
            molar_percent: molar_percent.into(),
        }
    }

    /// Shorthand for a known component with a numeric value.
    pub fn known(id: ComponentId, molar_percent: f64) -> Self {
        Self::new(id, molar_percent)
    }
}

/// Reading of `id` in a composition, if the composition lists it.
pub fn reading_of(components: &[ComponentMeasurement], id: ComponentId) -> Option<&Reading> {
    components
        .iter()
        .find(|m| m.component.id() == Some(id))
        .map(|m| &m.molar_percent)
}
