use std::fmt;

use serde::{Deserialize, Serialize};

/// Composition quality of a gas sample.
///
/// Ordered from strictest to loosest: a `Pipeline` gas also satisfies the
/// `Intermediate` table for any monotone reference dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GasQuality {
    Pipeline,
    Intermediate,
    OutOfSpecification,
}

impl GasQuality {
    /// Table used to explain per-component checks for this quality.
    ///
    /// Pipeline gas is explained against the Pipeline table, everything else
    /// against the Intermediate table.
    pub fn explanatory_tier(&self) -> QualityTier {
        match self {
            GasQuality::Pipeline => QualityTier::Pipeline,
            GasQuality::Intermediate | GasQuality::OutOfSpecification => QualityTier::Intermediate,
        }
    }
}

impl fmt::Display for GasQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasQuality::Pipeline => write!(f, "pipeline quality"),
            GasQuality::Intermediate => write!(f, "intermediate quality"),
            GasQuality::OutOfSpecification => write!(f, "out of AGA-8 specification"),
        }
    }
}

/// A composition limit table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Pipeline,
    Intermediate,
}

impl QualityTier {
    pub const ALL: [QualityTier; 2] = [QualityTier::Pipeline, QualityTier::Intermediate];

    pub fn quality(&self) -> GasQuality {
        match self {
            QualityTier::Pipeline => GasQuality::Pipeline,
            QualityTier::Intermediate => GasQuality::Intermediate,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityTier::Pipeline => write!(f, "pipeline"),
            QualityTier::Intermediate => write!(f, "intermediate"),
        }
    }
}

/// Equation of state used for compressibility and density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationMethod {
    #[serde(rename = "AGA8_DETAIL")]
    Aga8Detail,
    #[serde(rename = "AGA8_GROSS")]
    Aga8Gross,
    #[serde(rename = "GERG2008")]
    Gerg2008,
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMethod::Aga8Detail => write!(f, "AGA-8 DETAIL"),
            ValidationMethod::Aga8Gross => write!(f, "AGA-8 GROSS"),
            ValidationMethod::Gerg2008 => write!(f, "GERG-2008"),
        }
    }
}

/// Named operating envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalRange {
    Normal,
    Extended,
}

impl fmt::Display for OperationalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationalRange::Normal => write!(f, "normal"),
            OperationalRange::Extended => write!(f, "extended"),
        }
    }
}
