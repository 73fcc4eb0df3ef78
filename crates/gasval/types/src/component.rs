//! Canonical gas component identifiers.
//!
//! Limit tables are keyed by [`ComponentId`], never by display text. Free-text
//! names coming from a report are resolved once, at the boundary, through
//! [`ComponentKey::parse`]; anything that does not resolve stays visible as
//! [`ComponentKey::Unlisted`] instead of silently matching nothing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a name does not resolve to any known component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component identifier: {0}")]
pub struct UnknownComponent(pub String);

// ── ComponentId ─────────────────────────────────────────────────────────

/// The 21 components of the AGA-8 composition model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentId {
    Methane,
    Nitrogen,
    CarbonDioxide,
    Ethane,
    Propane,
    IsoButane,
    NormalButane,
    IsoPentane,
    NormalPentane,
    NormalHexane,
    NormalHeptane,
    NormalOctane,
    NormalNonane,
    NormalDecane,
    Hydrogen,
    Oxygen,
    CarbonMonoxide,
    Water,
    HydrogenSulfide,
    Helium,
    Argon,
}

impl ComponentId {
    /// Every component, in AGA-8 order.
    pub const ALL: [ComponentId; 21] = [
        ComponentId::Methane,
        ComponentId::Nitrogen,
        ComponentId::CarbonDioxide,
        ComponentId::Ethane,
        ComponentId::Propane,
        ComponentId::IsoButane,
        ComponentId::NormalButane,
        ComponentId::IsoPentane,
        ComponentId::NormalPentane,
        ComponentId::NormalHexane,
        ComponentId::NormalHeptane,
        ComponentId::NormalOctane,
        ComponentId::NormalNonane,
        ComponentId::NormalDecane,
        ComponentId::Hydrogen,
        ComponentId::Oxygen,
        ComponentId::CarbonMonoxide,
        ComponentId::Water,
        ComponentId::HydrogenSulfide,
        ComponentId::Helium,
        ComponentId::Argon,
    ];

    /// Canonical identifier, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentId::Methane => "methane",
            ComponentId::Nitrogen => "nitrogen",
            ComponentId::CarbonDioxide => "carbon_dioxide",
            ComponentId::Ethane => "ethane",
            ComponentId::Propane => "propane",
            ComponentId::IsoButane => "iso_butane",
            ComponentId::NormalButane => "normal_butane",
            ComponentId::IsoPentane => "iso_pentane",
            ComponentId::NormalPentane => "normal_pentane",
            ComponentId::NormalHexane => "normal_hexane",
            ComponentId::NormalHeptane => "normal_heptane",
            ComponentId::NormalOctane => "normal_octane",
            ComponentId::NormalNonane => "normal_nonane",
            ComponentId::NormalDecane => "normal_decane",
            ComponentId::Hydrogen => "hydrogen",
            ComponentId::Oxygen => "oxygen",
            ComponentId::CarbonMonoxide => "carbon_monoxide",
            ComponentId::Water => "water",
            ComponentId::HydrogenSulfide => "hydrogen_sulfide",
            ComponentId::Helium => "helium",
            ComponentId::Argon => "argon",
        }
    }

    /// Chemical formula.
    pub fn formula(&self) -> &'static str {
        match self {
            ComponentId::Methane => "CH4",
            ComponentId::Nitrogen => "N2",
            ComponentId::CarbonDioxide => "CO2",
            ComponentId::Ethane => "C2H6",
            ComponentId::Propane => "C3H8",
            ComponentId::IsoButane => "i-C4H10",
            ComponentId::NormalButane => "n-C4H10",
            ComponentId::IsoPentane => "i-C5H12",
            ComponentId::NormalPentane => "n-C5H12",
            ComponentId::NormalHexane => "n-C6H14",
            ComponentId::NormalHeptane => "n-C7H16",
            ComponentId::NormalOctane => "n-C8H18",
            ComponentId::NormalNonane => "n-C9H20",
            ComponentId::NormalDecane => "n-C10H22",
            ComponentId::Hydrogen => "H2",
            ComponentId::Oxygen => "O2",
            ComponentId::CarbonMonoxide => "CO",
            ComponentId::Water => "H2O",
            ComponentId::HydrogenSulfide => "H2S",
            ComponentId::Helium => "He",
            ComponentId::Argon => "Ar",
        }
    }

    /// Label printed on the chromatography report.
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentId::Methane => "Metano (CH₄)",
            ComponentId::Nitrogen => "Nitrogênio (N₂)",
            ComponentId::CarbonDioxide => "Dióxido de Carbono (CO₂)",
            ComponentId::Ethane => "Etano (C₂H₆)",
            ComponentId::Propane => "Propano (C₃H₈)",
            ComponentId::IsoButane => "i-Butano (i-C₄H₁₀)",
            ComponentId::NormalButane => "n-Butano (n-C₄H₁₀)",
            ComponentId::IsoPentane => "i-Pentano (i-C₅H₁₂)",
            ComponentId::NormalPentane => "n-Pentano (n-C₅H₁₂)",
            ComponentId::NormalHexane => "n-Hexano (n-C₆H₁₄)",
            ComponentId::NormalHeptane => "n-Heptano (n-C₇H₁₆)",
            ComponentId::NormalOctane => "n-Octano (n-C₈H₁₈)",
            ComponentId::NormalNonane => "n-Nonano (n-C₉H₂₀)",
            ComponentId::NormalDecane => "n-Decano (n-C₁₀H₂₂)",
            ComponentId::Hydrogen => "Hidrogênio (H₂)",
            ComponentId::Oxygen => "Oxigênio (O₂)",
            ComponentId::CarbonMonoxide => "Monóxido de Carbono (CO)",
            ComponentId::Water => "Água (H₂O)",
            ComponentId::HydrogenSulfide => "Sulfeto de Hidrogênio (H₂S)",
            ComponentId::Helium => "Hélio (He)",
            ComponentId::Argon => "Argônio (Ar)",
        }
    }

    /// Extra spellings accepted on input besides identifier, formula and display name.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ComponentId::Methane => &["C1", "metano"],
            ComponentId::Nitrogen => &["nitrogenio"],
            ComponentId::CarbonDioxide => &["dioxido de carbono", "carbon dioxide"],
            ComponentId::Ethane => &["C2", "etano"],
            ComponentId::Propane => &["C3", "propano"],
            ComponentId::IsoButane => &["iC4", "isobutane", "isobutano", "i-butano"],
            ComponentId::NormalButane => &["nC4", "n-butane", "butane", "n-butano", "butano"],
            ComponentId::IsoPentane => &["iC5", "isopentane", "isopentano", "i-pentano"],
            ComponentId::NormalPentane => &["nC5", "n-pentane", "pentane", "n-pentano", "pentano"],
            ComponentId::NormalHexane => &["nC6", "C6", "n-hexane", "hexane", "hexano", "n-hexano"],
            ComponentId::NormalHeptane => &["nC7", "C7", "n-heptane", "heptane", "heptano"],
            ComponentId::NormalOctane => &["nC8", "C8", "n-octane", "octane", "octano"],
            ComponentId::NormalNonane => &["nC9", "C9", "n-nonane", "nonane", "nonano"],
            ComponentId::NormalDecane => &["nC10", "C10", "n-decane", "decane", "decano"],
            ComponentId::Hydrogen => &["hidrogenio"],
            ComponentId::Oxygen => &["oxigenio"],
            ComponentId::CarbonMonoxide => &["monoxido de carbono", "carbon monoxide"],
            ComponentId::Water => &["agua"],
            ComponentId::HydrogenSulfide => &["sulfeto de hidrogenio", "hydrogen sulfide"],
            ComponentId::Helium => &["helio"],
            ComponentId::Argon => &["argonio"],
        }
    }

    /// Resolve a free-text name to a component.
    ///
    /// Matching ignores case, accents, subscript digits, spaces and punctuation,
    /// so `"Metano (CH₄)"`, `"metano"`, `"CH4"` and `"C1"` all resolve to methane.
    pub fn lookup(name: &str) -> Option<ComponentId> {
        let needle = normalize(name);
        if needle.is_empty() {
            return None;
        }
        ComponentId::ALL.into_iter().find(|id| {
            normalize(id.as_str()) == needle
                || normalize(id.formula()) == needle
                || normalize(id.display_name()) == needle
                || id.aliases().iter().any(|alias| normalize(alias) == needle)
        })
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComponentId {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentId::lookup(s).ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

/// Fold a name to lowercase ASCII alphanumerics.
fn normalize(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            let folded = match c {
                'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
                'é' | 'ê' | 'è' | 'É' | 'Ê' | 'È' => 'e',
                'í' | 'î' | 'Í' | 'Î' => 'i',
                'ó' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'o',
                'ú' | 'ü' | 'Ú' | 'Ü' => 'u',
                'ç' | 'Ç' => 'c',
                '₀'..='₉' => char::from(b'0' + (c as u32 - '₀' as u32) as u8),
                other => other,
            };
            folded
                .is_ascii_alphanumeric()
                .then(|| folded.to_ascii_lowercase())
        })
        .collect()
}

// ── ComponentKey ────────────────────────────────────────────────────────

/// A component as named on an incoming report.
///
/// Serializes as a plain string: the canonical identifier for known
/// components, the original text for unlisted ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKey {
    /// Resolved to a canonical component.
    Known(ComponentId),
    /// Did not resolve. Never matches a limit-table entry.
    Unlisted(String),
}

impl ComponentKey {
    pub fn parse(name: &str) -> Self {
        match ComponentId::lookup(name) {
            Some(id) => ComponentKey::Known(id),
            None => ComponentKey::Unlisted(name.trim().to_string()),
        }
    }

    pub fn id(&self) -> Option<ComponentId> {
        match self {
            ComponentKey::Known(id) => Some(*id),
            ComponentKey::Unlisted(_) => None,
        }
    }

    pub fn is_unlisted(&self) -> bool {
        matches!(self, ComponentKey::Unlisted(_))
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &str {
        match self {
            ComponentKey::Known(id) => id.display_name(),
            ComponentKey::Unlisted(name) => name,
        }
    }
}

impl From<ComponentId> for ComponentKey {
    fn from(id: ComponentId) -> Self {
        ComponentKey::Known(id)
    }
}

impl From<String> for ComponentKey {
    fn from(name: String) -> Self {
        ComponentKey::parse(&name)
    }
}

impl From<&str> for ComponentKey {
    fn from(name: &str) -> Self {
        ComponentKey::parse(name)
    }
}

impl From<ComponentKey> for String {
    fn from(key: ComponentKey) -> Self {
        match key {
            ComponentKey::Known(id) => id.as_str().to_string(),
            ComponentKey::Unlisted(name) => name,
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKey::Known(id) => write!(f, "{}", id),
            ComponentKey::Unlisted(name) => write!(f, "{} (unlisted)", name),
        }
    }
}
