//! # gasval-types
//!
//! Data model of the analytical validation engine for natural-gas
//! chromatography reports.
//!
//! - [`ComponentId`] / [`ComponentKey`] — canonical component identifiers,
//!   kept apart from the display names printed on reports
//! - [`Reading`] / [`ComponentMeasurement`] — parsed molar percentages that
//!   remember when the input was missing or not a number
//! - [`GasQuality`], [`QualityTier`], [`ValidationMethod`], [`OperationalRange`]
//! - [`LimitRange`], [`OperatingRange`] — inclusive bounds
//! - [`MethodSelection`], [`ValidationCriteriaResult`], [`ComponentCheck`]

#![deny(unsafe_code)]

pub mod component;
pub mod limits;
pub mod quality;
pub mod reading;
pub mod result;

pub use component::{ComponentId, ComponentKey, UnknownComponent};
pub use limits::{LimitRange, OperatingRange};
pub use quality::{GasQuality, OperationalRange, QualityTier, ValidationMethod};
pub use reading::{reading_of, ComponentMeasurement, Reading};
pub use result::{
    CheckStatus, ComponentCheck, InputIssue, MethodSelection, ValidationCriteriaResult,
};
