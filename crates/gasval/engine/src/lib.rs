//! # gasval-engine
//!
//! Analytical validation of natural-gas chromatography reports.
//!
//! ```text
//!   ReferenceTables (versioned, immutable, shared via Arc)
//!        │
//!        ├──► Classifier ──────► GasQuality
//!        ├──► RangeValidator ──► RangeCheck (normal / extended)
//!        └──► MethodSelector ──► MethodSelection
//!                   │
//!                   ▼
//!           CriteriaAggregator ──► ValidationCriteriaResult + ReportDescriptors
//! ```
//!
//! Every operation is a pure function of its inputs and the tables it was
//! built with. Nothing here mutates shared state, so the components can be
//! cloned and used from any number of threads.

#![deny(unsafe_code)]

pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod range;
pub mod report;
pub mod selector;
pub mod tables;

pub use aggregator::{celsius_to_kelvin, CriteriaAggregator, ReportEvaluation, KELVIN_OFFSET};
pub use classifier::{Classifier, LimitViolation, TierDiagnostics};
pub use error::{EngineError, EngineResult};
pub use range::{RangeAssessment, RangeCheck, RangeValidator};
pub use report::{describe_report, ReportDescriptors, ReportFields, FULL_COMPOSITION_MIN_COMPONENTS};
pub use selector::{DetailAssessment, MethodSelector};
pub use tables::{CompositionTable, DetailEnvelope, LimitEntry, ReferenceTables, DEFAULT_TABLES_VERSION};
