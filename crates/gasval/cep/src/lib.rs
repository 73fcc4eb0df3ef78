//! # gasval-cep
//!
//! Statistical process control (CEP) over historical chromatography results.
//!
//! - [`monitor`] — pure I-MR control-chart statistics over the 8 most recent
//!   valid values of a tracked quantity
//! - [`sample`] — historical samples with an append-only audit trail
//! - [`store`] — the [`HistoricalStore`] contract with in-memory and JSON-file
//!   implementations, both serializing edits behind a single writer
//! - [`service`] — [`CepMonitor`], caching statistics per quantity and
//!   invalidating them on every accepted mutation

#![deny(unsafe_code)]

pub mod error;
pub mod monitor;
pub mod sample;
pub mod service;
pub mod store;

pub use error::{CepError, CepResult};
pub use monitor::{
    collect_window, compute_statistics, round_display, sort_newest_first, CepChart, CepStatistics,
    ChartPoint, D2, DISPLAY_DECIMALS, SIGMA_MULTIPLIER, WINDOW_SIZE,
};
pub use sample::{CepSample, EditRecord, FieldChange, FieldSection, SampleId};
pub use service::CepMonitor;
pub use store::{HistoricalStore, InMemoryStore, JsonFileStore};
