//! Individual-X / moving-range control chart over the most recent samples.
//!
//! # Algorithm
//!
//! 1. Walk the series newest to oldest and collect the tracked value of each
//!    sample where it is present and strictly positive, up to
//!    [`WINDOW_SIZE`] values.
//! 2. Fewer than two values: no statistics.
//! 3. `mean` of the collected values; moving ranges `|x[i] - x[i+1]|` between
//!    neighbours in collection order; `MR-bar` their mean, or 0 when there
//!    is only a single range (two values).
//! 4. `control factor = 3 * MR-bar / d2`, with `d2 = 1.128` for subgroups of two.
//! 5. `UCL = mean + factor`, `LCL = max(0, mean - factor)`.
//!
//! Reported numbers are rounded to [`DISPLAY_DECIMALS`] places; the in/out of
//! control classification uses the unrounded limits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sample::{CepSample, SampleId};

/// Number of most-recent valid values used for the limits.
pub const WINDOW_SIZE: usize = 8;

/// d2 bias-correction constant for moving ranges of two observations.
pub const D2: f64 = 1.128;

/// Width of the control band in estimated standard deviations.
pub const SIGMA_MULTIPLIER: f64 = 3.0;

/// Decimal places of reported statistics.
pub const DISPLAY_DECIMALS: i32 = 4;

/// Control-chart statistics for one tracked quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CepStatistics {
    pub quantity: String,
    pub mean: f64,
    pub mobile_range_mean: f64,
    pub control_factor: f64,
    pub lower_control_limit: f64,
    pub upper_control_limit: f64,
    /// Values used in the calculation (2..=WINDOW_SIZE).
    pub sample_count: usize,
}

/// Full-precision limits, kept apart from the rounded report.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Limits {
    mean: f64,
    mobile_range_mean: f64,
    control_factor: f64,
    lower: f64,
    upper: f64,
    count: usize,
}

impl Limits {
    fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    fn report(&self, quantity: &str) -> CepStatistics {
        CepStatistics {
            quantity: quantity.to_string(),
            mean: round_display(self.mean),
            mobile_range_mean: round_display(self.mobile_range_mean),
            control_factor: round_display(self.control_factor),
            lower_control_limit: round_display(self.lower),
            upper_control_limit: round_display(self.upper),
            sample_count: self.count,
        }
    }
}

/// Round to [`DISPLAY_DECIMALS`] places.
pub fn round_display(value: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    (value * scale).round() / scale
}

/// Indices (into `samples`) and values of the window used for the limits.
///
/// `samples` must be ordered newest first.
pub fn collect_window(samples: &[CepSample], quantity: &str) -> Vec<(usize, f64)> {
    samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.value_of(quantity).filter(|v| *v > 0.0).map(|v| (i, v)))
        .take(WINDOW_SIZE)
        .collect()
}

fn limits_of(values: &[f64]) -> Option<Limits> {
    if values.len() < 2 {
        return None;
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let ranges: Vec<f64> = values.windows(2).map(|w| (w[0] - w[1]).abs()).collect();
    let mobile_range_mean = if ranges.len() > 1 {
        ranges.iter().sum::<f64>() / ranges.len() as f64
    } else {
        0.0
    };

    let control_factor = SIGMA_MULTIPLIER * (mobile_range_mean / D2);
    Some(Limits {
        mean,
        mobile_range_mean,
        control_factor,
        lower: (mean - control_factor).max(0.0),
        upper: mean + control_factor,
        count,
    })
}

fn limits_for(samples: &[CepSample], quantity: &str) -> (Vec<(usize, f64)>, Option<Limits>) {
    let window = collect_window(samples, quantity);
    let values: Vec<f64> = window.iter().map(|(_, v)| *v).collect();
    let limits = limits_of(&values);
    (window, limits)
}

/// Statistics for `quantity` over `samples` (newest first), or `None` when
/// fewer than two valid values exist.
pub fn compute_statistics(samples: &[CepSample], quantity: &str) -> Option<CepStatistics> {
    let (window, limits) = limits_for(samples, quantity);
    let Some(limits) = limits else {
        debug!(quantity, valid = window.len(), "Insufficient history for CEP statistics");
        return None;
    };
    let stats = limits.report(quantity);
    debug!(
        quantity,
        mean = stats.mean,
        lcl = stats.lower_control_limit,
        ucl = stats.upper_control_limit,
        n = stats.sample_count,
        "Computed CEP statistics"
    );
    Some(stats)
}

/// Newest collection date first; bulletin number breaks ties (descending).
pub fn sort_newest_first(samples: &mut [CepSample]) {
    samples.sort_by(|a, b| {
        b.collection_date
            .cmp(&a.collection_date)
            .then_with(|| b.bulletin_number.cmp(&a.bulletin_number))
    });
}

// ── Chart ───────────────────────────────────────────────────────────────

/// One sample on the chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub sample_id: SampleId,
    pub bulletin_number: String,
    pub collection_date: NaiveDate,
    /// `None` when the sample does not carry the quantity.
    pub value: Option<f64>,
    /// `None` when there is no value or no statistics.
    pub in_control: Option<bool>,
    /// Among the most recent valid values used for the limits.
    pub used_in_calculation: bool,
}

/// Statistics plus per-sample classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CepChart {
    pub quantity: String,
    pub statistics: Option<CepStatistics>,
    pub points: Vec<ChartPoint>,
}

impl CepChart {
    /// Build the chart for `samples` ordered newest first.
    pub fn build(samples: &[CepSample], quantity: &str) -> Self {
        let (window, limits) = limits_for(samples, quantity);
        let points = samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let value = s.value_of(quantity);
                ChartPoint {
                    sample_id: s.id,
                    bulletin_number: s.bulletin_number.clone(),
                    collection_date: s.collection_date,
                    value,
                    in_control: value.zip(limits).map(|(v, l)| l.contains(v)),
                    used_in_calculation: limits.is_some()
                        && window.iter().any(|(idx, _)| *idx == i),
                }
            })
            .collect();
        Self {
            quantity: quantity.to_string(),
            statistics: limits.map(|l| l.report(quantity)),
            points,
        }
    }

    pub fn out_of_control(&self) -> impl Iterator<Item = &ChartPoint> {
        self.points.iter().filter(|p| p.in_control == Some(false))
    }
}
