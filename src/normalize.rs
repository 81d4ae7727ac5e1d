//! Column-wise rescaling of audio-feature columns.
//!
//! Each strategy is fitted on one column at a time and replaces that column
//! with its transform. NaN cells are ignored while fitting and stay NaN.

use clap::ValueEnum;

use crate::{table::TrackTable, types::AudioFeature};

/// Quantile grid size cap, as in the usual uniform quantile transform.
const MAX_QUANTILES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scaler {
    /// Zero mean, unit (population) variance
    Standard,
    /// Linear map onto [0, 1]
    MinMax,
    /// Division by the largest absolute value
    MaxAbs,
    /// Median removal and division by the interquartile range
    Robust,
    /// Map onto the uniform distribution through the empirical quantiles
    Quantile,
    /// Column-wise: division by the euclidean norm of the whole column, not per row
    UnitNorm,
}

impl Scaler {
    pub const ALL: [Scaler; 6] = [
        Scaler::Standard,
        Scaler::MinMax,
        Scaler::MaxAbs,
        Scaler::Robust,
        Scaler::Quantile,
        Scaler::UnitNorm,
    ];

    pub fn fit_transform(&self, column: &[f64]) -> Vec<f64> {
        let mut fitted: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
        if fitted.is_empty() {
            return column.to_vec();
        }
        fitted.sort_by(|a, b| a.total_cmp(b));

        match self {
            Scaler::Standard => {
                let n = fitted.len() as f64;
                let mean = fitted.iter().sum::<f64>() / n;
                let var = fitted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                affine(column, mean, non_zero(var.sqrt()))
            }
            Scaler::MinMax => {
                let min = fitted[0];
                let max = fitted[fitted.len() - 1];
                affine(column, min, non_zero(max - min))
            }
            Scaler::MaxAbs => {
                let max_abs = fitted.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
                affine(column, 0.0, non_zero(max_abs))
            }
            Scaler::Robust => {
                let median = percentile(&fitted, 0.5);
                let iqr = percentile(&fitted, 0.75) - percentile(&fitted, 0.25);
                affine(column, median, non_zero(iqr))
            }
            Scaler::Quantile => quantile_transform(column, &fitted),
            Scaler::UnitNorm => {
                let norm = fitted.iter().map(|v| v * v).sum::<f64>().sqrt();
                affine(column, 0.0, non_zero(norm))
            }
        }
    }
}

/// Rescales each of `columns` of `table` independently with `scaler`.
pub fn normalize(table: &mut TrackTable, scaler: Scaler, columns: &[AudioFeature]) {
    for feature in columns {
        let scaled = scaler.fit_transform(&table.column(*feature));
        table.set_column(*feature, &scaled);
    }
}

fn affine(column: &[f64], center: f64, scale: f64) -> Vec<f64> {
    column.iter().map(|v| (v - center) / scale).collect()
}

fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 || !scale.is_finite() { 1.0 } else { scale }
}

/// Linear-interpolated percentile of sorted data, `q` in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn quantile_transform(column: &[f64], sorted: &[f64]) -> Vec<f64> {
    let n_quantiles = sorted.len().min(MAX_QUANTILES);
    if n_quantiles < 2 {
        return column.iter().map(|v| if v.is_nan() { *v } else { 0.0 }).collect();
    }

    let references: Vec<f64> = (0..n_quantiles)
        .map(|i| i as f64 / (n_quantiles - 1) as f64)
        .collect();
    let quantiles: Vec<f64> = references.iter().map(|r| percentile(sorted, *r)).collect();
    let first = quantiles[0];
    let last = quantiles[n_quantiles - 1];

    column
        .iter()
        .map(|&x| {
            if x.is_nan() {
                return x;
            }
            if x <= first {
                return 0.0;
            }
            if x >= last {
                return 1.0;
            }

            // first grid point >= x; x > first so upper >= 1
            let upper = quantiles.partition_point(|q| *q < x);
            if quantiles[upper] == x {
                // ties: midpoint of the reference range covered by x
                let last_tie = quantiles.partition_point(|q| *q <= x) - 1;
                return (references[upper] + references[last_tie]) / 2.0;
            }

            let lower = upper - 1;
            let span = quantiles[upper] - quantiles[lower];
            let t = (x - quantiles[lower]) / span;
            references[lower] + t * (references[upper] - references[lower])
        })
        .collect()
}
