//! NaN-aware statistical primitives.
//!
//! Missing samples are encoded as NaN and skipped; a statistic over
//! fewer than the required number of defined samples is NaN.

pub fn nan_count(values: &[f64]) -> usize {
    values.iter().filter(|v| v.is_nan()).count()
}

pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &v in values {
        if !v.is_nan() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Population standard deviation over defined samples (ddof = 0).
pub fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let mut sum_sq = 0.0;
    let mut n = 0usize;
    for &v in values {
        if !v.is_nan() {
            let d = v - mean;
            sum_sq += d * d;
            n += 1;
        }
    }
    if n < 2 {
        return f64::NAN;
    }
    (sum_sq / n as f64).sqrt()
}

/// Standardize in place: (x - mean) / std over defined samples. A zero
/// or undefined spread leaves every defined sample NaN (degenerate
/// statistic, not an error).
pub fn standardize(values: &mut [f64]) {
    let mean = nan_mean(values);
    let std = nan_std(values);
    let degenerate = std.is_nan() || std == 0.0;
    for v in values.iter_mut() {
        if v.is_nan() {
            continue;
        }
        *v = if degenerate { f64::NAN } else { (*v - mean) / std };
    }
}
