//! Local polynomial (Savitzky-Golay) smoothing.

use anyhow::{Result, bail};

/// Replaceable smoothing strategy used for trend extraction.
pub trait Smoother {
    /// Smooth a fully-defined series with a centered window of the given
    /// length and polynomial degree.
    fn smooth(&self, series: &[f64], window: usize, degree: usize) -> Result<Vec<f64>>;
}

/// Savitzky-Golay filter: least-squares polynomial fit over a sliding
/// window, evaluated at the window center. The first and last
/// half-window positions are filled from polynomials fitted to the
/// boundary windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SavitzkyGolay;

impl Smoother for SavitzkyGolay {
    fn smooth(&self, series: &[f64], window: usize, degree: usize) -> Result<Vec<f64>> {
        if window % 2 == 0 || window < 3 {
            bail!("window length must be odd and >= 3, got {}", window);
        }
        if degree + 1 >= window {
            bail!("degree ({}) must be smaller than window - 1", degree);
        }
        if series.len() < window {
            bail!(
                "series length ({}) shorter than window ({})",
                series.len(),
                window
            );
        }
        if series.iter().any(|v| v.is_nan()) {
            bail!("smoothing input must be gap-filled first");
        }

        let n = series.len();
        let half = window / 2;
        let weights = central_weights(window, degree)?;
        let mut out = vec![0.0; n];

        for i in half..n - half {
            let mut acc = 0.0;
            for (k, w) in weights.iter().enumerate() {
                acc += w * series[i - half + k];
            }
            out[i] = acc;
        }

        // Boundary fill: evaluate the polynomial fitted to the first and
        // last full windows at the uncovered positions.
        let xs: Vec<f64> = (0..window).map(|k| k as f64).collect();
        let head = polyfit(&xs, &series[..window], degree)?;
        for i in 0..half {
            out[i] = polyval(&head, i as f64);
        }
        let tail = polyfit(&xs, &series[n - window..], degree)?;
        for i in n - half..n {
            out[i] = polyval(&tail, (i - (n - window)) as f64);
        }

        Ok(out)
    }
}

/// Convolution weights for the window center. Exposed for tests; the
/// degree-2, window-7 case must match the classical (-2,3,6,7,6,3,-2)/21.
pub fn central_weights(window: usize, degree: usize) -> Result<Vec<f64>> {
    let half = window / 2;
    let xs: Vec<f64> = (0..window).map(|k| k as f64 - half as f64).collect();
    let mut weights = vec![0.0; window];
    let mut unit = vec![0.0; window];
    for j in 0..window {
        unit[j] = 1.0;
        let coeffs = polyfit(&xs, &unit, degree)?;
        weights[j] = polyval(&coeffs, 0.0);
        unit[j] = 0.0;
    }
    Ok(weights)
}

/// Least-squares polynomial fit, coefficients in ascending degree order.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>> {
    if xs.len() != ys.len() || xs.len() <= degree {
        bail!("polyfit needs more samples than the polynomial degree");
    }
    let m = degree + 1;

    // Normal equations: (A^T A) c = A^T y with A[i][j] = x_i^j.
    let mut ata = vec![vec![0.0; m]; m];
    let mut aty = vec![0.0; m];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut pow = vec![1.0; 2 * m - 1];
        for p in 1..2 * m - 1 {
            pow[p] = pow[p - 1] * x;
        }
        for r in 0..m {
            for c in 0..m {
                ata[r][c] += pow[r + c];
            }
            aty[r] += pow[r] * y;
        }
    }
    solve_dense(&mut ata, &mut aty)
}

pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    let mut acc = 0.0;
    for &c in coeffs.iter().rev() {
        acc = acc * x + c;
    }
    acc
}

/// Gaussian elimination with partial pivoting; the systems here are
/// (degree+1)-square.
fn solve_dense(a: &mut [Vec<f64>], b: &mut [f64]) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            bail!("singular system in polynomial fit");
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for c in col..n {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for c in row + 1..n {
            acc -= a[row][c] * x[c];
        }
        x[row] = acc / a[row][row];
    }
    Ok(x)
}
