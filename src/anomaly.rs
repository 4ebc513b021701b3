//! Yield anomaly derivation.
//!
//! Per sub-region: raw yield = production / area, a slow-varying trend
//! is removed (mirror-pad, gap-fill, local polynomial smooth, middle
//! slice) and the residual is standardized. Sub-regions with too many
//! missing years are excluded entirely.

use anyhow::{Context, Result};
use ndarray::Array2;
use tracing::info;

use crate::math::interp::fill_gaps_linear;
use crate::math::savgol::{SavitzkyGolay, Smoother};
use crate::math::stats;
use crate::series::{AnomalySeries, SeriesTable};

/// Gap fraction at or above which a sub-region is excluded. A
/// data-quality gate, not an error.
pub const MAX_GAP_FRACTION: f64 = 0.35;

pub const TREND_WINDOW: usize = 7;
pub const TREND_DEGREE: usize = 2;

pub struct AnomalyBuilder {
    smoother: Box<dyn Smoother>,
    window: usize,
    degree: usize,
}

impl Default for AnomalyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Built anomaly series plus the identifiers the quality gate excluded.
#[derive(Debug)]
pub struct AnomalyOutcome {
    pub series: AnomalySeries,
    pub excluded: Vec<String>,
}

impl AnomalyBuilder {
    pub fn new() -> Self {
        Self {
            smoother: Box::new(SavitzkyGolay),
            window: TREND_WINDOW,
            degree: TREND_DEGREE,
        }
    }

    pub fn with_smoother(smoother: Box<dyn Smoother>, window: usize, degree: usize) -> Self {
        Self {
            smoother,
            window,
            degree,
        }
    }

    /// Derive the standardized anomaly series for every sub-region of an
    /// aligned (production, area) table pair. Columns of the output are
    /// sorted by identifier.
    pub fn build(&self, prod: &SeriesTable, area: &SeriesTable) -> Result<AnomalyOutcome> {
        prod.check_aligned(area)
            .context("production/area tables misaligned")?;

        let n_years = prod.n_years();
        let n_sites = prod.n_sites();
        let mut excluded = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_sites);

        for site in 0..n_sites {
            let prod_col = prod.column(site).to_vec();
            let area_col = area.column(site).to_vec();
            let yields = raw_yield(&prod_col, &area_col);
            match self.anomaly_column(&yields)? {
                Some(anoms) => columns.push(anoms),
                None => {
                    let gap = stats::nan_count(&yields) as f64 / n_years as f64;
                    info!(
                        id = %prod.ids[site],
                        gap_fraction = format!("{:.2}", gap),
                        "sub-region excluded by data-quality gate"
                    );
                    excluded.push(prod.ids[site].clone());
                    columns.push(vec![f64::NAN; n_years]);
                }
            }
        }

        // Stable output order: columns sorted by sub-region identifier.
        let mut order: Vec<usize> = (0..n_sites).collect();
        order.sort_by(|&a, &b| prod.ids[a].cmp(&prod.ids[b]));

        let mut values = Array2::from_elem((n_years, n_sites), f64::NAN);
        let mut ids = Vec::with_capacity(n_sites);
        for (out_j, &src_j) in order.iter().enumerate() {
            ids.push(prod.ids[src_j].clone());
            for (i, &v) in columns[src_j].iter().enumerate() {
                values[(i, out_j)] = v;
            }
        }

        Ok(AnomalyOutcome {
            series: AnomalySeries {
                years: prod.years.clone(),
                ids,
                values,
            },
            excluded,
        })
    }

    /// One sub-region. `None` means the quality gate excluded it.
    fn anomaly_column(&self, yields: &[f64]) -> Result<Option<Vec<f64>>> {
        let n = yields.len();
        if n == 0 {
            return Ok(Some(Vec::new()));
        }
        let gap_fraction = stats::nan_count(yields) as f64 / n as f64;
        if gap_fraction >= MAX_GAP_FRACTION {
            return Ok(None);
        }

        // Mirror-pad (reverse + original + reverse) so the smoothing
        // window sees no hard edges, then fill the gaps of the padded
        // sequence.
        let mut padded = Vec::with_capacity(3 * n);
        padded.extend(yields.iter().rev());
        padded.extend(yields.iter());
        padded.extend(yields.iter().rev());
        fill_gaps_linear(&mut padded);

        let smoothed = self.smoother.smooth(&padded, self.window, self.degree)?;
        let trend = &smoothed[n..2 * n];

        // Residual carries the original missingness mask.
        let mut residual: Vec<f64> = yields
            .iter()
            .zip(trend)
            .map(|(&y, &t)| if y.is_nan() { f64::NAN } else { y - t })
            .collect();
        stats::standardize(&mut residual);
        Ok(Some(residual))
    }
}

/// Raw yield per year: production / area, NaN where area is zero or
/// missing or production is missing.
pub fn raw_yield(prod: &[f64], area: &[f64]) -> Vec<f64> {
    prod.iter()
        .zip(area)
        .map(|(&p, &a)| {
            if a == 0.0 || a.is_nan() || p.is_nan() {
                f64::NAN
            } else {
                p / a
            }
        })
        .collect()
}
