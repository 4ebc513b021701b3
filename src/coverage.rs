//! Area-weighted drought exposure.
//!
//! For each year, the share of total cultivated area whose yield
//! anomaly falls inside increasingly severe threshold bands.

use anyhow::{Result, bail};
use ndarray::Array2;
use tracing::warn;

use crate::config::CoverageParams;
use crate::regions::RegionInfo;
use crate::series::{AnomalySeries, SeriesTable};

/// Coverage percentages per (year, threshold band). The threshold value
/// is the band's lower bound; the upper bound is the grid maximum.
#[derive(Debug, Clone)]
pub struct CoverageTable {
    /// Lower bounds, first entry NEG_INFINITY when the unbounded band is
    /// requested.
    pub thresholds: Vec<f64>,
    pub years: Vec<i32>,
    /// years × thresholds, in 0..=100.
    pub percent: Array2<f64>,
}

/// Inclusive threshold grid: optional −∞ band plus a linspace over
/// [thresh_min, thresh_max].
pub fn coverage_grid(params: &CoverageParams) -> Vec<f64> {
    let n = ((params.thresh_max - params.thresh_min) / params.step)
        .abs()
        .round() as usize
        + 1;
    let mut grid = Vec::with_capacity(n + 1);
    if params.unbounded {
        grid.push(f64::NEG_INFINITY);
    }
    for i in 0..n {
        grid.push(params.thresh_min + i as f64 * params.step);
    }
    grid
}

/// Re-key the area table onto the anomaly identifier axis. Aggregated
/// identifiers absent from the area table are expanded onto their
/// sub-codes and the matching columns summed; identifiers with no area
/// column at all are dropped with a warning. The result can be
/// concatenated across regions before [`area_coverage_joined`].
pub fn join_area(anoms: &AnomalySeries, area: &SeriesTable, region: &RegionInfo) -> SeriesTable {
    let mut ids: Vec<String> = Vec::new();
    let mut joins: Vec<Vec<usize>> = Vec::new();
    for id in &anoms.ids {
        let area_cols: Vec<usize> = if let Some(col) = area.site_index(id) {
            vec![col]
        } else {
            region
                .expand_code(id)
                .into_iter()
                .filter_map(|sub| area.site_index(sub))
                .collect()
        };
        if area_cols.is_empty() {
            warn!(id = %id, "no area column for sub-region; skipped in coverage");
            continue;
        }
        ids.push(id.clone());
        joins.push(area_cols);
    }

    let n_years = anoms.n_years();
    let mut values = Array2::zeros((n_years, ids.len()));
    for row in 0..n_years {
        for (j, area_cols) in joins.iter().enumerate() {
            let mut sum = 0.0;
            for &c in area_cols {
                let a = area.values[(row, c)];
                if !a.is_nan() {
                    sum += a;
                }
            }
            values[(row, j)] = sum;
        }
    }

    // On the joined axis the name and code rows degenerate to the id.
    SeriesTable {
        names: ids.clone(),
        ids: ids.clone(),
        codes: ids,
        years: anoms.years.clone(),
        values,
    }
}

/// Aggregate exposure for one region: join, then band accumulation.
pub fn area_coverage(
    anoms: &AnomalySeries,
    area: &SeriesTable,
    region: &RegionInfo,
    params: &CoverageParams,
) -> Result<CoverageTable> {
    if anoms.years != area.years {
        bail!("anomaly series and area table cover different year axes");
    }
    let joined = join_area(anoms, area, region);
    area_coverage_joined(anoms, &joined, params)
}

/// Band accumulation over an area table already keyed by anomaly
/// identifier. The denominator each year is the total joined area,
/// including sub-regions whose anomaly is positive; only non-positive
/// anomalies contribute to the numerator.
pub fn area_coverage_joined(
    anoms: &AnomalySeries,
    joined: &SeriesTable,
    params: &CoverageParams,
) -> Result<CoverageTable> {
    if anoms.years != joined.years {
        bail!("anomaly series and joined area table cover different year axes");
    }
    let thresholds = coverage_grid(params);

    let mut anom_cols = Vec::with_capacity(joined.n_sites());
    for id in &joined.ids {
        match anoms.site_index(id) {
            Some(col) => anom_cols.push(col),
            None => bail!("joined area column {} has no anomaly column", id),
        }
    }

    let n_years = anoms.n_years();
    let mut percent = Array2::zeros((n_years, thresholds.len()));

    for row in 0..n_years {
        let mut total_area = 0.0;
        let mut qualifying: Vec<(f64, f64)> = Vec::new(); // (anomaly, area)
        for (j, &anom_col) in anom_cols.iter().enumerate() {
            let site_area = joined.values[(row, j)];
            total_area += site_area;
            let anom = anoms.values[(row, anom_col)];
            if !anom.is_nan() && anom <= 0.0 {
                qualifying.push((anom, site_area));
            }
        }

        // No qualifying sub-region or no area: every band covers 0.
        if qualifying.is_empty() || total_area <= 0.0 {
            continue;
        }

        for (t_idx, &lower) in thresholds.iter().enumerate() {
            let covered: f64 = qualifying
                .iter()
                .filter(|(anom, _)| *anom >= lower && *anom <= params.thresh_max)
                .map(|(_, a)| a)
                .sum();
            percent[(row, t_idx)] = covered / total_area * 100.0;
        }
    }

    Ok(CoverageTable {
        thresholds,
        years: anoms.years.clone(),
        percent,
    })
}
