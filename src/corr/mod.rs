pub mod mcc;
pub mod sweep;

use anyhow::{Result, bail};
use ndarray::Array2;

use crate::series::WideTable;

/// SWA and yield-anomaly series on a shared year × region grid.
#[derive(Debug, Clone)]
pub struct AlignedSeries {
    pub years: Vec<i32>,
    pub regions: Vec<String>,
    pub swa: Array2<f64>,
    pub ya: Array2<f64>,
}

/// Intersect the region and year axes of the two input tables. Regions
/// come out sorted; years ascending. Values missing from either series
/// stay NaN and binarize to non-event downstream.
pub fn align(swa: &WideTable, ya: &WideTable) -> Result<AlignedSeries> {
    let mut regions: Vec<String> = swa
        .columns
        .iter()
        .filter(|c| ya.column_index(c).is_some())
        .cloned()
        .collect();
    regions.sort();
    if regions.is_empty() {
        bail!("SWA and yield-anomaly series share no region");
    }

    let mut years: Vec<i32> = swa
        .years
        .iter()
        .copied()
        .filter(|y| ya.years.contains(y))
        .collect();
    years.sort_unstable();
    if years.is_empty() {
        bail!("SWA and yield-anomaly series share no year");
    }

    let mut swa_values = Array2::from_elem((years.len(), regions.len()), f64::NAN);
    let mut ya_values = Array2::from_elem((years.len(), regions.len()), f64::NAN);
    for (k, region) in regions.iter().enumerate() {
        let swa_col = swa.column_index(region).expect("region from intersection");
        let ya_col = ya.column_index(region).expect("region from intersection");
        for (i, year) in years.iter().enumerate() {
            if let Some(row) = swa.years.iter().position(|y| y == year) {
                swa_values[(i, k)] = swa.values[(row, swa_col)];
            }
            if let Some(row) = ya.years.iter().position(|y| y == year) {
                ya_values[(i, k)] = ya.values[(row, ya_col)];
            }
        }
    }

    Ok(AlignedSeries {
        years,
        regions,
        swa: swa_values,
        ya: ya_values,
    })
}
