//! Threshold-sweep MCC correlation.
//!
//! For every (SWA threshold, YA threshold) pair and every region, the
//! MCC between the two binarized event sequences over the study period.
//! Cells are independent and write-once, so the outer threshold axis is
//! parallelized.

use ndarray::{Array2, Array3};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::corr::AlignedSeries;
use crate::corr::mcc::mcc;

/// Upstream parameters recorded with the cube for provenance; they do
/// not enter the computation.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeProvenance {
    /// Drought-detection threshold used to build the SWA series.
    pub drought_threshold: f64,
    /// Seasonal aggregation window label, e.g. `6_months-APR_SEP`.
    pub period_aggregation: String,
}

/// 3-D MCC result: TH_SWA × TH_YA × region.
#[derive(Debug, Clone)]
pub struct CorrelationCube {
    pub th_swa: Vec<f64>,
    pub th_ya: Vec<f64>,
    pub regions: Vec<String>,
    pub mcc: Array3<f64>,
    pub provenance: CubeProvenance,
}

/// Argmax cell of a cube, NaN cells skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxCell {
    pub th_swa: f64,
    pub th_ya: f64,
    pub region: String,
    pub mcc: f64,
}

impl CorrelationCube {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.th_swa.len(), self.th_ya.len(), self.regions.len())
    }

    pub fn max_cell(&self) -> Option<MaxCell> {
        let mut best: Option<((usize, usize, usize), f64)> = None;
        for ((i, j, k), &v) in self.mcc.indexed_iter() {
            if v.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, b)| v > b) {
                best = Some(((i, j, k), v));
            }
        }
        best.map(|((i, j, k), v)| MaxCell {
            th_swa: self.th_swa[i],
            th_ya: self.th_ya[j],
            region: self.regions[k].clone(),
            mcc: v,
        })
    }
}

/// Called after each completed (swa-threshold, ya-threshold) row with
/// (done, total) row counts. Observability only.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Binarization is fixed per axis: SWA event = value >= threshold (dry
/// beyond a level), YA event = value <= threshold (yield below a
/// negative severity level). NaN compares false on both axes, so a
/// missing year is a non-event.
pub fn threshold_sweep(
    aligned: &AlignedSeries,
    th_swa: &[f64],
    th_ya: &[f64],
    provenance: CubeProvenance,
    progress: Option<ProgressFn<'_>>,
) -> CorrelationCube {
    let n_regions = aligned.regions.len();
    let total_rows = th_swa.len() * th_ya.len();
    let done_rows = AtomicUsize::new(0);

    // YA binarization does not depend on the outer threshold; compute
    // each row's mask once.
    let ya_masks: Vec<Array2<bool>> = th_ya
        .iter()
        .map(|&t| aligned.ya.mapv(|v| v <= t))
        .collect();

    let slabs: Vec<Array2<f64>> = th_swa
        .par_iter()
        .map(|&t_swa| {
            let swa_mask = aligned.swa.mapv(|v| v >= t_swa);
            let mut slab = Array2::zeros((th_ya.len(), n_regions));
            for (j, ya_mask) in ya_masks.iter().enumerate() {
                for k in 0..n_regions {
                    slab[(j, k)] = mcc(
                        swa_mask.column(k).iter().copied(),
                        ya_mask.column(k).iter().copied(),
                    );
                }
                if let Some(report) = progress {
                    let done = done_rows.fetch_add(1, Ordering::Relaxed) + 1;
                    report(done, total_rows);
                }
            }
            slab
        })
        .collect();

    let mut cube = Array3::zeros((th_swa.len(), th_ya.len(), n_regions));
    for (i, slab) in slabs.into_iter().enumerate() {
        cube.index_axis_mut(ndarray::Axis(0), i).assign(&slab);
    }

    CorrelationCube {
        th_swa: th_swa.to_vec(),
        th_ya: th_ya.to_vec(),
        regions: aligned.regions.clone(),
        mcc: cube,
        provenance,
    }
}
