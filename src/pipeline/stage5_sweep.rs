use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::corr::sweep::{CubeProvenance, threshold_sweep};
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::schema::v1::{CorrelationReport, MaxMccReport};

/// The threshold-sweep MCC computation, the dominant cost of a run.
pub struct Stage5Sweep;

impl Stage5Sweep {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Sweep {
    fn name(&self) -> &'static str {
        "stage5_sweep"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let aligned = ctx.aligned.as_ref().context("aligned series missing")?;
        let provenance = CubeProvenance {
            drought_threshold: ctx.cfg.drought_threshold,
            period_aggregation: ctx.cfg.period_aggregation(),
        };

        let progress = |done: usize, total: usize| {
            debug!(done, total, "threshold rows completed");
        };
        let cube = threshold_sweep(
            aligned,
            &ctx.cfg.th_swa,
            &ctx.cfg.th_ya,
            provenance,
            Some(&progress),
        );

        let max_cell = cube.max_cell();
        if let Some(cell) = &max_cell {
            info!(
                th_swa = cell.th_swa,
                th_ya = cell.th_ya,
                region = %cell.region,
                mcc = format!("{:.4}", cell.mcc),
                "maximum MCC cell"
            );
        }

        ctx.report.correlation = Some(CorrelationReport {
            th_swa: cube.th_swa.clone(),
            th_ya: cube.th_ya.clone(),
            regions: cube.regions.clone(),
            n_years: aligned.years.len() as u64,
            max_mcc: max_cell.map(|c| MaxMccReport {
                th_swa: c.th_swa,
                th_ya: c.th_ya,
                region: c.region,
                mcc: c.mcc,
            }),
            netcdf_path: None,
            table_path: None,
        });
        ctx.cube = Some(cube);
        Ok(())
    }
}
