use anyhow::{Context, Result};
use tracing::info;

use crate::coverage::area_coverage;
use crate::ctx::Ctx;
use crate::io::series_table;
use crate::pipeline::Stage;

/// Area-weighted exposure aggregation over the anomaly series.
pub struct Stage3Coverage;

impl Stage3Coverage {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Coverage {
    fn name(&self) -> &'static str {
        "stage3_coverage"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.write_coverage {
            return Ok(());
        }
        let anoms = ctx.anomalies.as_ref().context("anomaly series missing")?;
        let area = ctx.area.as_ref().context("area table missing")?;
        let info = ctx.registry.get(&ctx.region)?;

        let table = area_coverage(anoms, area, info, &ctx.cfg.coverage)?;
        let out_path = ctx.cfg.coverage_out_path(&ctx.region);
        series_table::write_coverage_table(&out_path, &table)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(
            region = %ctx.region,
            bands = table.thresholds.len(),
            path = %out_path.display(),
            "area coverage written"
        );

        if let Some(entry) = ctx
            .report
            .yield_regions
            .iter_mut()
            .find(|r| r.region == ctx.region)
        {
            entry.coverage_path = Some(out_path.display().to_string());
        }
        ctx.coverage = Some(table);
        Ok(())
    }
}
