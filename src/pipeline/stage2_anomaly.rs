use anyhow::{Context, Result};
use tracing::info;

use crate::anomaly::AnomalyBuilder;
use crate::ctx::Ctx;
use crate::io::series_table;
use crate::pipeline::Stage;
use crate::schema::v1::YieldRegionReport;

/// Derives the normalized yield anomaly series and persists it to the
/// data store for reuse by the correlation stage.
pub struct Stage2Anomaly;

impl Stage2Anomaly {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Anomaly {
    fn name(&self) -> &'static str {
        "stage2_anomaly"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let prod = ctx.prod.as_ref().context("production table missing")?;
        let area = ctx.area.as_ref().context("area table missing")?;

        let outcome = AnomalyBuilder::new().build(prod, area)?;
        for id in &outcome.excluded {
            ctx.warnings.push(format!(
                "{}: sub-region {} excluded (gap fraction >= 0.35)",
                ctx.region, id
            ));
        }

        let out_path = ctx.cfg.anomaly_out_path(&ctx.region);
        series_table::write_anomaly_series(&out_path, &outcome.series)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(
            region = %ctx.region,
            excluded = outcome.excluded.len(),
            path = %out_path.display(),
            "anomaly series written"
        );

        let display_name = ctx
            .registry
            .get(&ctx.region)
            .map(|info| info.display_name.to_string())
            .unwrap_or_else(|_| ctx.region.clone());
        ctx.report.yield_regions.push(YieldRegionReport {
            region: ctx.region.clone(),
            display_name,
            n_subregions: outcome.series.ids.len() as u64,
            excluded: outcome.excluded.clone(),
            anomaly_path: Some(out_path.display().to_string()),
            coverage_path: None,
        });
        ctx.excluded = outcome.excluded;
        ctx.anomalies = Some(outcome.series);
        Ok(())
    }
}
