use anyhow::{Context, Result};
use tracing::info;

use crate::config::{require_file, resolve_anomaly_input};
use crate::corr::align;
use crate::ctx::Ctx;
use crate::io::series_table;
use crate::pipeline::Stage;

/// Synthetic column name for the optional per-year mean over all
/// regions.
pub const MEAN_COLUMN: &str = "MEAN";

/// Loads the spatially aggregated SWA series and the persisted yield
/// anomaly series, then intersects them onto a shared year × region
/// grid.
pub struct Stage4CorrInput;

impl Stage4CorrInput {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4CorrInput {
    fn name(&self) -> &'static str {
        "stage4_corr_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let swa_path = ctx.cfg.swa_series_path();
        require_file(&swa_path)?;
        let ya_path = resolve_anomaly_input(&ctx.cfg, &ctx.region)?;

        let mut swa = series_table::read_wide_table(&swa_path)
            .with_context(|| format!("failed to read {}", swa_path.display()))?;
        let mut ya = series_table::read_wide_table(&ya_path)
            .with_context(|| format!("failed to read {}", ya_path.display()))?;

        if ctx.cfg.region_mean {
            swa.push_mean_column(MEAN_COLUMN);
            ya.push_mean_column(MEAN_COLUMN);
        }

        let aligned = align(&swa, &ya)?;
        info!(
            regions = aligned.regions.len(),
            years = aligned.years.len(),
            swa = %swa_path.display(),
            ya = %ya_path.display(),
            "correlation inputs aligned"
        );

        ctx.swa_series = Some(swa);
        ctx.ya_series = Some(ya);
        ctx.aligned = Some(aligned);
        Ok(())
    }
}
