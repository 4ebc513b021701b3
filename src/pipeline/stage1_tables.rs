use anyhow::{Context, Result};
use tracing::info;

use crate::config::require_file;
use crate::ctx::Ctx;
use crate::io::series_table;
use crate::pipeline::Stage;

/// Loads the standardized production and area tables for the region
/// under analysis and restricts them to the configured year range.
pub struct Stage1Tables;

impl Stage1Tables {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Tables {
    fn name(&self) -> &'static str {
        "stage1_tables"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        // Unknown regions abort this region only; the caller isolates
        // the failure from sibling regions.
        ctx.registry.get(&ctx.region)?;

        let prod_path = ctx.cfg.prod_table_path(&ctx.region);
        let area_path = ctx.cfg.area_table_path(&ctx.region);
        require_file(&prod_path)?;
        require_file(&area_path)?;

        let prod = series_table::read_series_table(&prod_path)
            .with_context(|| format!("failed to read {}", prod_path.display()))?
            .select_years(ctx.cfg.year_start, ctx.cfg.year_end);
        let area = series_table::read_series_table(&area_path)
            .with_context(|| format!("failed to read {}", area_path.display()))?
            .select_years(ctx.cfg.year_start, ctx.cfg.year_end);
        prod.check_aligned(&area)
            .context("production/area tables misaligned")?;

        info!(
            region = %ctx.region,
            subregions = prod.n_sites(),
            years = prod.n_years(),
            "standardized tables loaded"
        );
        ctx.prod = Some(prod);
        ctx.area = Some(area);
        Ok(())
    }
}
