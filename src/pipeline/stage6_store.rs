use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::{cube_store, cube_table};
use crate::pipeline::Stage;

/// Persists the correlation cube in the requested store formats.
pub struct Stage6Store;

impl Stage6Store {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Store {
    fn name(&self) -> &'static str {
        "stage6_store"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let cube = ctx.cube.as_ref().context("correlation cube missing")?;
        let report = ctx
            .report
            .correlation
            .as_mut()
            .context("correlation report missing")?;

        if ctx.store_format.netcdf() {
            let path = ctx.cfg.cube_h5_path();
            match cube_store::write_cube(&path, cube) {
                Ok(()) => {
                    info!(path = %path.display(), "cube written (netcdf)");
                    report.netcdf_path = Some(path.display().to_string());
                }
                // A missing HDF5 backend degrades to the tabular store
                // when one is also requested.
                Err(err) if ctx.store_format.table() => {
                    warn!(error = %err, "netcdf store unavailable; keeping tabular store only");
                    ctx.warnings.push(format!("netcdf store skipped: {}", err));
                }
                Err(err) => return Err(err),
            }
        }

        if ctx.store_format.table() {
            let path = ctx.cfg.cube_table_path();
            let cfg = &ctx.cfg;
            cube_table::write_cube_tables(cube, &path, |region| {
                cfg.cube_region_table_path(region)
            })?;
            info!(path = %path.display(), "cube written (tabular)");
            report.table_path = Some(path.display().to_string());
        }

        Ok(())
    }
}
