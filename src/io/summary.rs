use anyhow::Result;

use crate::ctx::Ctx;

pub fn format_yield_summary(ctx: &Ctx) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let mut out = String::new();
    out.push_str(&format!("yieldcorr v{}\n", version));
    for entry in &ctx.report.yield_regions {
        out.push_str(&format!(
            "{}: {} sub-regions, {} excluded\n",
            entry.region,
            entry.n_subregions,
            entry.excluded.len()
        ));
    }
    for failed in &ctx.report.failed_regions {
        out.push_str(&format!("{}: FAILED ({})\n", failed.region, failed.error));
    }
    out
}

pub fn format_corr_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let corr = ctx
        .report
        .correlation
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("correlation report missing"))?;

    let mut out = String::new();
    out.push_str(&format!("yieldcorr v{}\n", version));
    out.push_str(&format!(
        "Cube: {} SWA thresholds x {} YA thresholds x {} regions over {} years\n",
        corr.th_swa.len(),
        corr.th_ya.len(),
        corr.regions.len(),
        corr.n_years
    ));
    match &corr.max_mcc {
        Some(cell) => out.push_str(&format!(
            "Max MCC: {:.4} at TH_SWA={} TH_YA={} ({})\n",
            cell.mcc, cell.th_swa, cell.th_ya, cell.region
        )),
        None => out.push_str("Max MCC: undefined (all cells NaN)\n"),
    }
    if let Some(path) = &corr.netcdf_path {
        out.push_str(&format!("NetCDF: {}\n", path));
    }
    if let Some(path) = &corr.table_path {
        out.push_str(&format!("Table: {}\n", path));
    }
    Ok(out)
}
