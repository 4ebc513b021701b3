use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use yieldcorr::cli::{Cli, Commands, CorrArgs, SaveDataArg, YieldArgs};
use yieldcorr::coverage::{area_coverage_joined, join_area};
use yieldcorr::ctx::{Ctx, StoreFormat};
use yieldcorr::io;
use yieldcorr::io::series_table;
use yieldcorr::pipeline::Pipeline;
use yieldcorr::pipeline::stage0_scaffold::Stage0Scaffold;
use yieldcorr::pipeline::stage1_tables::Stage1Tables;
use yieldcorr::pipeline::stage2_anomaly::Stage2Anomaly;
use yieldcorr::pipeline::stage3_coverage::Stage3Coverage;
use yieldcorr::pipeline::stage4_corr_input::Stage4CorrInput;
use yieldcorr::pipeline::stage5_sweep::Stage5Sweep;
use yieldcorr::pipeline::stage6_store::Stage6Store;
use yieldcorr::regions::RegionRegistry;
use yieldcorr::schema::v1::FailedRegion;
use yieldcorr::series::{AnomalySeries, SeriesTable};

/// Synthetic region key used for the union coverage table.
const COMBINED_KEY: &str = "combined";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Yield(args) => run_yield(args),
        Commands::Corr(args) => run_corr(args),
    }
}

fn run_yield(args: YieldArgs) -> Result<()> {
    let cfg = args.to_config()?;
    let registry = RegionRegistry::builtin();
    let regions = registry.resolve_selection(&args.regions)?;
    let write_coverage = args.coverage || args.run;

    // Aggregates per-region results; regions fail independently.
    let mut master = Ctx::new(cfg.clone(), "", env!("CARGO_PKG_VERSION"));
    let mut combine_inputs: Vec<(String, AnomalySeries, SeriesTable)> = Vec::new();

    for region in &regions {
        let mut ctx = Ctx::new(cfg.clone(), region, env!("CARGO_PKG_VERSION"));
        ctx.write_coverage = write_coverage;
        let pipeline = Pipeline::new(vec![
            Box::new(Stage0Scaffold::new()),
            Box::new(Stage1Tables::new()),
            Box::new(Stage2Anomaly::new()),
            Box::new(Stage3Coverage::new()),
        ]);
        match pipeline.run(&mut ctx) {
            Ok(()) => {
                master.report.yield_regions.extend(ctx.report.yield_regions);
                master.warnings.extend(ctx.warnings);
                if args.combine {
                    if let (Some(anoms), Some(area)) = (ctx.anomalies, ctx.area) {
                        combine_inputs.push((region.clone(), anoms, area));
                    }
                }
            }
            Err(err) => {
                tracing::warn!(region = %region, error = %err, "region failed; continuing");
                master.report.failed_regions.push(FailedRegion {
                    region: region.clone(),
                    error: format!("{:#}", err),
                });
            }
        }
    }

    if master.report.yield_regions.is_empty() {
        anyhow::bail!("all {} selected regions failed", regions.len());
    }

    if args.combine {
        match write_combined_coverage(&master, &registry, &combine_inputs) {
            Ok(Some(path)) => {
                tracing::info!(path = %path, "combined area coverage written");
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "combined coverage failed");
                master.warnings.push(format!("combined coverage skipped: {:#}", err));
            }
        }
    }

    master.report.warnings = master.warnings.clone();
    if args.json || args.run {
        let path = master.cfg.report_path();
        io::write_json(&path, &master.report)?;
        tracing::info!(path = %path.display(), "run report written");
    }

    let summary = io::summary::format_yield_summary(&master);
    print!("{}", summary);
    print_warnings(&master.warnings);
    Ok(())
}

/// Union coverage over every successfully processed region: each
/// region's area table is joined onto its anomaly axis first, so the
/// concatenated tables share an identifier scheme.
fn write_combined_coverage(
    master: &Ctx,
    registry: &RegionRegistry,
    inputs: &[(String, AnomalySeries, SeriesTable)],
) -> Result<Option<String>> {
    if inputs.len() < 2 {
        return Ok(None);
    }
    let mut anoms_list = Vec::with_capacity(inputs.len());
    let mut joined_list = Vec::with_capacity(inputs.len());
    for (region, anoms, area) in inputs {
        let info = registry.get(region)?;
        joined_list.push(join_area(anoms, area, info));
        anoms_list.push(anoms.clone());
    }
    let combined_anoms = AnomalySeries::concat(&anoms_list)?;
    let combined_area = SeriesTable::concat_columns(&joined_list)?;

    let table = area_coverage_joined(&combined_anoms, &combined_area, &master.cfg.coverage)?;
    let path = master.cfg.coverage_out_path(COMBINED_KEY);
    series_table::write_coverage_table(&path, &table)?;
    Ok(Some(path.display().to_string()))
}

fn run_corr(args: CorrArgs) -> Result<()> {
    let cfg = args.to_config()?;
    let mut ctx = Ctx::new(cfg, &args.region, env!("CARGO_PKG_VERSION"));
    ctx.store_format = match args.save_data {
        SaveDataArg::Netcdf => StoreFormat::Netcdf,
        SaveDataArg::Table => StoreFormat::Table,
        SaveDataArg::Both => StoreFormat::Both,
        SaveDataArg::None => StoreFormat::None,
    };

    let pipeline = Pipeline::new(vec![
        Box::new(Stage0Scaffold::new()),
        Box::new(Stage4CorrInput::new()),
        Box::new(Stage5Sweep::new()),
        Box::new(Stage6Store::new()),
    ]);
    pipeline.run(&mut ctx)?;

    ctx.report.warnings = ctx.warnings.clone();
    if args.json || args.run {
        let path = ctx.cfg.report_path();
        io::write_json(&path, &ctx.report)?;
        tracing::info!(path = %path.display(), "run report written");
    }

    let summary = io::summary::format_corr_summary(&ctx)?;
    print!("{}", summary);
    print_warnings(&ctx.warnings);
    Ok(())
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
}
