use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use anyhow::Result;

use crate::config::{
    AnalysisConfig, CoverageParams, DEFAULT_DROUGHT_THRESHOLD, DEFAULT_MONTH_END,
    DEFAULT_MONTH_START, DEFAULT_TH_SWA, DEFAULT_TH_YA, DEFAULT_YEAR_END, DEFAULT_YEAR_START,
    ThresholdSpec,
};

#[derive(Debug, Parser)]
#[command(name = "yieldcorr", version, about = "SWA x cereal yield anomaly analysis CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Yield anomaly derivation and area-coverage aggregation
    Yield(YieldArgs),
    /// Threshold-sweep MCC correlation between SWA and yield anomalies
    Corr(CorrArgs),
}

#[derive(Debug, Args)]
pub struct YieldArgs {
    #[arg(long, default_value = "data", help = "Standardized data store root")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "out")]
    pub out: PathBuf,

    #[arg(long, num_args = 1.., default_value = "all", help = "Regions to process ('all' for every registered region)")]
    pub regions: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_YEAR_START)]
    pub year_start: i32,

    #[arg(long, default_value_t = DEFAULT_YEAR_END)]
    pub year_end: i32,

    #[arg(long, default_value_t = false, help = "Run all steps: anomalies, coverage, report")]
    pub run: bool,

    #[arg(long, default_value_t = false, help = "Compute area-coverage bands")]
    pub coverage: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Also aggregate coverage over the union of the selected regions"
    )]
    pub combine: bool,

    #[arg(long, default_value_t = -2.5, help = "Lowest coverage band bound")]
    pub thresh_min: f64,

    #[arg(long, default_value_t = 0.0, help = "Coverage band upper bound")]
    pub thresh_max: f64,

    #[arg(long, default_value_t = 0.5, help = "Coverage band step")]
    pub step: f64,

    #[arg(long, default_value_t = false, help = "Drop the unbounded (-inf) band")]
    pub no_unbounded: bool,

    #[arg(long, default_value_t = false, help = "Write the JSON run report")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CorrArgs {
    #[arg(long, default_value = "data", help = "Standardized data store root")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "out")]
    pub out: PathBuf,

    #[arg(
        long,
        default_value_t = DEFAULT_DROUGHT_THRESHOLD,
        help = "Drought-detection threshold the SWA series was built with"
    )]
    pub th_detection_drought: f64,

    #[arg(long, default_value_t = DEFAULT_MONTH_START)]
    pub month_start: u32,

    #[arg(long, default_value_t = DEFAULT_MONTH_END)]
    pub month_end: u32,

    #[arg(long, default_value_t = DEFAULT_YEAR_START)]
    pub year_start: i32,

    #[arg(long, default_value_t = DEFAULT_YEAR_END)]
    pub year_end: i32,

    #[arg(
        long,
        default_value = DEFAULT_TH_SWA,
        help = "SWA thresholds: comma-separated list or '(start,end,step)'"
    )]
    pub th_swa_list: String,

    #[arg(
        long,
        default_value = DEFAULT_TH_YA,
        help = "Yield-anomaly thresholds: comma-separated list or '(start,end,step)'"
    )]
    pub th_ya_list: String,

    #[arg(long, default_value = "europe", help = "Region whose anomaly series to correlate")]
    pub region: String,

    #[arg(
        long,
        default_value_t = false,
        help = "Append a synthetic all-region mean column before correlating"
    )]
    pub region_mean: bool,

    #[arg(long, value_enum, default_value_t = SaveDataArg::Both)]
    pub save_data: SaveDataArg,

    #[arg(long, default_value_t = false, help = "Write the JSON run report")]
    pub json: bool,

    #[arg(long, default_value_t = false, help = "Run all steps: sweep, stores, report")]
    pub run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SaveDataArg {
    Netcdf,
    Table,
    Both,
    None,
}

impl YieldArgs {
    pub fn to_config(&self) -> Result<AnalysisConfig> {
        let cfg = AnalysisConfig {
            drought_threshold: DEFAULT_DROUGHT_THRESHOLD,
            month_start: DEFAULT_MONTH_START,
            month_end: DEFAULT_MONTH_END,
            year_start: self.year_start,
            year_end: self.year_end,
            th_swa: ThresholdSpec::parse_expand(DEFAULT_TH_SWA)?,
            th_ya: ThresholdSpec::parse_expand(DEFAULT_TH_YA)?,
            regions: self.regions.clone(),
            data_dir: self.data_dir.clone(),
            out_dir: self.out.clone(),
            coverage: CoverageParams {
                thresh_min: self.thresh_min,
                thresh_max: self.thresh_max,
                step: self.step,
                unbounded: !self.no_unbounded,
            },
            region_mean: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl CorrArgs {
    pub fn to_config(&self) -> Result<AnalysisConfig> {
        let cfg = AnalysisConfig {
            drought_threshold: self.th_detection_drought,
            month_start: self.month_start,
            month_end: self.month_end,
            year_start: self.year_start,
            year_end: self.year_end,
            th_swa: ThresholdSpec::parse_expand(&self.th_swa_list)?,
            th_ya: ThresholdSpec::parse_expand(&self.th_ya_list)?,
            regions: vec![self.region.clone()],
            data_dir: self.data_dir.clone(),
            out_dir: self.out.clone(),
            coverage: CoverageParams::default(),
            region_mean: self.region_mean,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
