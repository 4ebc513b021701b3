use std::path::PathBuf;

use crate::config::AnalysisConfig;
use crate::corr::AlignedSeries;
use crate::corr::sweep::CorrelationCube;
use crate::coverage::CoverageTable;
use crate::regions::RegionRegistry;
use crate::schema::v1::{ConfigSummary, YieldCorrV1};
use crate::series::{AnomalySeries, SeriesTable, WideTable};

/// Which cube stores the correlation run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Netcdf,
    Table,
    Both,
    None,
}

impl StoreFormat {
    pub fn netcdf(self) -> bool {
        matches!(self, StoreFormat::Netcdf | StoreFormat::Both)
    }

    pub fn table(self) -> bool {
        matches!(self, StoreFormat::Table | StoreFormat::Both)
    }
}

/// Mutable state threaded through the pipeline stages of one run.
#[derive(Debug)]
pub struct Ctx {
    pub cfg: AnalysisConfig,
    pub registry: RegionRegistry,
    /// Region the current pipeline invocation operates on.
    pub region: String,
    pub store_format: StoreFormat,
    pub write_coverage: bool,

    pub prod: Option<SeriesTable>,
    pub area: Option<SeriesTable>,
    pub anomalies: Option<AnomalySeries>,
    pub excluded: Vec<String>,
    pub coverage: Option<CoverageTable>,

    pub swa_series: Option<WideTable>,
    pub ya_series: Option<WideTable>,
    pub aligned: Option<AlignedSeries>,
    pub cube: Option<CorrelationCube>,

    pub warnings: Vec<String>,
    pub out_dir: PathBuf,
    pub report: YieldCorrV1,
}

impl Ctx {
    pub fn new(cfg: AnalysisConfig, region: &str, tool_version: &str) -> Self {
        let report = YieldCorrV1::empty(
            tool_version,
            ConfigSummary {
                drought_threshold: cfg.drought_threshold,
                month_start: cfg.month_start,
                month_end: cfg.month_end,
                year_start: cfg.year_start,
                year_end: cfg.year_end,
                period_aggregation: cfg.period_aggregation(),
            },
        );
        let out_dir = cfg.out_dir.clone();
        Self {
            cfg,
            registry: RegionRegistry::builtin(),
            region: region.to_string(),
            store_format: StoreFormat::Both,
            write_coverage: true,
            prod: None,
            area: None,
            anomalies: None,
            excluded: Vec::new(),
            coverage: None,
            swa_series: None,
            ya_series: None,
            aligned: None,
            cube: None,
            warnings: Vec::new(),
            out_dir,
            report,
        }
    }
}
