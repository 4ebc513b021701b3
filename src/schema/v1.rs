use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub drought_threshold: f64,
    pub month_start: u32,
    pub month_end: u32,
    pub year_start: i32,
    pub year_end: i32,
    pub period_aggregation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldRegionReport {
    pub region: String,
    pub display_name: String,
    pub n_subregions: u64,
    /// Identifiers rejected by the gap-fraction quality gate.
    pub excluded: Vec<String>,
    pub anomaly_path: Option<String>,
    pub coverage_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRegion {
    pub region: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxMccReport {
    #[serde(rename = "TH_SWA")]
    pub th_swa: f64,
    #[serde(rename = "TH_YA")]
    pub th_ya: f64,
    pub region: String,
    #[serde(rename = "MCC")]
    pub mcc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub th_swa: Vec<f64>,
    pub th_ya: Vec<f64>,
    pub regions: Vec<String>,
    pub n_years: u64,
    pub max_mcc: Option<MaxMccReport>,
    pub netcdf_path: Option<String>,
    pub table_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldCorrV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub config: ConfigSummary,
    pub yield_regions: Vec<YieldRegionReport>,
    pub failed_regions: Vec<FailedRegion>,
    pub correlation: Option<CorrelationReport>,
    pub warnings: Vec<String>,
}

impl YieldCorrV1 {
    pub fn empty(tool_version: &str, config: ConfigSummary) -> Self {
        Self {
            tool: "yieldcorr".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            config,
            yield_regions: Vec::new(),
            failed_regions: Vec::new(),
            correlation: None,
            warnings: Vec::new(),
        }
    }
}
