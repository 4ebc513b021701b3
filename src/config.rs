use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::error::AnalysisError;

pub const DEFAULT_DROUGHT_THRESHOLD: f64 = -0.67;
pub const DEFAULT_MONTH_START: u32 = 4;
pub const DEFAULT_MONTH_END: u32 = 9;
pub const DEFAULT_YEAR_START: i32 = 1991;
pub const DEFAULT_YEAR_END: i32 = 2023;
pub const DEFAULT_TH_SWA: &str = "(0,1,0.05)";
pub const DEFAULT_TH_YA: &str = "0,-0.3,-0.5,-0.67,-1.0,-1.5";

/// Threshold axis specification: either an explicit ordered list or a
/// `(start,end,step)` range expanded inclusive of the end value.
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdSpec {
    List(Vec<f64>),
    Range { start: f64, end: f64, step: f64 },
}

impl ThresholdSpec {
    /// Expand into a strictly monotonic coordinate vector. Fails fast at
    /// configuration-build time, before any computation starts.
    pub fn expand(&self) -> Result<Vec<f64>> {
        let values = match self {
            ThresholdSpec::List(values) => values.clone(),
            ThresholdSpec::Range { start, end, step } => {
                if *step == 0.0 || !step.is_finite() {
                    return Err(invalid(self, "step must be finite and non-zero"));
                }
                if (end - start) / step < 0.0 {
                    return Err(invalid(self, "step sign does not reach end from start"));
                }
                let n = ((end - start) / step).round() as usize + 1;
                (0..n).map(|i| start + i as f64 * step).collect()
            }
        };
        if values.is_empty() {
            return Err(invalid(self, "empty threshold set"));
        }
        let increasing = values.windows(2).all(|w| w[1] > w[0]);
        let decreasing = values.windows(2).all(|w| w[1] < w[0]);
        if values.len() > 1 && !increasing && !decreasing {
            return Err(invalid(self, "thresholds must be strictly monotonic"));
        }
        Ok(values)
    }

    /// Parse and expand in one step; the common configuration-build path.
    pub fn parse_expand(s: &str) -> Result<Vec<f64>> {
        s.parse::<ThresholdSpec>()?.expand()
    }

    fn display(&self) -> String {
        match self {
            ThresholdSpec::List(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(","),
            ThresholdSpec::Range { start, end, step } => {
                format!("({},{},{})", start, end, step)
            }
        }
    }
}

fn invalid(spec: &ThresholdSpec, reason: &str) -> anyhow::Error {
    AnalysisError::InvalidThresholdSpec {
        spec: spec.display(),
        reason: reason.to_string(),
    }
    .into()
}

impl FromStr for ThresholdSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parse_err = |reason: &str| AnalysisError::InvalidThresholdSpec {
            spec: trimmed.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.starts_with('(') && trimmed.ends_with(')') {
            let inner = &trimmed[1..trimmed.len() - 1];
            let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(parse_err("range form must be (start,end,step)").into());
            }
            let mut nums = [0.0f64; 3];
            for (slot, part) in nums.iter_mut().zip(&parts) {
                *slot = part
                    .parse()
                    .map_err(|_| parse_err("range component is not a number"))?;
            }
            return Ok(ThresholdSpec::Range {
                start: nums[0],
                end: nums[1],
                step: nums[2],
            });
        }

        let mut values = Vec::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(parse_err("empty list element").into());
            }
            values.push(
                part.parse()
                    .map_err(|_| parse_err("list element is not a number"))?,
            );
        }
        Ok(ThresholdSpec::List(values))
    }
}

/// Parameters of the area-coverage threshold grid.
#[derive(Debug, Clone, Copy)]
pub struct CoverageParams {
    pub thresh_min: f64,
    pub thresh_max: f64,
    pub step: f64,
    /// Prepend an unbounded band covering all non-positive anomalies.
    pub unbounded: bool,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            thresh_min: -2.5,
            thresh_max: 0.0,
            step: 0.5,
            unbounded: true,
        }
    }
}

/// Immutable per-run configuration, built once from CLI arguments with
/// eager validation. Core functions take this explicitly instead of
/// reading ambient state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub drought_threshold: f64,
    pub month_start: u32,
    pub month_end: u32,
    pub year_start: i32,
    pub year_end: i32,
    pub th_swa: Vec<f64>,
    pub th_ya: Vec<f64>,
    pub regions: Vec<String>,
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub coverage: CoverageParams,
    /// Append a synthetic region holding the per-year mean of all region
    /// columns before correlating.
    pub region_mean: bool,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month_start) || !(1..=12).contains(&self.month_end) {
            bail!("months must be in 1..=12");
        }
        if self.month_start > self.month_end {
            bail!(
                "month_start ({}) must not exceed month_end ({})",
                self.month_start,
                self.month_end
            );
        }
        if self.year_start > self.year_end {
            bail!(
                "year_start ({}) must not exceed year_end ({})",
                self.year_start,
                self.year_end
            );
        }
        if self.th_swa.is_empty() || self.th_ya.is_empty() {
            bail!("threshold axes must be non-empty");
        }
        if self.coverage.step <= 0.0 {
            bail!("coverage step must be positive");
        }
        if self.coverage.thresh_min > self.coverage.thresh_max {
            bail!("coverage thresh_min must not exceed thresh_max");
        }
        Ok(())
    }

    /// Seasonal aggregation label, e.g. `6_months-APR_SEP`. Used both in
    /// the SWA data-store layout and as cube provenance.
    pub fn period_aggregation(&self) -> String {
        period_aggregation_str(self.month_start, self.month_end)
    }

    pub fn prod_table_path(&self, region: &str) -> PathBuf {
        self.data_dir
            .join("yield")
            .join(region)
            .join(format!("prod_{}_standardized.tsv", region))
    }

    pub fn area_table_path(&self, region: &str) -> PathBuf {
        self.data_dir
            .join("yield")
            .join(region)
            .join(format!("area_{}_standardized.tsv", region))
    }

    pub fn swa_series_path(&self) -> PathBuf {
        self.data_dir
            .join("swa")
            .join(format!("th_{}", self.drought_threshold))
            .join(self.period_aggregation())
            .join(format!(
                "temporal_series_swa-{}_{}.tsv",
                self.year_start, self.year_end
            ))
    }

    pub fn anomaly_out_path(&self, region: &str) -> PathBuf {
        self.out_dir.join(format!(
            "{}_prod_anom-{}_{}.tsv",
            region, self.year_start, self.year_end
        ))
    }

    pub fn coverage_out_path(&self, region: &str) -> PathBuf {
        let c = &self.coverage;
        self.out_dir.join(format!(
            "area_covered_{}_anom_{}_{}_step_{}.tsv",
            region, c.thresh_min, c.thresh_max, c.step
        ))
    }

    pub fn cube_h5_path(&self) -> PathBuf {
        self.out_dir.join("mcc_results.h5")
    }

    pub fn cube_table_path(&self) -> PathBuf {
        self.out_dir.join("mcc_results.tsv")
    }

    pub fn cube_region_table_path(&self, region: &str) -> PathBuf {
        self.out_dir.join(format!("mcc_results_{}.tsv", region))
    }

    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join("yieldcorr.json")
    }
}

const MONTH_ABBR: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

pub fn month_abbr(month: u32) -> &'static str {
    MONTH_ABBR[(month as usize).saturating_sub(1).min(11)]
}

pub fn period_aggregation_str(month_start: u32, month_end: u32) -> String {
    format!(
        "{}_months-{}_{}",
        month_end - month_start + 1,
        month_abbr(month_start),
        month_abbr(month_end)
    )
}

/// Resolve the combined yield-anomaly file the correlation step consumes:
/// produced by a prior `yield` run, looked up first in the output
/// directory, then in the data store.
pub fn resolve_anomaly_input(cfg: &AnalysisConfig, region: &str) -> Result<PathBuf> {
    let local = cfg.anomaly_out_path(region);
    if local.exists() {
        return Ok(local);
    }
    let stored = cfg
        .data_dir
        .join("yield")
        .join("output")
        .join(format!(
            "{}_prod_anom-{}_{}.tsv",
            region, cfg.year_start, cfg.year_end
        ));
    if stored.exists() {
        return Ok(stored);
    }
    Err(AnalysisError::MissingInput(local).into())
}

pub fn require_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AnalysisError::MissingInput(path.to_path_buf()).into());
    }
    Ok(())
}
