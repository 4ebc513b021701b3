//! Self-describing multi-dimensional store for the correlation cube.
//!
//! Layout mirrors the upstream NetCDF4 convention: a 3-D `MCC` variable
//! with coordinate datasets `TH_SWA`, `TH_YA`, `region`, global
//! provenance attributes, and per-dataset `long_name`/`units`
//! attributes.

use std::path::Path;

use anyhow::{Context, Result, bail};
use hdf5::types::VarLenUnicode;
use hdf5::{Dataset, File};
use ndarray::Ix3;

use crate::corr::sweep::{CorrelationCube, CubeProvenance};

const DESCRIPTION: &str = "Matthews Correlation Coefficient (MCC) between Standardized Water \
                           Anomaly (SWA) and yield anomalies for various thresholds";

pub fn write_cube(path: &Path, cube: &CorrelationCube) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mcc = file
        .new_dataset_builder()
        .with_data(cube.mcc.view())
        .create("MCC")?;
    write_str_attr(&mcc, "long_name", "Matthews Correlation Coefficient")?;
    write_str_attr(&mcc, "units", "unitless")?;

    let th_swa = file
        .new_dataset_builder()
        .with_data(&cube.th_swa)
        .create("TH_SWA")?;
    write_str_attr(&th_swa, "long_name", "Thresholds for Standardized Water Anomaly")?;
    write_str_attr(&th_swa, "units", "unitless")?;

    let th_ya = file
        .new_dataset_builder()
        .with_data(&cube.th_ya)
        .create("TH_YA")?;
    write_str_attr(&th_ya, "long_name", "Thresholds for Yield Anomalies")?;
    write_str_attr(&th_ya, "units", "unitless")?;

    let regions = to_unicode(&cube.regions)?;
    let region_ds = file
        .new_dataset_builder()
        .with_data(&regions)
        .create("region")?;
    write_str_attr(&region_ds, "long_name", "Study regions")?;

    let desc = file.new_attr::<VarLenUnicode>().create("description")?;
    desc.write_scalar(&unicode(DESCRIPTION)?)?;
    let th = file.new_attr::<f64>().create("swa_threshold")?;
    th.write_scalar(&cube.provenance.drought_threshold)?;
    let period = file.new_attr::<VarLenUnicode>().create("period_aggregation")?;
    period.write_scalar(&unicode(&cube.provenance.period_aggregation)?)?;

    Ok(())
}

pub fn read_cube(path: &Path) -> Result<CorrelationCube> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mcc = file
        .dataset("MCC")?
        .read_dyn::<f64>()
        .context("failed to read MCC variable")?
        .into_dimensionality::<Ix3>()
        .context("MCC variable is not 3-dimensional")?;
    let th_swa: Vec<f64> = file.dataset("TH_SWA")?.read_1d()?.to_vec();
    let th_ya: Vec<f64> = file.dataset("TH_YA")?.read_1d()?.to_vec();
    let regions: Vec<String> = file
        .dataset("region")?
        .read_1d::<VarLenUnicode>()?
        .iter()
        .map(|s| s.to_string())
        .collect();

    if mcc.shape() != [th_swa.len(), th_ya.len(), regions.len()] {
        bail!(
            "{}: MCC shape {:?} does not match axes ({}, {}, {})",
            path.display(),
            mcc.shape(),
            th_swa.len(),
            th_ya.len(),
            regions.len()
        );
    }

    let drought_threshold = file.attr("swa_threshold")?.read_scalar::<f64>()?;
    let period_aggregation = file
        .attr("period_aggregation")?
        .read_scalar::<VarLenUnicode>()?
        .to_string();

    Ok(CorrelationCube {
        th_swa,
        th_ya,
        regions,
        mcc,
        provenance: CubeProvenance {
            drought_threshold,
            period_aggregation,
        },
    })
}

fn write_str_attr(ds: &Dataset, name: &str, value: &str) -> Result<()> {
    let attr = ds.new_attr::<VarLenUnicode>().create(name)?;
    attr.write_scalar(&unicode(value)?)?;
    Ok(())
}

fn unicode(value: &str) -> Result<VarLenUnicode> {
    value
        .parse::<VarLenUnicode>()
        .map_err(|e| anyhow::anyhow!("invalid attribute string: {}", e))
}

fn to_unicode(values: &[String]) -> Result<Vec<VarLenUnicode>> {
    values.iter().map(|v| unicode(v)).collect()
}
