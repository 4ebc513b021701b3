use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::schema::v1::YieldCorrV1;

#[cfg(feature = "hdf5")]
pub mod cube_store;
#[cfg(not(feature = "hdf5"))]
pub mod cube_store {
    use anyhow::{Result, bail};
    use std::path::Path;

    use crate::corr::sweep::CorrelationCube;

    pub fn write_cube(_path: &Path, _cube: &CorrelationCube) -> Result<()> {
        bail!("HDF5 support not enabled. Rebuild with --features hdf5");
    }

    pub fn read_cube(_path: &Path) -> Result<CorrelationCube> {
        bail!("HDF5 support not enabled. Rebuild with --features hdf5");
    }
}
pub mod cube_table;
pub mod series_table;
pub mod summary;

pub fn write_json(path: &Path, report: &YieldCorrV1) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub(crate) fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}
