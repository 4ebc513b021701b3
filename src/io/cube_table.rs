//! Flattened tabular form of the correlation cube: one combined table
//! (TH_SWA, TH_YA, region, MCC) plus one filtered table per region.
//! The combined table reads back into a cube, so it doubles as the
//! result store when the `hdf5` feature is off.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ndarray::Array3;

use crate::corr::sweep::{CorrelationCube, CubeProvenance};
use crate::io::open_maybe_gz;

/// Write the combined table and one per-region table. Values use the
/// shortest round-trip decimal representation, so read-back is exact.
pub fn write_cube_tables(
    cube: &CorrelationCube,
    combined_path: &Path,
    region_path: impl Fn(&str) -> PathBuf,
) -> Result<()> {
    write_combined(cube, combined_path)?;
    for (k, region) in cube.regions.iter().enumerate() {
        let path = region_path(region);
        let file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_provenance(&mut w, &cube.provenance)?;
        writeln!(w, "TH_SWA\tTH_YA\tMCC")?;
        for (i, th_swa) in cube.th_swa.iter().enumerate() {
            for (j, th_ya) in cube.th_ya.iter().enumerate() {
                writeln!(w, "{}\t{}\t{}", th_swa, th_ya, cube.mcc[(i, j, k)])?;
            }
        }
    }
    Ok(())
}

fn write_combined(cube: &CorrelationCube, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_provenance(&mut w, &cube.provenance)?;
    writeln!(w, "TH_SWA\tTH_YA\tregion\tMCC")?;
    for (i, th_swa) in cube.th_swa.iter().enumerate() {
        for (j, th_ya) in cube.th_ya.iter().enumerate() {
            for (k, region) in cube.regions.iter().enumerate() {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}",
                    th_swa,
                    th_ya,
                    region,
                    cube.mcc[(i, j, k)]
                )?;
            }
        }
    }
    Ok(())
}

fn write_provenance(w: &mut impl Write, provenance: &CubeProvenance) -> Result<()> {
    writeln!(w, "# swa_threshold\t{}", provenance.drought_threshold)?;
    writeln!(w, "# period_aggregation\t{}", provenance.period_aggregation)?;
    Ok(())
}

/// Reconstruct a cube from the combined table. Axis values appear in
/// first-seen (write) order; the row set must form a complete grid.
pub fn read_cube_table(path: &Path) -> Result<CorrelationCube> {
    let reader = BufReader::new(open_maybe_gz(path)?);

    let mut drought_threshold = f64::NAN;
    let mut period_aggregation = String::new();
    let mut th_swa: Vec<f64> = Vec::new();
    let mut th_ya: Vec<f64> = Vec::new();
    let mut regions: Vec<String> = Vec::new();
    let mut cells: Vec<(usize, usize, usize, f64)> = Vec::new();
    let mut saw_header = false;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('#') {
            let mut fields = rest.trim().split('\t');
            match (fields.next(), fields.next()) {
                (Some("swa_threshold"), Some(v)) => {
                    drought_threshold = v.parse().context("invalid swa_threshold attribute")?;
                }
                (Some("period_aggregation"), Some(v)) => {
                    period_aggregation = v.to_string();
                }
                _ => {}
            }
            continue;
        }
        if !saw_header {
            if trimmed != "TH_SWA\tTH_YA\tregion\tMCC" {
                bail!("{}: unexpected header '{}'", path.display(), trimmed);
            }
            saw_header = true;
            continue;
        }
        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() != 4 {
            bail!("{}: malformed row '{}'", path.display(), trimmed);
        }
        let swa: f64 = fields[0].parse().context("invalid TH_SWA value")?;
        let ya: f64 = fields[1].parse().context("invalid TH_YA value")?;
        let mcc: f64 = fields[3].parse().context("invalid MCC value")?;
        let i = index_of(&mut th_swa, swa);
        let j = index_of(&mut th_ya, ya);
        let k = regions
            .iter()
            .position(|r| r == fields[2])
            .unwrap_or_else(|| {
                regions.push(fields[2].to_string());
                regions.len() - 1
            });
        cells.push((i, j, k, mcc));
    }

    if cells.len() != th_swa.len() * th_ya.len() * regions.len() {
        bail!(
            "{}: table does not form a complete threshold grid",
            path.display()
        );
    }

    let mut mcc = Array3::from_elem((th_swa.len(), th_ya.len(), regions.len()), f64::NAN);
    for (i, j, k, v) in cells {
        mcc[(i, j, k)] = v;
    }

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

fn index_of(axis: &mut Vec<f64>, value: f64) -> usize {
    match axis.iter().position(|&v| v == value) {
        Some(i) => i,
        None => {
            axis.push(value);
            axis.len() - 1
        }
    }
}
