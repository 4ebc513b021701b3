//! Tab-separated table formats of the standardized data store.
//!
//! Region tables carry three header rows (display name, identifier,
//! secondary code) then one row per year; wide tables carry a single
//! header row. Missing values are written as `NA`.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::Array2;

use crate::coverage::CoverageTable;
use crate::io::open_maybe_gz;
use crate::series::{AnomalySeries, SeriesTable, WideTable};

const MISSING: &str = "NA";

fn parse_value(field: &str) -> Result<f64> {
    let field = field.trim();
    if field.is_empty() || field == MISSING || field.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    field
        .parse()
        .with_context(|| format!("invalid numeric field '{}'", field))
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        MISSING.to_string()
    } else {
        v.to_string()
    }
}

fn split_header<'a>(line: &'a str, label: &str, path: &Path) -> Result<Vec<&'a str>> {
    let mut fields = line.split('\t');
    let first = fields.next().unwrap_or_default();
    if first != label {
        bail!(
            "{}: expected header row '{}', found '{}'",
            path.display(),
            label,
            first
        );
    }
    Ok(fields.collect())
}

pub fn read_series_table(path: &Path) -> Result<SeriesTable> {
    let reader = BufReader::new(open_maybe_gz(path)?);
    let mut lines = reader.lines();

    let mut next_line = |label: &str| -> Result<String> {
        lines
            .next()
            .transpose()?
            .with_context(|| format!("{}: missing {} header row", path.display(), label))
    };

    let name_line = next_line("name")?;
    let id_line = next_line("id")?;
    let code_line = next_line("code")?;
    let names: Vec<String> = split_header(&name_line, "name", path)?
        .into_iter()
        .map(str::to_string)
        .collect();
    let ids: Vec<String> = split_header(&id_line, "id", path)?
        .into_iter()
        .map(str::to_string)
        .collect();
    let codes: Vec<String> = split_header(&code_line, "code", path)?
        .into_iter()
        .map(str::to_string)
        .collect();
    if names.len() != ids.len() || codes.len() != ids.len() {
        bail!("{}: header rows disagree on column count", path.display());
    }

    let mut years = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let year_field = fields.next().unwrap_or_default();
        let year: i32 = year_field
            .trim()
            .parse()
            .with_context(|| format!("{}: invalid year '{}'", path.display(), year_field))?;
        let row: Vec<f64> = fields.map(parse_value).collect::<Result<_>>()?;
        if row.len() != ids.len() {
            bail!(
                "{}: year {} has {} values, expected {}",
                path.display(),
                year,
                row.len(),
                ids.len()
            );
        }
        years.push(year);
        rows.push(row);
    }

    let values = Array2::from_shape_vec(
        (years.len(), ids.len()),
        rows.into_iter().flatten().collect(),
    )?;
    Ok(SeriesTable {
        names,
        ids,
        codes,
        years,
        values,
    })
}

pub fn write_series_table(path: &Path, table: &SeriesTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "name\t{}", table.names.join("\t"))?;
    writeln!(w, "id\t{}", table.ids.join("\t"))?;
    writeln!(w, "code\t{}", table.codes.join("\t"))?;
    for (i, year) in table.years.iter().enumerate() {
        let row: Vec<String> = table.values.row(i).iter().map(|&v| format_value(v)).collect();
        writeln!(w, "{}\t{}", year, row.join("\t"))?;
    }
    Ok(())
}

pub fn read_wide_table(path: &Path) -> Result<WideTable> {
    let reader = BufReader::new(open_maybe_gz(path)?);
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .with_context(|| format!("{}: missing header row", path.display()))?;
    let columns: Vec<String> = split_header(&header, "time", path)?
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut years = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let year_field = fields.next().unwrap_or_default();
        let year: i32 = year_field
            .trim()
            .parse()
            .with_context(|| format!("{}: invalid year '{}'", path.display(), year_field))?;
        let row: Vec<f64> = fields.map(parse_value).collect::<Result<_>>()?;
        if row.len() != columns.len() {
            bail!(
                "{}: year {} has {} values, expected {}",
                path.display(),
                year,
                row.len(),
                columns.len()
            );
        }
        years.push(year);
        rows.push(row);
    }

    let values = Array2::from_shape_vec(
        (years.len(), columns.len()),
        rows.into_iter().flatten().collect(),
    )?;
    Ok(WideTable {
        columns,
        years,
        values,
    })
}

pub fn write_wide_table(path: &Path, table: &WideTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "time\t{}", table.columns.join("\t"))?;
    for (i, year) in table.years.iter().enumerate() {
        let row: Vec<String> = table.values.row(i).iter().map(|&v| format_value(v)).collect();
        writeln!(w, "{}\t{}", year, row.join("\t"))?;
    }
    Ok(())
}

pub fn write_anomaly_series(path: &Path, series: &AnomalySeries) -> Result<()> {
    write_wide_table(path, &WideTable::from(series))
}

pub fn write_coverage_table(path: &Path, table: &CoverageTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    let labels: Vec<String> = table
        .thresholds
        .iter()
        .map(|&t| {
            if t == f64::NEG_INFINITY {
                "-inf".to_string()
            } else {
                t.to_string()
            }
        })
        .collect();
    writeln!(w, "year\t{}", labels.join("\t"))?;
    for (i, year) in table.years.iter().enumerate() {
        let row: Vec<String> = table
            .percent
            .row(i)
            .iter()
            .map(|v| format!("{:.4}", v))
            .collect();
        writeln!(w, "{}\t{}", year, row.join("\t"))?;
    }
    Ok(())
}
