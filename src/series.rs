use anyhow::{Result, bail};
use ndarray::{Array2, ArrayView1, Axis};

/// A standardized region table: three header rows (display name,
/// identifier, secondary code) and one row per year, one column per
/// sub-region. Production and area series share this shape; a
/// (production, area) pair of aligned tables is the raw input of the
/// anomaly builder.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    pub names: Vec<String>,
    pub ids: Vec<String>,
    pub codes: Vec<String>,
    pub years: Vec<i32>,
    /// years × sub-regions; NaN encodes missing.
    pub values: Array2<f64>,
}

impl SeriesTable {
    pub fn n_years(&self) -> usize {
        self.years.len()
    }

    pub fn n_sites(&self) -> usize {
        self.ids.len()
    }

    pub fn column(&self, site: usize) -> ArrayView1<'_, f64> {
        self.values.column(site)
    }

    pub fn site_index(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    /// Row index for a year, if present.
    pub fn year_index(&self, year: i32) -> Option<usize> {
        self.years.iter().position(|&y| y == year)
    }

    /// Both tables must describe the same sub-regions over the same
    /// years for production/area to be divisible elementwise.
    pub fn check_aligned(&self, other: &SeriesTable) -> Result<()> {
        if self.years != other.years {
            bail!("tables cover different year axes");
        }
        if self.ids != other.ids {
            bail!("tables cover different sub-region identifiers");
        }
        Ok(())
    }

    /// Restrict to an inclusive year range, keeping only years present.
    pub fn select_years(&self, year_start: i32, year_end: i32) -> SeriesTable {
        let keep: Vec<usize> = self
            .years
            .iter()
            .enumerate()
            .filter(|(_, &y)| y >= year_start && y <= year_end)
            .map(|(i, _)| i)
            .collect();
        let years = keep.iter().map(|&i| self.years[i]).collect();
        let values = self.values.select(Axis(0), &keep);
        SeriesTable {
            names: self.names.clone(),
            ids: self.ids.clone(),
            codes: self.codes.clone(),
            years,
            values,
        }
    }

    /// Column-wise union of several regions' tables sharing a year axis.
    pub fn concat_columns(tables: &[SeriesTable]) -> Result<SeriesTable> {
        let Some(first) = tables.first() else {
            bail!("no tables to combine");
        };
        let mut names = Vec::new();
        let mut ids = Vec::new();
        let mut codes = Vec::new();
        for table in tables {
            if table.years != first.years {
                bail!("cannot combine tables with different year axes");
            }
            names.extend(table.names.iter().cloned());
            ids.extend(table.ids.iter().cloned());
            codes.extend(table.codes.iter().cloned());
        }
        let n_years = first.n_years();
        let n_sites = ids.len();
        let mut values = Array2::from_elem((n_years, n_sites), f64::NAN);
        let mut offset = 0;
        for table in tables {
            for (j, col) in table.values.columns().into_iter().enumerate() {
                values.column_mut(offset + j).assign(&col);
            }
            offset += table.n_sites();
        }
        Ok(SeriesTable {
            names,
            ids,
            codes,
            years: first.years.clone(),
            values,
        })
    }
}

/// Normalized yield anomalies, year × sub-region. Columns are sorted by
/// identifier; values are NaN where the source yield was undefined or
/// the sub-region was excluded by the data-quality gate.
#[derive(Debug, Clone)]
pub struct AnomalySeries {
    pub years: Vec<i32>,
    pub ids: Vec<String>,
    pub values: Array2<f64>,
}

impl AnomalySeries {
    pub fn n_years(&self) -> usize {
        self.years.len()
    }

    pub fn site_index(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    pub fn select_years(&self, year_start: i32, year_end: i32) -> AnomalySeries {
        let keep: Vec<usize> = self
            .years
            .iter()
            .enumerate()
            .filter(|(_, &y)| y >= year_start && y <= year_end)
            .map(|(i, _)| i)
            .collect();
        let years = keep.iter().map(|&i| self.years[i]).collect();
        let values = self.values.select(Axis(0), &keep);
        AnomalySeries {
            years,
            ids: self.ids.clone(),
            values,
        }
    }

    pub fn concat(list: &[AnomalySeries]) -> Result<AnomalySeries> {
        let Some(first) = list.first() else {
            bail!("no anomaly series to combine");
        };
        let mut ids = Vec::new();
        for series in list {
            if series.years != first.years {
                bail!("cannot combine anomaly series with different year axes");
            }
            ids.extend(series.ids.iter().cloned());
        }
        let mut values = Array2::from_elem((first.n_years(), ids.len()), f64::NAN);
        let mut offset = 0;
        for series in list {
            for (j, col) in series.values.columns().into_iter().enumerate() {
                values.column_mut(offset + j).assign(&col);
            }
            offset += series.ids.len();
        }
        Ok(AnomalySeries {
            years: first.years.clone(),
            ids,
            values,
        })
    }
}

/// A single-header wide table: one column per region, one row per year.
/// Shape of the spatially aggregated SWA series and of the persisted
/// yield-anomaly series consumed by the correlation stage.
#[derive(Debug, Clone)]
pub struct WideTable {
    pub columns: Vec<String>,
    pub years: Vec<i32>,
    /// years × columns; NaN encodes missing.
    pub values: Array2<f64>,
}

impl WideTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a synthetic column holding the per-year mean of all
    /// existing columns (NaN-aware).
    pub fn push_mean_column(&mut self, name: &str) {
        let n_years = self.years.len();
        let mut mean_col = Vec::with_capacity(n_years);
        for row in self.values.rows() {
            let defined: Vec<f64> = row.iter().copied().filter(|v| !v.is_nan()).collect();
            if defined.is_empty() {
                mean_col.push(f64::NAN);
            } else {
                mean_col.push(defined.iter().sum::<f64>() / defined.len() as f64);
            }
        }
        let mut values = Array2::from_elem((n_years, self.columns.len() + 1), f64::NAN);
        values
            .slice_mut(ndarray::s![.., ..self.columns.len()])
            .assign(&self.values);
        for (i, v) in mean_col.into_iter().enumerate() {
            values[(i, self.columns.len())] = v;
        }
        self.values = values;
        self.columns.push(name.to_string());
    }
}

impl From<&AnomalySeries> for WideTable {
    fn from(series: &AnomalySeries) -> Self {
        WideTable {
            columns: series.ids.clone(),
            years: series.years.clone(),
            values: series.values.clone(),
        }
    }
}
