use std::fs;

use ndarray::{Array3, arr2};
use tempfile::TempDir;
use yieldcorr::config::CoverageParams;
use yieldcorr::corr::sweep::{CorrelationCube, CubeProvenance};
use yieldcorr::coverage::{CoverageTable, coverage_grid};
use yieldcorr::io::{cube_table, series_table};
use yieldcorr::series::{SeriesTable, WideTable};

#[test]
fn series_table_round_trip_with_na() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("prod_usa_standardized.tsv");

    let table = SeriesTable {
        names: vec!["Iowa".to_string(), "Kansas".to_string()],
        ids: vec!["US-IA".to_string(), "US-KS".to_string()],
        codes: vec!["19".to_string(), "20".to_string()],
        years: vec![2000, 2001],
        values: arr2(&[[1.5, f64::NAN], [2.5, 3.0]]),
    };
    series_table::write_series_table(&path, &table).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("name\tIowa\tKansas\n"));
    assert!(content.contains("2000\t1.5\tNA\n"));

    let back = series_table::read_series_table(&path).unwrap();
    assert_eq!(back.ids, table.ids);
    assert_eq!(back.years, table.years);
    assert!(back.values[(0, 1)].is_nan());
    assert!((back.values[(1, 1)] - 3.0).abs() < 1e-12);
}

#[test]
fn wide_table_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("temporal_series_swa-2000_2001.tsv");

    let table = WideTable {
        columns: vec!["FR2".to_string(), "FR3".to_string()],
        years: vec![2000, 2001],
        values: arr2(&[[0.25, f64::NAN], [0.5, 0.75]]),
    };
    series_table::write_wide_table(&path, &table).unwrap();

    let back = series_table::read_wide_table(&path).unwrap();
    assert_eq!(back.columns, table.columns);
    assert_eq!(back.years, table.years);
    assert!(back.values[(0, 1)].is_nan());
    assert!((back.values[(1, 0)] - 0.5).abs() < 1e-12);
}

#[test]
fn wide_table_rejects_wrong_header() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.tsv");
    fs::write(&path, "year\tFR2\n2000\t0.5\n").unwrap();
    assert!(series_table::read_wide_table(&path).is_err());
}

#[test]
fn coverage_table_header_labels() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("area_covered.tsv");

    let params = CoverageParams::default();
    let thresholds = coverage_grid(&params);
    let table = CoverageTable {
        percent: ndarray::Array2::zeros((1, thresholds.len())),
        thresholds,
        years: vec![2000],
    };
    series_table::write_coverage_table(&path, &table).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let header = content.lines().next().unwrap();
    assert!(header.starts_with("year\t-inf\t-2.5\t"));
    assert!(content.contains("2000\t0.0000"));
}

#[test]
fn cube_table_round_trip() {
    let tmp = TempDir::new().unwrap();
    let combined = tmp.path().join("mcc_results.tsv");

    let cube = CorrelationCube {
        th_swa: vec![0.5, 0.8],
        th_ya: vec![-0.5, -0.7],
        regions: vec!["FR2".to_string(), "FR3".to_string()],
        mcc: Array3::from_shape_fn((2, 2, 2), |(i, j, k)| (i + 2 * j + 4 * k) as f64 / 10.0),
        provenance: CubeProvenance {
            drought_threshold: -0.67,
            period_aggregation: "6_months-APR_SEP".to_string(),
        },
    };
    cube_table::write_cube_tables(&cube, &combined, |region| {
        tmp.path().join(format!("mcc_results_{}.tsv", region))
    })
    .unwrap();

    assert!(tmp.path().join("mcc_results_FR2.tsv").exists());
    assert!(tmp.path().join("mcc_results_FR3.tsv").exists());

    let back = cube_table::read_cube_table(&combined).unwrap();
    assert_eq!(back.th_swa, cube.th_swa);
    assert_eq!(back.th_ya, cube.th_ya);
    assert_eq!(back.regions, cube.regions);
    assert_eq!(back.mcc, cube.mcc);
    assert_eq!(back.provenance, cube.provenance);
}

#[test]
fn cube_table_rejects_incomplete_grid() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("partial.tsv");
    fs::write(
        &path,
        "# swa_threshold\t-0.67\n# period_aggregation\t6_months-APR_SEP\n\
         TH_SWA\tTH_YA\tregion\tMCC\n0.5\t-0.5\tFR2\t0.1\n0.8\t-0.5\tFR3\t0.2\n",
    )
    .unwrap();
    assert!(cube_table::read_cube_table(&path).is_err());
}
