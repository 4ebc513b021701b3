use ndarray::Array2;
use yieldcorr::config::CoverageParams;
use yieldcorr::coverage::{area_coverage, coverage_grid, join_area};
use yieldcorr::regions::RegionRegistry;
use yieldcorr::series::{AnomalySeries, SeriesTable};

fn area_table(ids: &[&str], years: &[i32], rows: &[Vec<f64>]) -> SeriesTable {
    let mut values = Array2::from_elem((years.len(), ids.len()), f64::NAN);
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            values[(i, j)] = v;
        }
    }
    SeriesTable {
        names: ids.iter().map(|s| s.to_string()).collect(),
        ids: ids.iter().map(|s| s.to_string()).collect(),
        codes: ids.iter().map(|s| s.to_string()).collect(),
        years: years.to_vec(),
        values,
    }
}

fn anoms(ids: &[&str], years: &[i32], rows: &[Vec<f64>]) -> AnomalySeries {
    let mut values = Array2::from_elem((years.len(), ids.len()), f64::NAN);
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            values[(i, j)] = v;
        }
    }
    AnomalySeries {
        years: years.to_vec(),
        ids: ids.iter().map(|s| s.to_string()).collect(),
        values,
    }
}

#[test]
fn default_grid_shape() {
    let grid = coverage_grid(&CoverageParams::default());
    // -inf plus linspace(-2.5, 0, step 0.5).
    assert_eq!(grid.len(), 7);
    assert_eq!(grid[0], f64::NEG_INFINITY);
    assert!((grid[1] + 2.5).abs() < 1e-12);
    assert!((grid[6] - 0.0).abs() < 1e-12);
}

#[test]
fn grid_without_unbounded_band() {
    let params = CoverageParams {
        unbounded: false,
        ..CoverageParams::default()
    };
    assert_eq!(coverage_grid(&params).len(), 6);
}

#[test]
fn coverage_shares_of_total_area() {
    let registry = RegionRegistry::builtin();
    let usa = registry.get("usa").unwrap();
    let years = [2000];
    let ids = ["US-IA", "US-IL", "US-KS"];
    let area = area_table(&ids, &years, &[vec![10.0, 20.0, 30.0]]);
    let ya = anoms(&ids, &years, &[vec![-3.0, -1.0, 0.5]]);

    let table = area_coverage(&ya, &area, usa, &CoverageParams::default()).unwrap();
    // Unbounded band: anomalies -3 and -1 qualify, 30 of 60 total.
    assert!((table.percent[(0, 0)] - 50.0).abs() < 1e-9);
    // Band from -2.5: only the -1 anomaly, 20 of 60.
    assert!((table.percent[(0, 1)] - 100.0 / 3.0).abs() < 1e-9);
    // Band from 0: nothing negative qualifies.
    assert!((table.percent[(0, 6)] - 0.0).abs() < 1e-12);
    // Tightening the lower bound never increases coverage.
    for t in 1..table.thresholds.len() {
        assert!(table.percent[(0, t)] <= table.percent[(0, t - 1)] + 1e-12);
    }
}

#[test]
fn no_qualifying_year_is_zero() {
    let registry = RegionRegistry::builtin();
    let usa = registry.get("usa").unwrap();
    let years = [2000, 2001];
    let ids = ["US-IA"];
    let area = area_table(&ids, &years, &[vec![10.0], vec![10.0]]);
    // Year one positive, year two missing: both rows all-zero.
    let ya = anoms(&ids, &years, &[vec![1.2], vec![f64::NAN]]);

    let table = area_coverage(&ya, &area, usa, &CoverageParams::default()).unwrap();
    assert!(table.percent.iter().all(|&v| v == 0.0));
}

#[test]
fn aggregated_code_expands_onto_sub_columns() {
    let registry = RegionRegistry::builtin();
    let europe = registry.get("europe").unwrap();
    let years = [2000];
    // FR2 is absent from the area table; its sub-codes are present.
    let area = area_table(&["FRB0", "FRC1", "FRE1"], &years, &[vec![5.0, 7.0, 8.0]]);
    let ya = anoms(&["FR2", "FR3"], &years, &[vec![-1.0, -0.2]]);

    let joined = join_area(&ya, &area, europe);
    assert_eq!(joined.ids, vec!["FR2", "FR3"]);
    assert!((joined.values[(0, 0)] - 12.0).abs() < 1e-12);
    assert!((joined.values[(0, 1)] - 8.0).abs() < 1e-12);
}

#[test]
fn unjoinable_id_is_dropped() {
    let registry = RegionRegistry::builtin();
    let usa = registry.get("usa").unwrap();
    let years = [2000];
    let area = area_table(&["US-IA"], &years, &[vec![10.0]]);
    let ya = anoms(&["US-IA", "US-ZZ"], &years, &[vec![-1.0, -2.0]]);

    let joined = join_area(&ya, &area, usa);
    assert_eq!(joined.ids, vec!["US-IA"]);
}
