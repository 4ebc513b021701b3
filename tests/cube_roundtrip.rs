#![cfg(feature = "hdf5")]

use ndarray::Array3;
use tempfile::TempDir;
use yieldcorr::corr::sweep::{CorrelationCube, CubeProvenance};
use yieldcorr::io::cube_store;

#[test]
fn hdf5_cube_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("mcc_results.h5");

    let cube = CorrelationCube {
        th_swa: vec![0.0, 0.5, 1.0],
        th_ya: vec![-0.5, -1.0],
        regions: vec!["FR2".to_string(), "US-IA".to_string()],
        mcc: Array3::from_shape_fn((3, 2, 2), |(i, j, k)| (i as f64) - (j as f64) * 0.5 + k as f64 * 0.25),
        provenance: CubeProvenance {
            drought_threshold: -0.67,
            period_aggregation: "6_months-APR_SEP".to_string(),
        },
    };
    cube_store::write_cube(&path, &cube).unwrap();

    let back = cube_store::read_cube(&path).unwrap();
    assert_eq!(back.th_swa, cube.th_swa);
    assert_eq!(back.th_ya, cube.th_ya);
    assert_eq!(back.regions, cube.regions);
    assert_eq!(back.mcc, cube.mcc);
    assert_eq!(back.provenance, cube.provenance);
}
