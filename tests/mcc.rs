use ndarray::{Array2, arr2};
use yieldcorr::corr::mcc::{mcc, mcc_from_counts};
use yieldcorr::corr::sweep::{CubeProvenance, threshold_sweep};
use yieldcorr::corr::{AlignedSeries, align};
use yieldcorr::series::WideTable;

fn provenance() -> CubeProvenance {
    CubeProvenance {
        drought_threshold: -0.67,
        period_aggregation: "6_months-APR_SEP".to_string(),
    }
}

#[test]
fn perfect_agreement_is_one() {
    let a = [true, false, true, false];
    let b = a;
    assert!((mcc(a, b) - 1.0).abs() < 1e-12);
}

#[test]
fn perfect_disagreement_is_minus_one() {
    let a = [true, false, true];
    let b = [false, true, false];
    assert!((mcc(a, b) + 1.0).abs() < 1e-12);
}

#[test]
fn constant_sequence_is_zero() {
    assert_eq!(mcc([true, true, true], [true, false, true]), 0.0);
    assert_eq!(mcc([false, false], [false, false]), 0.0);
}

#[test]
fn counts_within_bounds() {
    for tp in 0..4u64 {
        for tn in 0..4u64 {
            for fp in 0..4u64 {
                for fne in 0..4u64 {
                    let v = mcc_from_counts(tp, tn, fp, fne);
                    assert!((-1.0..=1.0).contains(&v), "{} {} {} {}", tp, tn, fp, fne);
                }
            }
        }
    }
}

#[test]
fn sweep_known_cube() {
    let aligned = AlignedSeries {
        years: vec![2000, 2001, 2002],
        regions: vec!["FR2".to_string()],
        swa: arr2(&[[0.3], [0.6], [0.9]]),
        ya: arr2(&[[-0.1], [-0.8], [-0.9]]),
    };
    let cube = threshold_sweep(&aligned, &[0.5, 0.8], &[-0.5, -0.7], provenance(), None);

    assert_eq!(cube.shape(), (2, 2, 1));
    // swa >= 0.5 matches ya <= -0.5 exactly; swa >= 0.8 misses one event.
    assert!((cube.mcc[(0, 0, 0)] - 1.0).abs() < 1e-12);
    assert!((cube.mcc[(0, 1, 0)] - 1.0).abs() < 1e-12);
    assert!((cube.mcc[(1, 0, 0)] - 0.5).abs() < 1e-12);
    assert!((cube.mcc[(1, 1, 0)] - 0.5).abs() < 1e-12);

    let max = cube.max_cell().unwrap();
    assert!((max.mcc - 1.0).abs() < 1e-12);
    assert_eq!(max.region, "FR2");
    assert!((max.th_swa - 0.5).abs() < 1e-12);
}

#[test]
fn nan_binarizes_to_non_event() {
    let aligned = AlignedSeries {
        years: vec![2000, 2001, 2002, 2003],
        regions: vec!["R".to_string()],
        swa: arr2(&[[f64::NAN], [0.9], [0.1], [0.9]]),
        ya: arr2(&[[-0.9], [-0.9], [f64::NAN], [-0.1]]),
    };
    let cube = threshold_sweep(&aligned, &[0.5], &[-0.5], provenance(), None);
    // Events: swa [F,T,F,T], ya [T,T,F,F] -> tp=1 tn=1 fp=1 fn=1.
    assert_eq!(cube.mcc[(0, 0, 0)], 0.0);
}

#[test]
fn sweep_reports_progress() {
    let aligned = AlignedSeries {
        years: vec![2000, 2001],
        regions: vec!["R".to_string()],
        swa: arr2(&[[0.1], [0.9]]),
        ya: arr2(&[[-0.9], [-0.1]]),
    };
    let seen = std::sync::atomic::AtomicUsize::new(0);
    let progress = |_done: usize, total: usize| {
        assert_eq!(total, 6);
        seen.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    };
    threshold_sweep(
        &aligned,
        &[0.2, 0.5, 0.8],
        &[-0.3, -0.6],
        provenance(),
        Some(&progress),
    );
    assert_eq!(seen.load(std::sync::atomic::Ordering::Relaxed), 6);
}

#[test]
fn event_counts_monotonic_in_threshold() {
    let swa = [0.05, 0.2, 0.45, 0.6, 0.85, f64::NAN];
    let ya = [-1.2, -0.6, -0.4, -0.1, 0.3, f64::NAN];

    // Raising the SWA cutoff only removes drought events; raising the
    // (negative) YA cutoff only adds anomalous-yield events.
    let mut prev = usize::MAX;
    for th in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let count = swa.iter().filter(|v| **v >= th).count();
        assert!(count <= prev);
        prev = count;
    }
    let mut prev = 0;
    for th in [-1.5, -1.0, -0.5, 0.0] {
        let count = ya.iter().filter(|v| **v <= th).count();
        assert!(count >= prev);
        prev = count;
    }
}

#[test]
fn align_intersects_axes() {
    let swa = WideTable {
        columns: vec!["B".to_string(), "A".to_string(), "C".to_string()],
        years: vec![2000, 2001, 2002],
        values: Array2::from_shape_vec(
            (3, 3),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        )
        .unwrap(),
    };
    let ya = WideTable {
        columns: vec!["A".to_string(), "B".to_string()],
        years: vec![2001, 2002, 2003],
        values: Array2::from_shape_vec((3, 2), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap(),
    };

    let aligned = align(&swa, &ya).unwrap();
    assert_eq!(aligned.regions, vec!["A", "B"]);
    assert_eq!(aligned.years, vec![2001, 2002]);
    // Year 2001, region A: swa column index 1, ya column index 0.
    assert!((aligned.swa[(0, 0)] - 5.0).abs() < 1e-12);
    assert!((aligned.ya[(0, 0)] - 0.1).abs() < 1e-12);
}

#[test]
fn align_rejects_disjoint_regions() {
    let swa = WideTable {
        columns: vec!["A".to_string()],
        years: vec![2000],
        values: arr2(&[[1.0]]),
    };
    let ya = WideTable {
        columns: vec!["B".to_string()],
        years: vec![2000],
        values: arr2(&[[1.0]]),
    };
    assert!(align(&swa, &ya).is_err());
}
