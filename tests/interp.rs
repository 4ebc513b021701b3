use yieldcorr::math::interp::fill_gaps_linear;

#[test]
fn interior_gap_interpolates() {
    let mut v = vec![1.0, f64::NAN, 3.0];
    fill_gaps_linear(&mut v);
    assert!((v[1] - 2.0).abs() < 1e-12);
}

#[test]
fn boundary_gaps_extrapolate() {
    let mut v = vec![f64::NAN, 2.0, 4.0, f64::NAN];
    fill_gaps_linear(&mut v);
    // Slope 2 extended both ways.
    assert!((v[0] - 0.0).abs() < 1e-12);
    assert!((v[3] - 6.0).abs() < 1e-12);
}

#[test]
fn wide_gap_is_linear_between_anchors() {
    let mut v = vec![0.0, f64::NAN, f64::NAN, f64::NAN, 8.0];
    fill_gaps_linear(&mut v);
    assert!((v[1] - 2.0).abs() < 1e-12);
    assert!((v[2] - 4.0).abs() < 1e-12);
    assert!((v[3] - 6.0).abs() < 1e-12);
}

#[test]
fn single_anchor_fills_constant() {
    let mut v = vec![f64::NAN, 7.0, f64::NAN];
    fill_gaps_linear(&mut v);
    assert_eq!(v, vec![7.0, 7.0, 7.0]);
}

#[test]
fn no_anchor_untouched() {
    let mut v = vec![f64::NAN, f64::NAN];
    fill_gaps_linear(&mut v);
    assert!(v.iter().all(|x| x.is_nan()));
}
