use yieldcorr::math::savgol::{SavitzkyGolay, Smoother, central_weights, polyfit, polyval};

#[test]
fn classical_quadratic_weights() {
    // Degree 2, window 7: (-2, 3, 6, 7, 6, 3, -2) / 21.
    let w = central_weights(7, 2).unwrap();
    let expected = [-2.0, 3.0, 6.0, 7.0, 6.0, 3.0, -2.0].map(|x: f64| x / 21.0);
    for (got, want) in w.iter().zip(expected) {
        assert!((got - want).abs() < 1e-10, "got {:?}", w);
    }
}

#[test]
fn constant_series_unchanged() {
    let series = vec![5.0; 10];
    let out = SavitzkyGolay.smooth(&series, 7, 2).unwrap();
    for v in out {
        assert!((v - 5.0).abs() < 1e-10);
    }
}

#[test]
fn quadratic_series_reproduced_exactly() {
    // A degree-2 fit reproduces a quadratic everywhere, boundaries
    // included.
    let series: Vec<f64> = (0..15).map(|i| {
        let x = i as f64;
        0.5 * x * x - 3.0 * x + 2.0
    }).collect();
    let out = SavitzkyGolay.smooth(&series, 7, 2).unwrap();
    for (got, want) in out.iter().zip(&series) {
        assert!((got - want).abs() < 1e-8);
    }
}

#[test]
fn rejects_even_window_and_nan() {
    assert!(SavitzkyGolay.smooth(&[1.0; 10], 6, 2).is_err());
    let mut v = vec![1.0; 10];
    v[4] = f64::NAN;
    assert!(SavitzkyGolay.smooth(&v, 7, 2).is_err());
}

#[test]
fn rejects_short_series() {
    assert!(SavitzkyGolay.smooth(&[1.0; 5], 7, 2).is_err());
}

#[test]
fn polyfit_recovers_line() {
    let xs = [0.0, 1.0, 2.0, 3.0];
    let ys = [1.0, 3.0, 5.0, 7.0];
    let c = polyfit(&xs, &ys, 1).unwrap();
    assert!((c[0] - 1.0).abs() < 1e-10);
    assert!((c[1] - 2.0).abs() < 1e-10);
    assert!((polyval(&c, 10.0) - 21.0).abs() < 1e-10);
}
