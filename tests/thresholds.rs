use yieldcorr::config::{DEFAULT_TH_SWA, DEFAULT_TH_YA, ThresholdSpec};

#[test]
fn list_form_parses() {
    let values = ThresholdSpec::parse_expand("0,-0.3,-0.5").unwrap();
    assert_eq!(values, vec![0.0, -0.3, -0.5]);
}

#[test]
fn range_form_is_end_inclusive() {
    let values = ThresholdSpec::parse_expand("(0,1,0.25)").unwrap();
    assert_eq!(values.len(), 5);
    assert!((values[4] - 1.0).abs() < 1e-12);
}

#[test]
fn default_axes_expand() {
    let swa = ThresholdSpec::parse_expand(DEFAULT_TH_SWA).unwrap();
    assert_eq!(swa.len(), 21);
    assert!((swa[0] - 0.0).abs() < 1e-12);
    assert!((swa[20] - 1.0).abs() < 1e-12);

    let ya = ThresholdSpec::parse_expand(DEFAULT_TH_YA).unwrap();
    assert_eq!(ya.len(), 6);
    assert!(ya.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn descending_range_expands() {
    let values = ThresholdSpec::parse_expand("(0,-1,-0.5)").unwrap();
    assert_eq!(values, vec![0.0, -0.5, -1.0]);
}

#[test]
fn invalid_specs_rejected() {
    assert!(ThresholdSpec::parse_expand("").is_err());
    assert!(ThresholdSpec::parse_expand("0,,1").is_err());
    assert!(ThresholdSpec::parse_expand("0,abc").is_err());
    assert!(ThresholdSpec::parse_expand("(0,1)").is_err());
    assert!(ThresholdSpec::parse_expand("(0,1,0)").is_err());
    // Step pointing away from the end.
    assert!(ThresholdSpec::parse_expand("(0,1,-0.5)").is_err());
    // Not monotonic.
    assert!(ThresholdSpec::parse_expand("0,1,0.5").is_err());
}
