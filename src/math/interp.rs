//! Linear gap filling over a 1-D series with NaN gaps.

/// Fill NaN gaps by linear interpolation between the nearest defined
/// samples; beyond the outermost anchors the boundary segment is
/// extended linearly. With a single anchor the series becomes constant;
/// with none it is left untouched.
pub fn fill_gaps_linear(series: &mut [f64]) {
    let anchors: Vec<usize> = series
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, _)| i)
        .collect();

    match anchors.len() {
        0 => return,
        1 => {
            let fill = series[anchors[0]];
            for v in series.iter_mut() {
                *v = fill;
            }
            return;
        }
        _ => {}
    }

    for i in 0..series.len() {
        if !series[i].is_nan() {
            continue;
        }
        // Segment used for this position: interior gaps interpolate
        // between the surrounding anchors, boundary gaps extrapolate
        // from the first or last anchor pair.
        let (a, b) = match anchors.binary_search(&i) {
            Err(0) => (anchors[0], anchors[1]),
            Err(pos) if pos == anchors.len() => (anchors[pos - 2], anchors[pos - 1]),
            Err(pos) => (anchors[pos - 1], anchors[pos]),
            Ok(_) => unreachable!("anchor positions are defined"),
        };
        let x0 = a as f64;
        let x1 = b as f64;
        let t = (i as f64 - x0) / (x1 - x0);
        series[i] = series[a] + t * (series[b] - series[a]);
    }
}
