//! Matthews Correlation Coefficient over binary event sequences.

/// MCC of two equal-length binary sequences. When either sequence is
/// constant the confusion-matrix denominator vanishes; that degenerate
/// case is defined as 0.0 (no measurable association), never an error.
pub fn mcc<I, J>(a: I, b: J) -> f64
where
    I: IntoIterator<Item = bool>,
    J: IntoIterator<Item = bool>,
{
    let mut tp = 0u64;
    let mut tn = 0u64;
    let mut fp = 0u64;
    let mut fne = 0u64;
    for (x, y) in a.into_iter().zip(b) {
        match (x, y) {
            (true, true) => tp += 1,
            (false, false) => tn += 1,
            (true, false) => fp += 1,
            (false, true) => fne += 1,
        }
    }
    mcc_from_counts(tp, tn, fp, fne)
}

pub fn mcc_from_counts(tp: u64, tn: u64, fp: u64, fne: u64) -> f64 {
    let tp = tp as f64;
    let tn = tn as f64;
    let fp = fp as f64;
    let fne = fne as f64;
    let denom = ((tp + fp) * (tp + fne) * (tn + fp) * (tn + fne)).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (tp * tn - fp * fne) / denom
}
