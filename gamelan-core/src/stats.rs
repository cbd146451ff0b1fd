//! Small descriptive statistics over frequency slices.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`), `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values
        .iter()
        .map(|&v| (v - avg) * (v - avg))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Rounds to two decimal places. A scaled value that is exactly a half goes
/// to the even neighbour (`0.125 -> 0.12`), as numpy's `round` does.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
