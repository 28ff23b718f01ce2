//! Largest-remainder rounding.

/// Round fractional sizes to integers that sum to `target`.
///
/// Every value is floored, then the shortfall is handed out one unit at a time
/// to the values with the largest fractional remainders. Ties keep their input
/// order. `values` is expected to sum to `target`; each output differs from
/// the floor of its input by at most one.
pub fn round_allocation(values: &[f64], target: i64) -> Vec<i64> {
    let mut result: Vec<i64> = values
        .iter()
        .map(|v| if v.is_finite() { v.floor() as i64 } else { 0 })
        .collect();

    let floored: i64 = result.iter().sum();
    let shortfall = (target - floored).clamp(0, values.len() as i64) as usize;
    if shortfall == 0 {
        return result;
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| remainder(values[b]).total_cmp(&remainder(values[a])));

    for &i in order.iter().take(shortfall) {
        result[i] += 1;
    }

    result
}

fn remainder(value: f64) -> f64 {
    if value.is_finite() {
        value - value.floor()
    } else {
        0.0
    }
}
