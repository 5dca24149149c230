use itertools::{Itertools, MinMaxResult};

pub fn div_or_zero(lhs: f32, rhs: f32) -> f32 {
    if rhs == 0.0 {
        0.0
    } else {
        lhs / rhs
    }
}

/// Rescales values to `[0, 1]` with `(x - min) / (max - min)`.
/// A constant (or single valued) input maps to all zeros.
pub fn min_max_normalize(values: &[f32]) -> Vec<f32> {
    let (min, max) = match values.iter().copied().minmax() {
        MinMaxResult::NoElements => return Vec::new(),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let range = max - min;

    values
        .iter()
        .map(|&x| div_or_zero(x - min, range).clamp(0.0, 1.0))
        .collect()
}
