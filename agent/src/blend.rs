use common::min_max_normalize;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Mixes heuristic scores with learned values into a sampling distribution over the same actions.
///
/// Both signals are min-max normalized, combined as `alpha * heuristic + (1 - alpha) * learned`,
/// shifted so the smallest is zero and divided by their sum. When nothing remains after the shift
/// the distribution is uniform.
///
/// Both slices hold one entry per action and must have the same length. Entries beyond the
/// shorter slice are ignored.
pub fn blend(heuristic_scores: &[f32], learned_values: &[f32], alpha: f32) -> Vec<f32> {
    debug_assert_eq!(
        heuristic_scores.len(),
        learned_values.len(),
        "Each action requires both a heuristic score and a learned value"
    );

    let num_actions = heuristic_scores.len().min(learned_values.len());
    if num_actions == 0 {
        return Vec::new();
    }

    let heuristic = min_max_normalize(&heuristic_scores[..num_actions]);
    let learned = min_max_normalize(&learned_values[..num_actions]);

    let combined = heuristic
        .iter()
        .zip(learned.iter())
        .map(|(h, l)| alpha * h + (1.0 - alpha) * l)
        .collect::<Vec<_>>();

    let min = combined.iter().copied().fold(f32::INFINITY, f32::min);
    let shifted = combined.iter().map(|c| c - min).collect::<Vec<_>>();
    let sum = shifted.iter().sum::<f32>();

    if !sum.is_finite() || sum <= 0.0 {
        return vec![1.0 / num_actions as f32; num_actions];
    }

    shifted.iter().map(|s| s / sum).collect()
}

/// Draws an index weighted by `distribution`. Falls back to a uniform draw if the weights are
/// unusable and returns `None` only for an empty distribution.
pub fn sample<R: Rng + ?Sized>(distribution: &[f32], rng: &mut R) -> Option<usize> {
    if distribution.is_empty() {
        return None;
    }

    match WeightedIndex::new(distribution) {
        Ok(weighted) => Some(weighted.sample(rng)),
        Err(_) => Some(rng.gen_range(0..distribution.len())),
    }
}
