//! Flex distribution of sizes toward a target total.

use listflex_config::FlexRatios;

use crate::rounding::round_allocation;

/// Grow or shrink `sizes` so they sum to `target`, then round to whole pixels.
///
/// Growth hands out the free space in proportion to the grow ratios, or
/// equally when no item can grow. Shrinking takes space away in proportion to
/// `size * shrink`; an item whose product is zero is weighted by its size
/// alone. Items that would shrink below zero are clamped there and the rest
/// of the deficit is taken from the others.
pub fn distribute(sizes: &[f64], ratios: &[FlexRatios], target: i64) -> Vec<i64> {
    debug_assert_eq!(sizes.len(), ratios.len());
    if sizes.is_empty() {
        return Vec::new();
    }
    if target <= 0 {
        return vec![0; sizes.len()];
    }

    let available = target as f64 - sizes.iter().sum::<f64>();
    let flexed = if available > 0.0 {
        grow(sizes, ratios, available)
    } else {
        shrink(sizes, ratios, -available)
    };

    round_allocation(&flexed, target)
}

fn grow(sizes: &[f64], ratios: &[FlexRatios], extra: f64) -> Vec<f64> {
    let total: f64 = ratios.iter().map(|r| r.grow).sum();
    if total > 0.0 {
        sizes
            .iter()
            .zip(ratios)
            .map(|(size, r)| size + extra * r.grow / total)
            .collect()
    } else {
        let share = extra / sizes.len() as f64;
        sizes.iter().map(|size| size + share).collect()
    }
}

fn shrink(sizes: &[f64], ratios: &[FlexRatios], deficit: f64) -> Vec<f64> {
    let weights: Vec<f64> = sizes
        .iter()
        .zip(ratios)
        .map(|(size, r)| {
            let weight = size * r.shrink;
            if weight > 0.0 { weight } else { *size }
        })
        .collect();

    let mut result = sizes.to_vec();
    let mut frozen = vec![false; sizes.len()];
    let mut remaining = deficit;

    while remaining > 0.0 {
        let total: f64 = weights
            .iter()
            .zip(&frozen)
            .filter(|(_, f)| !**f)
            .map(|(w, _)| w)
            .sum();
        if total <= 0.0 {
            break;
        }

        let cuts: Vec<f64> = weights.iter().map(|w| remaining * w / total).collect();
        let overdrawn: Vec<usize> = (0..result.len())
            .filter(|&i| !frozen[i] && cuts[i] > result[i])
            .collect();

        if overdrawn.is_empty() {
            for i in 0..result.len() {
                if !frozen[i] {
                    result[i] -= cuts[i];
                }
            }
            break;
        }

        for i in overdrawn {
            remaining -= result[i];
            result[i] = 0.0;
            frozen[i] = true;
        }
    }

    result
}
