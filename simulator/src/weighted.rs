//! Stateless random selection helpers.
//!
//! The random source is always passed in so callers (and tests) control
//! seeding.

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one item by cumulative-weight inversion.
///
/// `[0, total)` is split into contiguous bands, one per item in order; a
/// uniform draw selects the first band whose upper bound exceeds it. Returns
/// `None` only when `items` is empty. Missing weights count as zero and the
/// last positively weighted item absorbs floating-point slack at the top of
/// the range.
pub fn weighted_choice<'a, T, R>(items: &'a [T], weights: &[f64], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return None;
    }

    let mut cumulative = Vec::with_capacity(items.len());
    let mut total = 0.0;
    for i in 0..items.len() {
        total += weights.get(i).copied().unwrap_or(0.0);
        cumulative.push(total);
    }

    let draw = rng.gen::<f64>() * total;
    let index = cumulative
        .iter()
        .position(|&upper| draw < upper)
        .or_else(|| {
            (0..items.len()).rev().find(|&i| weights.get(i).is_some_and(|w| *w > 0.0))
        })
        .unwrap_or(items.len() - 1);
    items.get(index)
}

/// Pick one item uniformly. `None` when `items` is empty.
pub fn uniform_choice<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    items.choose(rng)
}
