//! Commonness-weighted selection.
//!
//! - [pick_weighted_random]: draws proportionally to each candidate's weight.
//! - [select_by_roll]: the deterministic core, mapping a roll in `[0, total)` to the
//!   candidate whose cumulative interval contains it.
//!
//! Candidates with a non-positive weight never win. A pool whose total weight is zero
//! yields `None` without consuming randomness.
use rand::RngCore;

use crate::random::rand01;

pub fn pick_weighted_random<'a, T>(
    candidates: &'a [T],
    weight: impl Fn(&T) -> f32,
    rng: &mut dyn RngCore,
) -> Option<&'a T> {
    let total: f32 = candidates.iter().map(|c| weight(c).max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let roll = rand01(rng) * total;
    select_by_roll(candidates, weight, roll)
}

pub fn select_by_roll<'a, T>(
    candidates: &'a [T],
    weight: impl Fn(&T) -> f32,
    roll: f32,
) -> Option<&'a T> {
    let mut upper = 0.0;
    let mut last_positive = None;
    for c in candidates {
        let w = weight(c);
        if w <= 0.0 {
            continue;
        }
        upper += w;
        last_positive = Some(c);
        if roll < upper {
            return Some(c);
        }
    }
    // Float accumulation can leave a roll just above the final bound.
    last_positive
}
