//! Synthetic trend series used as illustrative chart background.
//!
//! A mean-reverting (Ornstein-Uhlenbeck style) walk drawn from a
//! seeded generator. The draw contract is part of the determinism
//! guarantee: exactly `n` standard-normal draws, one per step, in step
//! order, from the generator the caller passes in.

use rand::Rng as _;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::error::{PatternError, PatternResult};

const THETA: f64 = 0.1;
const SIGMA: f64 = 0.22;

/// Generates `n` values and min-max normalizes them into
/// `[0.15 * height, 0.85 * height]`.
///
/// `bias` tilts the mean-reversion target; selecting it from the
/// pattern name is caller policy (see [`crate::scene::trend_bias`]).
///
/// A degenerate all-equal walk normalizes to the constant midpoint
/// `0.5 * height` instead of dividing by zero.
pub fn synth_series(
    rng: &mut StdRng,
    n: usize,
    height: f64,
    bias: f64,
) -> PatternResult<Vec<f64>> {
    if n == 0 {
        return Err(PatternError::validation("series length must be >= 1"));
    }
    if !height.is_finite() || height <= 0.0 {
        return Err(PatternError::validation("series height must be > 0"));
    }

    let mu = bias;
    let mut x = 0.0f64;
    let mut raw = Vec::with_capacity(n);
    for _ in 0..n {
        let z: f64 = rng.sample(StandardNormal);
        x += THETA * (mu - x) + SIGMA * z;
        raw.push(x);
    }

    let mut mn = f64::INFINITY;
    let mut mx = f64::NEG_INFINITY;
    for &v in &raw {
        mn = mn.min(v);
        mx = mx.max(v);
    }

    let span = mx - mn;
    let out = if span == 0.0 {
        vec![0.5 * height; n]
    } else {
        raw.iter()
            .map(|v| (0.15 + 0.7 * (v - mn) / span) * height)
            .collect()
    };
    Ok(out)
}
