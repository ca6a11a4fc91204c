//! Bounded inclusive random integers
//!
//! All randomness in the sim flows through a seeded `Pcg32` owned by
//! `GameState`, so a logged seed reproduces a run exactly.

use rand::Rng;

/// Uniform integer in the closed interval `[ceil(min), floor(max)]`.
///
/// `min == max` returns that value. `max < min` after rounding is a caller
/// contract violation, not a recoverable error.
pub fn random_int_inclusive(rng: &mut impl Rng, min: f32, max: f32) -> i32 {
    let lo = min.ceil() as i32;
    let hi = max.floor() as i32;
    debug_assert!(lo <= hi, "inverted range [{lo}, {hi}]");
    rng.random_range(lo..=hi)
}
