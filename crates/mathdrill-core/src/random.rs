//! Random source construction and the draws suppliers make.
//!
//! Suppliers never own a generator; they receive `&mut dyn RngCore` per
//! call. Production code builds one with [`create_rng`]`(None)`, tests pass
//! a fixed seed to get reproducible problems.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create the generator used for a session.
///
/// With a seed the sequence is deterministic across platforms; without one
/// the generator is seeded from the thread-local entropy source.
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Uniform integer in `low..=high`. Bounds may be given in either order.
pub fn int_inclusive(rng: &mut dyn RngCore, low: i64, high: i64) -> i64 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    rng.random_range(low..=high)
}

/// Uniform integer with between `low_digits` and `high_digits` decimal digits.
///
/// The digit count is chosen first, so short numbers are as likely as long
/// ones.
pub fn int_with_digits(rng: &mut dyn RngCore, low_digits: u32, high_digits: u32) -> i64 {
    let digits = rng.random_range(low_digits.max(1)..=high_digits.max(low_digits.max(1)));
    let floor = if digits == 1 { 0 } else { 10i64.pow(digits - 1) };
    let ceiling = 10i64.pow(digits) - 1;
    rng.random_range(floor..=ceiling)
}

/// Fair coin flip.
pub fn coin(rng: &mut dyn RngCore) -> bool {
    rng.random_bool(0.5)
}

/// Return the pair in random order.
pub fn shuffled<T>(rng: &mut dyn RngCore, a: T, b: T) -> [T; 2] {
    if coin(rng) {
        [a, b]
    } else {
        [b, a]
    }
}

/// Uniform index into a collection of `len` items. `len` must be non-zero.
pub fn index(rng: &mut dyn RngCore, len: usize) -> usize {
    rng.random_range(0..len)
}
