//! Numeric value generators.

use rand::Rng;

/// Generate a random integer in the given range (inclusive).
///
/// Integer-uniform, so the range ends are as likely as any other value.
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    rng.gen_range(min..=max)
}
