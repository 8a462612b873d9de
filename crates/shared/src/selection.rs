//! Uniform random selection from content pools.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Returned when selecting from an empty pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot pick from an empty pool")]
pub struct EmptyPoolError;

/// Picks one element uniformly at random.
///
/// The randomness source is injected so callers can seed it in tests.
pub fn pick_one<'a, T, R>(items: &'a [T], rng: &mut R) -> Result<&'a T, EmptyPoolError>
where
    R: Rng + ?Sized,
{
    items.choose(rng).ok_or(EmptyPoolError)
}
