//! The universal step output: a produced value paired with the seed that follows it.

use crate::seed::Seed;

/// A value produced from a seed, together with the seed to continue from.
///
/// Every draw, size selection and interpretation returns an `Outcome`.
/// Outcomes are never mutated in place; threading the `next_seed` into the
/// next step is what keeps generation replayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome<A> {
    /// Seed to use for the next step
    pub next_seed: Seed,
    /// Produced value
    pub value: A,
}

impl<A> Outcome<A> {
    /// Create a new outcome.
    pub fn new(next_seed: Seed, value: A) -> Self {
        Self { next_seed, value }
    }

    /// Transform the value, keeping the seed.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Outcome<B> {
        Outcome {
            next_seed: self.next_seed,
            value: f(self.value),
        }
    }

    /// Split into `(next_seed, value)`.
    pub fn into_parts(self) -> (Seed, A) {
        (self.next_seed, self.value)
    }
}
