//! Weighted choice between generators.

use crate::error::ConfigError;
use crate::generator::Generator;
use crate::instruction::{Choice, Instruction};
use std::fmt::{self, Debug};

/// One weighted alternative.
pub struct FrequencyEntry<A> {
    pub weight: u32,
    pub generator: Generator<A>,
}

impl<A> FrequencyEntry<A> {
    pub fn new(weight: u32, generator: Generator<A>) -> Self {
        Self { weight, generator }
    }
}

impl<A> Clone for FrequencyEntry<A> {
    fn clone(&self) -> Self {
        Self {
            weight: self.weight,
            generator: self.generator.clone(),
        }
    }
}

impl<A> Debug for FrequencyEntry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyEntry")
            .field("weight", &self.weight)
            .field("generator", &self.generator)
            .finish()
    }
}

/// Ordered alternatives with a precomputed cumulative-weight table.
///
/// Zero weights are legal and make an entry unreachable, but at least one
/// weight must be positive and the total must fit in an `i32`.
pub struct FrequencyMap<A> {
    entries: Vec<FrequencyEntry<A>>,
    cumulative: Vec<i32>,
}

impl<A: Debug + 'static> FrequencyMap<A> {
    pub fn new(
        entries: impl IntoIterator<Item = (u32, Generator<A>)>,
    ) -> Result<Self, ConfigError> {
        let entries: Vec<FrequencyEntry<A>> = entries
            .into_iter()
            .map(|(weight, generator)| FrequencyEntry { weight, generator })
            .collect();
        let cumulative = cumulative_weights(entries.iter().map(|entry| entry.weight))?;
        Ok(Self {
            entries,
            cumulative,
        })
    }

    /// Append an alternative after the existing ones.
    pub fn add(self, weight: u32, generator: Generator<A>) -> Result<Self, ConfigError> {
        let mut entries = self.into_pairs();
        entries.push((weight, generator));
        Self::new(entries)
    }

    /// All alternatives of `self` followed by those of `other`.
    pub fn combine(self, other: FrequencyMap<A>) -> Result<Self, ConfigError> {
        let mut entries = self.into_pairs();
        entries.extend(other.into_pairs());
        Self::new(entries)
    }

    pub fn entries(&self) -> &[FrequencyEntry<A>] {
        &self.entries
    }

    pub fn total_weight(&self) -> i32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn to_generator(&self) -> Generator<A> {
        let alternatives = self
            .entries
            .iter()
            .map(|entry| entry.generator.instruction().clone())
            .collect();
        Generator::from_instruction(Instruction::Choice(Choice::new(
            self.cumulative.clone(),
            alternatives,
        )))
    }

    fn into_pairs(self) -> Vec<(u32, Generator<A>)> {
        self.entries
            .into_iter()
            .map(|entry| (entry.weight, entry.generator))
            .collect()
    }
}

impl<A> Clone for FrequencyMap<A> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            cumulative: self.cumulative.clone(),
        }
    }
}

impl<A> Debug for FrequencyMap<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyMap")
            .field("entries", &self.entries)
            .field("cumulative", &self.cumulative)
            .finish()
    }
}

/// Weighted choice between `(weight, generator)` pairs.
pub fn frequency<A: Debug + 'static>(
    entries: impl IntoIterator<Item = (u32, Generator<A>)>,
) -> Result<Generator<A>, ConfigError> {
    Ok(FrequencyMap::new(entries)?.to_generator())
}

/// Choice between two alternatives whose weights are compile-time constants.
pub(crate) fn fixed_pair<A: Debug + 'static>(
    first_weight: u16,
    first: Generator<A>,
    second_weight: u16,
    second: Generator<A>,
) -> Generator<A> {
    let first_weight = first_weight as i32;
    let cumulative = vec![first_weight, first_weight + second_weight as i32];
    Generator::from_instruction(Instruction::Choice(Choice::new(
        cumulative,
        vec![first.instruction().clone(), second.instruction().clone()],
    )))
}

fn cumulative_weights(weights: impl Iterator<Item = u32>) -> Result<Vec<i32>, ConfigError> {
    let mut total: i64 = 0;
    let mut cumulative = Vec::new();
    for weight in weights {
        total += weight as i64;
        let boundary = i32::try_from(total).map_err(|_| ConfigError::WeightOverflow)?;
        cumulative.push(boundary);
    }
    match cumulative.last() {
        None => Err(ConfigError::EmptyChoice),
        Some(0) => Err(ConfigError::NoPositiveWeight),
        Some(_) => Ok(cumulative),
    }
}
