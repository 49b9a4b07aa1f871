//! Pull-based, seed-evolving streams of generated values.

use crate::generator::Generator;
use crate::interpreter::{Interpreter, StandardInterpreter, TracingInterpreter};
use crate::seed::Seed;
use std::fmt::Debug;
use tracing::debug;

/// Infinite sequence of values from one generator.
///
/// Each pull runs the generator once against the current seed and replaces
/// the seed with the returned next seed. A stream owns its seed; to generate
/// in parallel, split a seed with [`Seed::split_n`] and give each worker its
/// own stream.
#[derive(Debug, Clone)]
pub struct GeneratedStream<A, I = StandardInterpreter> {
    generator: Generator<A>,
    seed: Seed,
    interpreter: I,
}

impl<A, I> GeneratedStream<A, I>
where
    A: Debug + 'static,
    I: Interpreter,
{
    pub fn new(generator: Generator<A>, seed: Seed, interpreter: I) -> Self {
        Self {
            generator,
            seed,
            interpreter,
        }
    }

    /// The seed the next pull will start from.
    pub fn current_seed(&self) -> Seed {
        self.seed
    }

    /// Same generator and position, different interpreter.
    pub fn with_interpreter<J: Interpreter>(self, interpreter: J) -> GeneratedStream<A, J> {
        GeneratedStream {
            generator: self.generator,
            seed: self.seed,
            interpreter,
        }
    }

    /// Pull the next `count` values.
    pub fn next_n(&mut self, count: usize) -> Vec<I::Output<A>> {
        debug!(count, seed = self.seed.seed_value(), "pulling values");
        self.by_ref().take(count).collect()
    }
}

impl<A, I> Iterator for GeneratedStream<A, I>
where
    A: Debug + 'static,
    I: Interpreter,
{
    type Item = I::Output<A>;

    fn next(&mut self) -> Option<Self::Item> {
        let (next_seed, value) = self.interpreter.run(&self.generator, self.seed).into_parts();
        self.seed = next_seed;
        Some(value)
    }
}

/// Stream of plain values with default parameters.
pub fn stream_from<A: Debug + 'static>(generator: &Generator<A>, seed: Seed) -> GeneratedStream<A> {
    GeneratedStream::new(generator.clone(), seed, StandardInterpreter::default())
}

/// Stream of traced values with default parameters.
pub fn traced_stream_from<A: Debug + 'static>(
    generator: &Generator<A>,
    seed: Seed,
) -> GeneratedStream<A, TracingInterpreter> {
    GeneratedStream::new(generator.clone(), seed, TracingInterpreter::default())
}
