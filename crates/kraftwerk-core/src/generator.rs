//! The typed generator handle and its composition operators.
//!
//! A [`Generator<A>`] owns an immutable [`Instruction`] tree and records, in
//! its type, what the tree produces. Every operator here builds a new tree
//! around the existing one; nothing consumes randomness until the generator
//! is run by an interpreter.
//!
//! # Example
//!
//! ```
//! use kraftwerk_core::{int_between, list_of_n, boolean, Seed};
//!
//! let flags = int_between(1, 10)
//!     .unwrap()
//!     .flat_map(|n| list_of_n(n as usize, boolean()));
//!
//! let first = flags.run(Seed::new(42));
//! let again = flags.run(Seed::new(42));
//! assert_eq!(first, again);
//! assert!((1..=10).contains(&first.value.len()));
//! ```

use crate::instruction::{Instruction, Metadata};
use crate::interpreter::{Interpreter, StandardInterpreter, Traced, TracingInterpreter};
use crate::outcome::Outcome;
use crate::product::{tupled2, tupled3};
use crate::seed::Seed;
use crate::stream::GeneratedStream;
use crate::value::{erase, unerase};
use std::any::Any;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

/// Recipe producing values of type `A`.
///
/// Cloning is cheap: clones share the same instruction tree.
pub struct Generator<A> {
    instruction: Arc<Instruction>,
    _produces: PhantomData<fn() -> A>,
}

impl<A> Clone for Generator<A> {
    fn clone(&self) -> Self {
        Self {
            instruction: Arc::clone(&self.instruction),
            _produces: PhantomData,
        }
    }
}

impl<A> Debug for Generator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Generator").field(&self.instruction).finish()
    }
}

impl<A> Generator<A> {
    /// The caller guarantees that `instruction` produces a boxed `A`.
    pub(crate) fn from_instruction(instruction: Instruction) -> Self {
        Self::from_shared(Arc::new(instruction))
    }

    pub(crate) fn from_shared(instruction: Arc<Instruction>) -> Self {
        Self {
            instruction,
            _produces: PhantomData,
        }
    }

    pub fn instruction(&self) -> &Arc<Instruction> {
        &self.instruction
    }

    /// Label set by [`labeled`](Self::labeled), if any.
    pub fn label(&self) -> Option<&str> {
        self.instruction.label()
    }

    /// Application data of type `T` set by [`attach_data`](Self::attach_data).
    pub fn application_data<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.instruction
            .metadata()?
            .application_data()?
            .downcast_ref::<T>()
    }
}

impl<A: Debug + 'static> Generator<A> {
    pub fn map<B, F>(&self, f: F) -> Generator<B>
    where
        B: Debug + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        Generator::from_instruction(Instruction::Mapped {
            f: Arc::new(move |value| erase(f(unerase::<A>(value)))),
            operand: Arc::clone(&self.instruction),
        })
    }

    /// Run this generator, then the generator `f` builds from its value.
    pub fn flat_map<B, F>(&self, f: F) -> Generator<B>
    where
        B: Debug + 'static,
        F: Fn(A) -> Generator<B> + Send + Sync + 'static,
    {
        Generator::from_instruction(Instruction::FlatMapped {
            f: Arc::new(move |value| f(unerase::<A>(value)).instruction),
            operand: Arc::clone(&self.instruction),
        })
    }

    /// Replace the label, keeping any attached data.
    pub fn labeled(&self, label: impl Into<String>) -> Self {
        let metadata = self.current_metadata().with_label(label.into());
        self.with_metadata(metadata)
    }

    /// Replace the attached data, keeping any label.
    pub fn attach_data<T: Any + Send + Sync>(&self, data: T) -> Self {
        let metadata = self.current_metadata().with_application_data(Arc::new(data));
        self.with_metadata(metadata)
    }

    pub fn pair(&self) -> Generator<(A, A)> {
        tupled2(self.clone(), self.clone())
    }

    pub fn triple(&self) -> Generator<(A, A, A)> {
        tupled3(self.clone(), self.clone(), self.clone())
    }

    /// Run with default parameters.
    pub fn run(&self, seed: Seed) -> Outcome<A> {
        StandardInterpreter::default().run(self, seed)
    }

    /// Run with default parameters, recording a trace.
    pub fn run_traced(&self, seed: Seed) -> Outcome<Traced<A>> {
        TracingInterpreter::default().run(self, seed)
    }

    /// Infinite stream of values starting at `seed`.
    pub fn stream(&self, seed: Seed) -> GeneratedStream<A> {
        GeneratedStream::new(self.clone(), seed, StandardInterpreter::default())
    }

    fn current_metadata(&self) -> Metadata {
        self.instruction.metadata().cloned().unwrap_or_default()
    }

    fn with_metadata(&self, metadata: Metadata) -> Self {
        Self::from_instruction(Instruction::with_metadata(metadata, &self.instruction))
    }
}

/// Always `value`; consumes no randomness.
pub fn constant<A>(value: A) -> Generator<A>
where
    A: Clone + Debug + Send + Sync + 'static,
{
    Generator::from_instruction(Instruction::Constant(Arc::new(move || erase(value.clone()))))
}

/// Constant built on demand, for values that cannot be cloned.
pub(crate) fn constant_with<A, F>(make: F) -> Generator<A>
where
    A: Debug + 'static,
    F: Fn() -> A + Send + Sync + 'static,
{
    Generator::from_instruction(Instruction::Constant(Arc::new(move || erase(make()))))
}

/// Resolve a size from the active size selector, then run the generator
/// `f` builds for it.
///
/// `f` must return structurally identical generators for equal sizes.
pub fn sized<A, F>(f: F) -> Generator<A>
where
    A: Debug + 'static,
    F: Fn(usize) -> Generator<A> + Send + Sync + 'static,
{
    Generator::from_instruction(Instruction::Sized(Arc::new(move |size| f(size).instruction)))
}
