//! Composable, deterministic random value generators.
//!
//! A [`Generator<A>`] is an immutable recipe for producing values of type
//! `A`. Generators compose with `map`, `flat_map`, tuples, weighted choice
//! and collections, and only produce values when an interpreter runs them
//! against a [`Seed`]. The same generator run against the same seed always
//! produces the same value and the same next seed.
//!
//! # Architecture
//!
//! ```text
//! Generator<A> (typed façade)
//!        │
//!        ▼
//!   Instruction tree ──────────────┐
//!        │                         │
//!        ▼                         ▼
//! ┌──────────────────┐   ┌──────────────────┐
//! │ StandardInterp.  │   │ TracingInterp.   │
//! │  - Parameters    │   │  - Parameters    │
//! │    size selector │   │  - TraceRecorder │
//! │    bias settings │   │                  │
//! └────────┬─────────┘   └────────┬─────────┘
//!          ▼                      ▼
//!   Outcome<A> { next_seed, value }   Outcome<Traced<A>>
//! ```
//!
//! # Example
//!
//! ```rust
//! use kraftwerk_core::{int_between, list, tupled, Seed, TracePrinter};
//!
//! let point = tupled!(int_between(0, 9).unwrap(), int_between(0, 9).unwrap());
//! let path = list(point).labeled("path");
//!
//! let outcome = path.run(Seed::new(42));
//! assert_eq!(outcome.value, path.run(Seed::new(42)).value);
//!
//! let traced = path.run_traced(Seed::new(42));
//! for line in TracePrinter::new().render(&traced.value.trace) {
//!     println!("{line}");
//! }
//! ```
//!
//! # Modules
//!
//! - `seed` - the 48-bit PRNG state and its draws
//! - `size` - size selection strategies for variable-length values
//! - `bias` - edge-case injection per value domain
//! - `frequency` - weighted choice
//! - `instruction` - the closed instruction enum
//! - `primitives`, `product`, `coproduct`, `collection` - generator builders
//! - `interpreter` - standard and tracing evaluation
//! - `trace` - trace trees and their text rendering
//! - `stream` - infinite value streams

pub mod bias;
pub mod collection;
pub mod coproduct;
pub mod error;
pub mod frequency;
pub mod generator;
pub mod instruction;
pub mod interpreter;
pub mod outcome;
pub mod parameters;
pub mod primitives;
pub mod product;
pub mod seed;
pub mod size;
pub mod stream;
pub mod trace;
mod value;

// Re-exports for convenience
pub use bias::{BiasSetting, BiasSettings, CompositeBias, NoBias, StandardBias};
pub use collection::{
    aggregate, aggregate_n, build_collection, hash_map_for_keys, hash_map_of, list, list_of_n,
    non_empty_hash_map_of, non_empty_list, non_empty_set, set, StableHashMap, StableHashSet,
};
pub use coproduct::{
    always_false, always_true, at_least_one_of_values, choice2, choice3, choice4, choice5, choice6,
    choice7, choice8, either, either_weighted, entry_from_map, just, key_from_map, left, maybe,
    maybe_weighted, nothing, one_from_collection, one_of, one_of_values, right, some_from_collection,
    some_of, some_of_values, unit, value_from_map, Choice2, Choice3, Choice4, Choice5, Choice6,
    Choice7, Choice8, Either,
};
pub use error::ConfigError;
pub use frequency::{frequency, FrequencyEntry, FrequencyMap};
pub use generator::{constant, sized, Generator};
pub use instruction::{Instruction, Metadata, Primitive};
pub use interpreter::{Interpreter, StandardInterpreter, Traced, TracingInterpreter};
pub use outcome::Outcome;
pub use parameters::Parameters;
pub use primitives::{
    boolean, boolean_weighted, boolean_with_true_weight, byte, bytes, double, double_between,
    double_scaled, float, float_between, float_scaled, gaussian, int, int_between, int_bounded,
    int_exclusive, int_index, long, long_between, long_bounded, long_exclusive, long_index, short,
};
pub use product::{tupled2, tupled3, tupled4, tupled5, tupled6, tupled7, tupled8};
pub use seed::Seed;
pub use size::{SizeParameters, SizeSelector};
pub use stream::{stream_from, traced_stream_from, GeneratedStream};
pub use trace::{Trace, TracePrinter};
pub use value::{Erased, Value};
