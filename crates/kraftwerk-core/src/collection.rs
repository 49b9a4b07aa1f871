//! Collections built by folding element draws into a builder.
//!
//! Every collection here is an [`aggregate`]: an ordered list of element
//! generators, a fresh builder per run, an `add` step per element and a
//! final `build`. Only the `(initial, add, build)` triple differs between a
//! list, a set and a map.
//!
//! Sets and maps hash with a fixed-key hasher, so their iteration order is
//! a function of their contents and every run on the same seed renders the
//! same way.

use crate::generator::{sized, Generator};
use crate::instruction::{Aggregate, Instruction};
use crate::product::tupled2;
use crate::value::{erase, unerase, unerase_builder};
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasherDefault, Hash};
use std::sync::Arc;

/// Hasher state with fixed keys.
pub type StableState = BuildHasherDefault<DefaultHasher>;

/// `HashSet` whose iteration order does not change between processes.
pub type StableHashSet<A> = HashSet<A, StableState>;

/// `HashMap` whose iteration order does not change between processes.
pub type StableHashMap<K, V> = HashMap<K, V, StableState>;

/// Fold the values of `elements`, in order, into a builder.
///
/// `initial` runs once per generation, so builders are never shared between
/// runs.
pub fn aggregate<A, B, Out, I, Add, Build>(
    initial: I,
    add: Add,
    build: Build,
    elements: impl IntoIterator<Item = Generator<A>>,
) -> Generator<Out>
where
    A: Debug + 'static,
    B: Any,
    Out: Debug + 'static,
    I: Fn() -> B + Send + Sync + 'static,
    Add: Fn(B, A) -> B + Send + Sync + 'static,
    Build: Fn(B) -> Out + Send + Sync + 'static,
{
    let elements = elements
        .into_iter()
        .map(|element| Arc::clone(element.instruction()))
        .collect();
    Generator::from_instruction(Instruction::Aggregate(Aggregate::new(
        Arc::new(move || Box::new(initial()) as Box<dyn Any>),
        Arc::new(move |builder, value| {
            Box::new(add(unerase_builder::<B>(builder), unerase::<A>(value))) as Box<dyn Any>
        }),
        Arc::new(move |builder| erase(build(unerase_builder::<B>(builder)))),
        elements,
    )))
}

/// [`aggregate`] over `count` draws of the same element generator.
pub fn aggregate_n<A, B, Out, I, Add, Build>(
    initial: I,
    add: Add,
    build: Build,
    count: usize,
    element: Generator<A>,
) -> Generator<Out>
where
    A: Debug + 'static,
    B: Any,
    Out: Debug + 'static,
    I: Fn() -> B + Send + Sync + 'static,
    Add: Fn(B, A) -> B + Send + Sync + 'static,
    Build: Fn(B) -> Out + Send + Sync + 'static,
{
    aggregate(initial, add, build, std::iter::repeat(element).take(count))
}

/// `count` elements collected into any `FromIterator` container.
pub fn build_collection<A, C>(count: usize, element: Generator<A>) -> Generator<C>
where
    A: Debug + 'static,
    C: FromIterator<A> + Debug + 'static,
{
    aggregate_n(
        move || Vec::with_capacity(count),
        |mut items: Vec<A>, item| {
            items.push(item);
            items
        },
        |items| items.into_iter().collect::<C>(),
        count,
        element,
    )
}

pub fn list_of_n<A: Debug + 'static>(count: usize, element: Generator<A>) -> Generator<Vec<A>> {
    build_collection(count, element)
}

/// List whose length comes from the active size selector.
pub fn list<A: Debug + 'static>(element: Generator<A>) -> Generator<Vec<A>> {
    sized(move |size| list_of_n(size, element.clone()))
}

pub fn non_empty_list<A: Debug + 'static>(element: Generator<A>) -> Generator<Vec<A>> {
    sized(move |size| list_of_n(size.max(1), element.clone()))
}

/// Set built from a sized number of draws; duplicates collapse, so the set
/// may be smaller than the drawn size.
pub fn set<A>(element: Generator<A>) -> Generator<StableHashSet<A>>
where
    A: Debug + Eq + Hash + 'static,
{
    sized(move |size| build_collection(size, element.clone()))
}

pub fn non_empty_set<A>(element: Generator<A>) -> Generator<StableHashSet<A>>
where
    A: Debug + Eq + Hash + 'static,
{
    sized(move |size| build_collection(size.max(1), element.clone()))
}

/// Map from a sized number of key/value draws. Later duplicates of a key
/// overwrite earlier ones.
pub fn hash_map_of<K, V>(keys: Generator<K>, values: Generator<V>) -> Generator<StableHashMap<K, V>>
where
    K: Debug + Eq + Hash + 'static,
    V: Debug + 'static,
{
    let entry = tupled2(keys, values);
    sized(move |size| build_collection(size, entry.clone()))
}

/// Like [`hash_map_of`], with at least one entry.
pub fn non_empty_hash_map_of<K, V>(
    keys: Generator<K>,
    values: Generator<V>,
) -> Generator<StableHashMap<K, V>>
where
    K: Debug + Eq + Hash + 'static,
    V: Debug + 'static,
{
    let entry = tupled2(keys, values);
    sized(move |size| build_collection(size.max(1), entry.clone()))
}

/// One generated value for each of the given keys.
pub fn hash_map_for_keys<K, V>(keys: Vec<K>, values: Generator<V>) -> Generator<StableHashMap<K, V>>
where
    K: Clone + Debug + Eq + Hash + Send + Sync + 'static,
    V: Debug + 'static,
{
    let count = keys.len();
    list_of_n(count, values).map(move |values| keys.iter().cloned().zip(values).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::constant;
    use crate::interpreter::{Interpreter, StandardInterpreter};
    use crate::parameters::Parameters;
    use crate::primitives::{int, int_between, int_bounded};
    use crate::seed::Seed;
    use crate::size::SizeParameters;
    use std::collections::BTreeSet;

    #[test]
    fn test_aggregate_threads_seed_in_order() {
        let a = int_bounded(1000).unwrap();
        let b = int_between(-50, 50).unwrap();
        let seed = Seed::new(12);

        let first = a.run(seed);
        let second = b.run(first.next_seed);
        let outcome = aggregate(
            Vec::new,
            |mut items: Vec<i32>, item| {
                items.push(item);
                items
            },
            |items| items,
            vec![a.clone(), b.clone()],
        )
        .run(seed);

        assert_eq!(outcome.value, vec![first.value, second.value]);
        assert_eq!(outcome.next_seed, second.next_seed);

        let reversed = aggregate(
            Vec::new,
            |mut items: Vec<i32>, item| {
                items.push(item);
                items
            },
            |items| items,
            vec![b.clone(), a.clone()],
        );
        let b_first = b.run(seed);
        let a_second = a.run(b_first.next_seed);
        assert_eq!(reversed.run(seed).value, vec![b_first.value, a_second.value]);
        assert_eq!(reversed.run(seed), reversed.run(seed));
    }

    #[test]
    fn test_builder_is_fresh_each_run() {
        let sum = aggregate_n(
            || 0i64,
            |total: i64, n: i32| total + n as i64,
            |total| total,
            3,
            constant(2),
        );
        let seed = Seed::new(0);
        assert_eq!(sum.run(seed).value, 6);
        assert_eq!(sum.run(seed).value, 6);
    }

    #[test]
    fn test_list_of_n_length() {
        let generator = list_of_n(25, int_bounded(3).unwrap());
        let values = generator.run(Seed::new(3)).value;
        assert_eq!(values.len(), 25);
        assert!(list_of_n(0, int_bounded(3).unwrap()).run(Seed::new(3)).value.is_empty());
    }

    #[test]
    fn test_list_respects_size_parameters() {
        let interpreter = StandardInterpreter::new(
            Parameters::default()
                .with_size_parameters(SizeParameters::default().with_min_size(2).with_max_size(4)),
        );
        let generator = list(int_bounded(10).unwrap());
        let mut seed = Seed::new(9);
        for _ in 0..200 {
            let outcome = interpreter.run(&generator, seed);
            assert!((2..=4).contains(&outcome.value.len()));
            seed = outcome.next_seed;
        }
    }

    #[test]
    fn test_non_empty_variants() {
        let interpreter = StandardInterpreter::new(
            Parameters::default().with_size_parameters(SizeParameters::default().with_preferred_size(0)),
        );
        let seed = Seed::new(1);
        assert!(interpreter.run(&list(constant(1)), seed).value.is_empty());
        assert_eq!(interpreter.run(&non_empty_list(constant(1)), seed).value, vec![1]);
        assert_eq!(interpreter.run(&non_empty_set(constant(1)), seed).value.len(), 1);
    }

    #[test]
    fn test_build_collection_into_ordered_set() {
        let generator: Generator<BTreeSet<i32>> = build_collection(40, int_bounded(5).unwrap());
        let values = generator.run(Seed::new(6)).value;
        assert!(!values.is_empty() && values.len() <= 5);
    }

    #[test]
    fn test_hash_map_for_keys() {
        let generator = hash_map_for_keys(vec!["a", "b", "c"], int_bounded(9).unwrap());
        let map = generator.run(Seed::new(4)).value;
        assert_eq!(map.len(), 3);
        assert!(map.values().all(|v| (0..9).contains(v)));
    }

    #[test]
    fn test_hash_map_of_and_set() {
        let mut seed = Seed::new(44);
        for _ in 0..50 {
            let outcome = hash_map_of(int_bounded(100).unwrap(), constant('x')).run(seed);
            assert!(outcome.value.len() < 16);
            let set_outcome = set(int_bounded(100).unwrap()).run(outcome.next_seed);
            assert!(set_outcome.value.len() < 16);
            seed = set_outcome.next_seed;
        }
    }

    #[test]
    fn test_hashed_collections_are_reproducible() {
        let seed = Seed::new(42);
        let as_vec = set(int_bounded(1_000_000).unwrap()).map(|s| s.into_iter().collect::<Vec<_>>());
        let first = as_vec.run(seed);
        for _ in 0..10 {
            assert_eq!(as_vec.run(seed), first);
        }

        let map = hash_map_of(int_bounded(1_000_000).unwrap(), constant('x'));
        let trace = map.run_traced(Seed::new(7)).value.trace;
        for _ in 0..10 {
            assert_eq!(map.run_traced(Seed::new(7)).value.trace.value, trace.value);
        }
    }

    #[test]
    fn test_non_empty_hash_map_of() {
        let interpreter = StandardInterpreter::new(
            Parameters::default().with_size_parameters(SizeParameters::default().with_preferred_size(0)),
        );
        let seed = Seed::new(2);
        assert!(interpreter.run(&hash_map_of(int(), constant(1)), seed).value.is_empty());
        let map = interpreter.run(&non_empty_hash_map_of(int(), constant(1)), seed).value;
        assert_eq!(map.len(), 1);
    }
}
