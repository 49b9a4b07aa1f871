//! Alternatives: optional values, either-values, typed choices and picks
//! from a set.

use crate::collection::list_of_n;
use crate::error::ConfigError;
use crate::frequency::{fixed_pair, frequency, FrequencyEntry};
use crate::generator::{constant, constant_with, Generator};
use crate::primitives::{boolean, int_index};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Relative weights used by [`maybe`].
pub const MAYBE_NOTHING_WEIGHT: u16 = 1;
pub const MAYBE_JUST_WEIGHT: u16 = 9;

/// Relative weights used by [`either`].
pub const EITHER_LEFT_WEIGHT: u16 = 1;
pub const EITHER_RIGHT_WEIGHT: u16 = 1;

/// A value of one of two types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }
}

pub fn unit() -> Generator<()> {
    constant(())
}

pub fn always_true() -> Generator<bool> {
    constant(true)
}

pub fn always_false() -> Generator<bool> {
    constant(false)
}

pub fn just<A: Debug + 'static>(generator: Generator<A>) -> Generator<Option<A>> {
    generator.map(Some)
}

pub fn nothing<A: Debug + 'static>() -> Generator<Option<A>> {
    constant_with(|| None)
}

/// `None` about one time in ten.
pub fn maybe<A: Debug + 'static>(generator: Generator<A>) -> Generator<Option<A>> {
    fixed_pair(
        MAYBE_NOTHING_WEIGHT,
        nothing(),
        MAYBE_JUST_WEIGHT,
        just(generator),
    )
}

pub fn maybe_weighted<A: Debug + 'static>(
    nothing_weight: u32,
    just_weight: u32,
    generator: Generator<A>,
) -> Result<Generator<Option<A>>, ConfigError> {
    frequency(vec![(nothing_weight, nothing()), (just_weight, just(generator))])
}

pub fn left<L, R>(generator: Generator<L>) -> Generator<Either<L, R>>
where
    L: Debug + 'static,
    R: Debug + 'static,
{
    generator.map(Either::Left)
}

pub fn right<L, R>(generator: Generator<R>) -> Generator<Either<L, R>>
where
    L: Debug + 'static,
    R: Debug + 'static,
{
    generator.map(Either::Right)
}

/// Left or right with equal weight.
pub fn either<L, R>(left_generator: Generator<L>, right_generator: Generator<R>) -> Generator<Either<L, R>>
where
    L: Debug + 'static,
    R: Debug + 'static,
{
    fixed_pair(
        EITHER_LEFT_WEIGHT,
        left(left_generator),
        EITHER_RIGHT_WEIGHT,
        right(right_generator),
    )
}

pub fn either_weighted<L, R>(
    left_weight: u32,
    left_generator: Generator<L>,
    right_weight: u32,
    right_generator: Generator<R>,
) -> Result<Generator<Either<L, R>>, ConfigError>
where
    L: Debug + 'static,
    R: Debug + 'static,
{
    frequency(vec![
        (left_weight, left(left_generator)),
        (right_weight, right(right_generator)),
    ])
}

/// One of `generators`, each equally likely.
pub fn one_of<A: Debug + 'static>(
    generators: impl IntoIterator<Item = Generator<A>>,
) -> Result<Generator<A>, ConfigError> {
    frequency(generators.into_iter().map(|generator| (1, generator)))
}

/// One of `values`, each equally likely.
pub fn one_of_values<A>(values: impl IntoIterator<Item = A>) -> Result<Generator<A>, ConfigError>
where
    A: Clone + Debug + Send + Sync + 'static,
{
    let values: Arc<Vec<A>> = Arc::new(values.into_iter().collect());
    let index = int_index(value_count(&values)?)?;
    Ok(index.map(move |i| values[i as usize].clone()))
}

/// One element of `items`, each position equally likely.
pub fn one_from_collection<A>(items: &[A]) -> Result<Generator<A>, ConfigError>
where
    A: Clone + Debug + Send + Sync + 'static,
{
    one_of_values(items.iter().cloned())
}

/// A non-empty subset of `values`, in declaration order.
///
/// One position is drawn first and always kept; every other value is kept
/// or dropped by a fair coin.
pub fn at_least_one_of_values<A>(
    values: impl IntoIterator<Item = A>,
) -> Result<Generator<Vec<A>>, ConfigError>
where
    A: Clone + Debug + Send + Sync + 'static,
{
    let values: Arc<Vec<A>> = Arc::new(values.into_iter().collect());
    let count = value_count(&values)?;
    Ok(int_index(count)?.flat_map(move |forced| {
        let values = Arc::clone(&values);
        list_of_n(values.len(), boolean()).map(move |flags| {
            values
                .iter()
                .zip(flags)
                .enumerate()
                .filter(|(i, (_, keep))| *keep || *i == forced as usize)
                .map(|(_, (value, _))| value.clone())
                .collect::<Vec<A>>()
        })
    }))
}

/// A possibly empty subset of `values`, in declaration order.
///
/// Each value is kept or dropped by a fair coin.
pub fn some_of_values<A>(values: impl IntoIterator<Item = A>) -> Generator<Vec<A>>
where
    A: Clone + Debug + Send + Sync + 'static,
{
    let values: Arc<Vec<A>> = Arc::new(values.into_iter().collect());
    list_of_n(values.len(), boolean()).map(move |flags| {
        values
            .iter()
            .zip(flags)
            .filter(|(_, keep)| *keep)
            .map(|(value, _)| value.clone())
            .collect::<Vec<A>>()
    })
}

pub fn some_from_collection<A>(items: &[A]) -> Generator<Vec<A>>
where
    A: Clone + Debug + Send + Sync + 'static,
{
    some_of_values(items.iter().cloned())
}

/// Values of a possibly empty subset of `generators`, in declaration order.
///
/// The subset is chosen first; only the kept generators are then run.
pub fn some_of<A: Debug + 'static>(
    generators: impl IntoIterator<Item = Generator<A>>,
) -> Generator<Vec<A>> {
    let generators: Arc<Vec<Generator<A>>> = Arc::new(generators.into_iter().collect());
    list_of_n(generators.len(), boolean()).flat_map(move |flags| {
        let kept: Vec<Generator<A>> = generators
            .iter()
            .zip(flags)
            .filter(|(_, keep)| *keep)
            .map(|(generator, _)| generator.clone())
            .collect();
        crate::collection::aggregate(
            Vec::new,
            |mut items: Vec<A>, item| {
                items.push(item);
                items
            },
            |items| items,
            kept,
        )
    })
}

/// One entry of `map`, each equally likely.
pub fn entry_from_map<K, V>(map: &BTreeMap<K, V>) -> Result<Generator<(K, V)>, ConfigError>
where
    K: Clone + Debug + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    one_of_values(map.iter().map(|(k, v)| (k.clone(), v.clone())))
}

pub fn key_from_map<K, V>(map: &BTreeMap<K, V>) -> Result<Generator<K>, ConfigError>
where
    K: Clone + Debug + Send + Sync + 'static,
{
    one_of_values(map.keys().cloned())
}

pub fn value_from_map<K, V>(map: &BTreeMap<K, V>) -> Result<Generator<V>, ConfigError>
where
    V: Clone + Debug + Send + Sync + 'static,
{
    one_of_values(map.values().cloned())
}

macro_rules! choice_fn {
    ($(#[$doc:meta])* $name:ident, $choice:ident => $($arg:ident: $T:ident => $variant:ident),+) => {
        /// A value of one of several types, tagged by position.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $choice<$($T),+> {
            $($variant($T)),+
        }

        $(#[$doc])*
        pub fn $name<$($T: Debug + 'static),+>(
            $($arg: FrequencyEntry<$T>),+
        ) -> Result<Generator<$choice<$($T),+>>, ConfigError> {
            frequency(vec![$(($arg.weight, $arg.generator.map($choice::$variant))),+])
        }
    };
}

choice_fn!(
    /// Weighted choice between alternatives of different types.
    ///
    /// Weights follow the same rules as [`frequency`]: zero makes an
    /// alternative unreachable, and at least one must be positive.
    choice2, Choice2 => a: A => First, b: B => Second
);
choice_fn!(choice3, Choice3 => a: A => First, b: B => Second, c: C => Third);
choice_fn!(choice4, Choice4 => a: A => First, b: B => Second, c: C => Third, d: D => Fourth);
choice_fn!(
    choice5, Choice5 =>
    a: A => First, b: B => Second, c: C => Third, d: D => Fourth, e: E => Fifth
);
choice_fn!(
    choice6, Choice6 =>
    a: A => First, b: B => Second, c: C => Third, d: D => Fourth, e: E => Fifth, f: F => Sixth
);
choice_fn!(
    choice7, Choice7 =>
    a: A => First, b: B => Second, c: C => Third, d: D => Fourth, e: E => Fifth, f: F => Sixth,
    g: G => Seventh
);
choice_fn!(
    choice8, Choice8 =>
    a: A => First, b: B => Second, c: C => Third, d: D => Fourth, e: E => Fifth, f: F => Sixth,
    g: G => Seventh, h: H => Eighth
);

fn value_count<A>(values: &[A]) -> Result<i32, ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::EmptyChoice);
    }
    i32::try_from(values.len()).map_err(|_| ConfigError::WeightOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::int;
    use crate::seed::Seed;
    use std::collections::BTreeSet;

    fn sample<A: Debug + 'static>(generator: &Generator<A>, count: usize) -> Vec<A> {
        generator.stream(Seed::new(77)).next_n(count)
    }

    #[test]
    fn test_maybe_is_mostly_just() {
        let values = sample(&maybe(int()), 5000);
        let nothing_ratio = values.iter().filter(|v| v.is_none()).count() as f64 / 5000.0;
        assert!((nothing_ratio - 0.1).abs() < 0.03, "ratio was {nothing_ratio}");
    }

    #[test]
    fn test_maybe_weighted_extremes() {
        let generator = maybe_weighted(0, 1, int()).unwrap();
        assert!(sample(&generator, 100).iter().all(Option::is_some));
        let generator = maybe_weighted(1, 0, int()).unwrap();
        assert!(sample(&generator, 100).iter().all(Option::is_none));
        assert!(maybe_weighted(0, 0, int()).is_err());
    }

    #[test]
    fn test_either_produces_both_sides() {
        let values = sample(&either(constant('l'), constant(1u8)), 200);
        assert!(values.iter().any(Either::is_left));
        assert!(values.iter().any(Either::is_right));

        let only_right = either_weighted(0, constant('l'), 3, constant(1u8)).unwrap();
        assert!(sample(&only_right, 100).iter().all(|v| *v == Either::Right(1)));
    }

    #[test]
    fn test_one_of_values_covers_all() {
        let values = sample(&one_of_values(["a", "b", "c"]).unwrap(), 300);
        for expected in ["a", "b", "c"] {
            assert!(values.contains(&expected));
        }
        assert_eq!(
            one_of_values(Vec::<u8>::new()).unwrap_err(),
            ConfigError::EmptyChoice
        );
        assert_eq!(one_of(Vec::<Generator<u8>>::new()).unwrap_err(), ConfigError::EmptyChoice);
    }

    #[test]
    fn test_one_from_collection() {
        let items = vec![10, 20];
        let values = sample(&one_from_collection(&items).unwrap(), 100);
        assert!(values.iter().all(|v| items.contains(v)));
    }

    #[test]
    fn test_at_least_one_keeps_order_and_is_non_empty() {
        let generator = at_least_one_of_values([1, 2, 3, 4]).unwrap();
        for subset in sample(&generator, 500) {
            assert!(!subset.is_empty());
            assert!(subset.windows(2).all(|w| w[0] < w[1]));
        }
        let single = at_least_one_of_values(["only"]).unwrap();
        assert!(sample(&single, 20).iter().all(|s| s == &vec!["only"]));
    }

    #[test]
    fn test_unit_and_constants() {
        let seed = Seed::new(5);
        assert_eq!(unit().run(seed).next_seed, seed);
        assert!(always_true().run(seed).value);
        assert!(!always_false().run(seed).value);
        assert_eq!(nothing::<u8>().run(seed).value, None);
    }

    #[test]
    fn test_some_of_values_may_be_empty() {
        let subsets = sample(&some_of_values([1, 2, 3]), 500);
        assert!(subsets.iter().any(Vec::is_empty));
        assert!(subsets.iter().any(|s| s.len() == 3));
        assert!(subsets.iter().all(|s| s.windows(2).all(|w| w[0] < w[1])));
        assert!(sample(&some_from_collection::<u8>(&[]), 5).iter().all(Vec::is_empty));
    }

    #[test]
    fn test_some_of_runs_only_kept_generators() {
        let generator = some_of([constant('a'), constant('b'), constant('c')]);
        let subsets = sample(&generator, 300);
        assert!(subsets.iter().any(Vec::is_empty));
        assert!(subsets.iter().any(|s| s == &vec!['a', 'b', 'c']));
        assert!(subsets.iter().all(|s| s.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn test_picks_from_map() {
        let map = BTreeMap::from([("one", 1), ("two", 2), ("three", 3)]);
        let entries = sample(&entry_from_map(&map).unwrap(), 200);
        assert!(entries.iter().all(|(k, v)| map[k] == *v));
        assert_eq!(entries.iter().map(|(k, _)| *k).collect::<BTreeSet<_>>().len(), 3);
        assert!(sample(&key_from_map(&map).unwrap(), 50).iter().all(|k| map.contains_key(k)));
        assert!(sample(&value_from_map(&map).unwrap(), 50).iter().all(|v| (1..=3).contains(v)));
        assert_eq!(
            key_from_map(&BTreeMap::<u8, u8>::new()).unwrap_err(),
            ConfigError::EmptyChoice
        );
    }

    #[test]
    fn test_typed_choice() {
        let generator = choice3(
            FrequencyEntry::new(1, constant('c')),
            FrequencyEntry::new(0, constant(0u8)),
            FrequencyEntry::new(1, constant("s")),
        )
        .unwrap();
        let values = sample(&generator, 300);
        assert!(values.contains(&Choice3::First('c')));
        assert!(values.contains(&Choice3::Third("s")));
        assert!(!values.iter().any(|v| matches!(v, Choice3::Second(_))));

        let none = choice2(FrequencyEntry::new(0, unit()), FrequencyEntry::new(0, int()));
        assert_eq!(none.unwrap_err(), ConfigError::NoPositiveWeight);
    }
}
