//! Edge-case injection.
//!
//! A [`BiasSetting`] makes a handful of interesting values (bounds, zero,
//! off-by-one neighbours) show up far more often than a uniform draw would
//! produce them, while leaving the inner distribution in place for the
//! remaining weight.
//!
//! # Selection
//!
//! ```text
//! total = inner_weight + |elements|
//! n     = seed_value mod total
//!
//! n <  |elements|  ->  elements[n], seed advanced by one next_int draw
//! n >= |elements|  ->  inner draw from the untouched seed
//! ```
//!
//! [`BiasSettings`] maps each value domain to an optional setting. Settings
//! compose with ordered fallback: the first one that declares a bias for a
//! domain wins.

use crate::error::ConfigError;
use crate::outcome::Outcome;
use crate::seed::Seed;
use crate::size::{SizeSelector, DEFAULT_RANGE};
use std::fmt::Debug;
use std::sync::Arc;

/// Default inner weight for scalar domains.
pub const DEFAULT_INNER_WEIGHT: u32 = 100;

/// Default inner weight for size resolution.
pub const DEFAULT_SIZE_INNER_WEIGHT: u32 = 20;

/// Interesting elements for one domain plus the weight of the inner distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasSetting<A> {
    elements: Vec<A>,
    inner_weight: u32,
}

impl<A: Clone> BiasSetting<A> {
    /// Inject `elements` alongside an inner distribution of weight `inner_weight`.
    pub fn inject(elements: Vec<A>, inner_weight: u32) -> Result<Self, ConfigError> {
        if elements.is_empty() {
            return Err(ConfigError::EmptyBias);
        }
        Ok(Self {
            elements,
            inner_weight,
        })
    }

    pub fn elements(&self) -> &[A] {
        &self.elements
    }

    pub fn inner_weight(&self) -> u32 {
        self.inner_weight
    }

    pub fn total_weight(&self) -> i64 {
        self.inner_weight as i64 + self.elements.len() as i64
    }

    /// Pick an interesting element or delegate to `inner`.
    ///
    /// The edge branch still spends one `next_int` draw, so both branches
    /// advance the seed.
    pub fn apply(&self, seed: Seed, inner: impl FnOnce(Seed) -> Outcome<A>) -> Outcome<A> {
        let n = seed.seed_value().rem_euclid(self.total_weight());
        match self.elements.get(n as usize) {
            Some(element) => Outcome::new(seed.next_int().next_seed, element.clone()),
            None => inner(seed),
        }
    }
}

/// Inclusive `i32` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const FULL: IntRange = IntRange {
        min: i32::MIN,
        max: i32::MAX,
    };

    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Inclusive `i64` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongRange {
    pub min: i64,
    pub max: i64,
}

impl LongRange {
    pub const FULL: LongRange = LongRange {
        min: i64::MIN,
        max: i64::MAX,
    };

    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// Values `origin + u * (end - origin)` for `u` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub origin: f32,
    pub end: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleRange {
    pub origin: f64,
    pub end: f64,
}

/// Per-domain bias registry. Every method defaults to "no bias".
pub trait BiasSettings: Debug + Send + Sync {
    fn int_bias(&self, _range: IntRange) -> Option<BiasSetting<i32>> {
        None
    }

    fn long_bias(&self, _range: LongRange) -> Option<BiasSetting<i64>> {
        None
    }

    fn float_bias(&self, _range: FloatRange) -> Option<BiasSetting<f32>> {
        None
    }

    fn double_bias(&self, _range: DoubleRange) -> Option<BiasSetting<f64>> {
        None
    }

    fn byte_bias(&self) -> Option<BiasSetting<i8>> {
        None
    }

    fn short_bias(&self) -> Option<BiasSetting<i16>> {
        None
    }

    fn size_bias(&self, _selector: &SizeSelector) -> Option<BiasSetting<usize>> {
        None
    }

    /// Fall back to `second` for every domain this setting leaves unbiased.
    fn then<S>(self, second: S) -> CompositeBias
    where
        Self: Sized + 'static,
        S: BiasSettings + 'static,
    {
        CompositeBias::new(Arc::new(self), Arc::new(second))
    }
}

/// Declares no bias for any domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBias;

impl BiasSettings for NoBias {}

/// Injects boundary values for every numeric domain and for sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardBias {
    inner_weight: u32,
    size_inner_weight: u32,
}

impl StandardBias {
    pub fn new(inner_weight: u32, size_inner_weight: u32) -> Self {
        Self {
            inner_weight,
            size_inner_weight,
        }
    }
}

impl Default for StandardBias {
    fn default() -> Self {
        Self::new(DEFAULT_INNER_WEIGHT, DEFAULT_SIZE_INNER_WEIGHT)
    }
}

impl BiasSettings for StandardBias {
    fn int_bias(&self, range: IntRange) -> Option<BiasSetting<i32>> {
        let candidates = [
            Some(range.min),
            Some(range.max),
            Some(0),
            Some(1),
            Some(-1),
            range.min.checked_add(1),
            range.max.checked_sub(1),
        ];
        let elements = distinct(
            candidates
                .into_iter()
                .flatten()
                .filter(|v| (range.min..=range.max).contains(v)),
        );
        BiasSetting::inject(elements, self.inner_weight).ok()
    }

    fn long_bias(&self, range: LongRange) -> Option<BiasSetting<i64>> {
        let candidates = [
            Some(range.min),
            Some(range.max),
            Some(0),
            Some(1),
            Some(-1),
            range.min.checked_add(1),
            range.max.checked_sub(1),
        ];
        let elements = distinct(
            candidates
                .into_iter()
                .flatten()
                .filter(|v| (range.min..=range.max).contains(v)),
        );
        BiasSetting::inject(elements, self.inner_weight).ok()
    }

    fn float_bias(&self, range: FloatRange) -> Option<BiasSetting<f32>> {
        let mut elements = vec![range.origin];
        if range.origin != 0.0 && straddles_zero(range.origin as f64, range.end as f64) {
            elements.push(0.0);
        }
        BiasSetting::inject(elements, self.inner_weight).ok()
    }

    fn double_bias(&self, range: DoubleRange) -> Option<BiasSetting<f64>> {
        let mut elements = vec![range.origin];
        if range.origin != 0.0 && straddles_zero(range.origin, range.end) {
            elements.push(0.0);
        }
        BiasSetting::inject(elements, self.inner_weight).ok()
    }

    fn byte_bias(&self) -> Option<BiasSetting<i8>> {
        BiasSetting::inject(vec![i8::MIN, i8::MAX, 0, 1, -1], self.inner_weight).ok()
    }

    fn short_bias(&self) -> Option<BiasSetting<i16>> {
        BiasSetting::inject(vec![i16::MIN, i16::MAX, 0, 1, -1], self.inner_weight).ok()
    }

    fn size_bias(&self, selector: &SizeSelector) -> Option<BiasSetting<usize>> {
        let (smallest, largest) = match *selector {
            SizeSelector::PreferredOnly { .. } => return None,
            SizeSelector::NoSizeParameters => (0, DEFAULT_RANGE - 1),
            SizeSelector::MinOnly { min } | SizeSelector::MinPreferred { min, .. } => {
                (min, min + DEFAULT_RANGE - 1)
            }
            SizeSelector::MaxOnly { max } | SizeSelector::MaxPreferred { max, .. } => {
                (0, (max - 1).max(0))
            }
            SizeSelector::MinMax { min, max } | SizeSelector::MinMaxPreferred { min, max, .. } => {
                (min, max)
            }
        };
        let elements = distinct([smallest as usize, largest as usize].into_iter());
        BiasSetting::inject(elements, self.size_inner_weight).ok()
    }
}

/// Ordered fallback between two settings.
#[derive(Debug, Clone)]
pub struct CompositeBias {
    first: Arc<dyn BiasSettings>,
    second: Arc<dyn BiasSettings>,
}

impl CompositeBias {
    pub fn new(first: Arc<dyn BiasSettings>, second: Arc<dyn BiasSettings>) -> Self {
        Self { first, second }
    }

    fn compose<A>(&self, f: impl Fn(&dyn BiasSettings) -> Option<A>) -> Option<A> {
        f(self.first.as_ref()).or_else(|| f(self.second.as_ref()))
    }
}

impl BiasSettings for CompositeBias {
    fn int_bias(&self, range: IntRange) -> Option<BiasSetting<i32>> {
        self.compose(|bias| bias.int_bias(range))
    }

    fn long_bias(&self, range: LongRange) -> Option<BiasSetting<i64>> {
        self.compose(|bias| bias.long_bias(range))
    }

    fn float_bias(&self, range: FloatRange) -> Option<BiasSetting<f32>> {
        self.compose(|bias| bias.float_bias(range))
    }

    fn double_bias(&self, range: DoubleRange) -> Option<BiasSetting<f64>> {
        self.compose(|bias| bias.double_bias(range))
    }

    fn byte_bias(&self) -> Option<BiasSetting<i8>> {
        self.compose(|bias| bias.byte_bias())
    }

    fn short_bias(&self) -> Option<BiasSetting<i16>> {
        self.compose(|bias| bias.short_bias())
    }

    fn size_bias(&self, selector: &SizeSelector) -> Option<BiasSetting<usize>> {
        self.compose(|bias| bias.size_bias(selector))
    }
}

fn straddles_zero(origin: f64, end: f64) -> bool {
    (origin < 0.0 && end > 0.0) || (origin > 0.0 && end < 0.0)
}

fn distinct<A: PartialEq>(values: impl Iterator<Item = A>) -> Vec<A> {
    let mut out = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scan seeds until one lands on the requested residue.
    fn seed_with_residue(total: i64, want: impl Fn(i64) -> bool) -> Seed {
        (0..10_000)
            .map(Seed::new)
            .find(|seed| want(seed.seed_value() % total))
            .expect("no seed found for residue")
    }

    #[test]
    fn test_inject_rejects_empty() {
        assert_eq!(
            BiasSetting::<i32>::inject(vec![], 10),
            Err(ConfigError::EmptyBias)
        );
    }

    #[test]
    fn test_edge_branch_advances_seed_by_one_int() {
        let setting = BiasSetting::inject(vec![100, 200, 300], 5).unwrap();
        let seed = seed_with_residue(8, |n| n == 1);

        let outcome = setting.apply(seed, |s| s.next_int_bounded(10));
        assert_eq!(outcome.value, 200);
        assert_eq!(outcome.next_seed, seed.next_int().next_seed);
    }

    #[test]
    fn test_inner_branch_uses_untouched_seed() {
        let setting = BiasSetting::inject(vec![100, 200, 300], 5).unwrap();
        let seed = seed_with_residue(8, |n| n >= 3);

        let outcome = setting.apply(seed, |s| s.next_int_bounded(10));
        assert_eq!(outcome, seed.next_int_bounded(10));
    }

    #[test]
    fn test_every_residue_below_count_is_an_edge() {
        let setting = BiasSetting::inject(vec![-1, -2], 3).unwrap();
        for residue in 0..5 {
            let seed = seed_with_residue(5, |n| n == residue);
            let outcome = setting.apply(seed, |s| s.next_int_bounded(10));
            if residue < 2 {
                assert_eq!(outcome.value, -(residue as i32) - 1);
            } else {
                assert!((0..10).contains(&outcome.value));
            }
        }
    }

    #[test]
    fn test_zero_inner_weight_always_edges() {
        let setting = BiasSetting::inject(vec![7], 0).unwrap();
        let mut seed = Seed::new(1);
        for _ in 0..50 {
            let outcome = setting.apply(seed, |s| s.next_int());
            assert_eq!(outcome.value, 7);
            seed = outcome.next_seed;
        }
    }

    #[test]
    fn test_standard_int_bias_stays_in_range() {
        let setting = StandardBias::default()
            .int_bias(IntRange::new(5, 9))
            .unwrap();
        assert_eq!(setting.elements(), &[5, 9, 6, 8]);
        assert_eq!(setting.inner_weight(), DEFAULT_INNER_WEIGHT);

        let full = StandardBias::default().int_bias(IntRange::FULL).unwrap();
        assert!(full.elements().contains(&i32::MIN));
        assert!(full.elements().contains(&0));
    }

    #[test]
    fn test_standard_size_bias() {
        let bias = StandardBias::default();
        assert_eq!(
            bias.size_bias(&SizeSelector::min_max(2, 6)).unwrap().elements(),
            &[2, 6]
        );
        assert_eq!(
            bias.size_bias(&SizeSelector::max_only(4)).unwrap().elements(),
            &[0, 3]
        );
        assert_eq!(
            bias.size_bias(&SizeSelector::no_size_parameters()).unwrap().elements(),
            &[0, 15]
        );
        assert!(bias.size_bias(&SizeSelector::preferred_only(3)).is_none());
    }

    #[derive(Debug)]
    struct OnlyBytes;

    impl BiasSettings for OnlyBytes {
        fn byte_bias(&self) -> Option<BiasSetting<i8>> {
            BiasSetting::inject(vec![42], 1).ok()
        }
    }

    #[test]
    fn test_composite_falls_through() {
        let composite = OnlyBytes.then(StandardBias::default());
        assert_eq!(composite.byte_bias().unwrap().elements(), &[42]);
        assert!(composite.int_bias(IntRange::new(0, 3)).is_some());

        let nothing = NoBias.then(NoBias);
        assert!(nothing.short_bias().is_none());
    }
}
