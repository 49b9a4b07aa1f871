//! Size selection strategies for variable-length structures.
//!
//! A [`SizeSelector`] turns a seed into a non-negative size. Which strategy
//! applies is decided once, from the subset of `{min, max, preferred}` that
//! the caller supplies in [`SizeParameters`].

use crate::error::ConfigError;
use crate::outcome::Outcome;
use crate::seed::Seed;
use serde::{Deserialize, Serialize};

/// Width of the range used when no upper bound is given.
pub const DEFAULT_RANGE: i32 = 16;

/// Draws in `[0, PREFER_DENOMINATOR)` below this value select the preferred size.
const PREFER_NUMERATOR: i32 = 2;
const PREFER_DENOMINATOR: i32 = 7;

/// Optional size bounds, as supplied by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeParameters {
    /// Smallest size (inclusive)
    pub min_size: Option<i32>,
    /// Largest size (inclusive when a minimum is also given, exclusive otherwise)
    pub max_size: Option<i32>,
    /// Size returned with probability 2/7 when bounds are also present
    pub preferred_size: Option<i32>,
}

impl SizeParameters {
    /// No bounds at all: sizes are drawn from `[0, DEFAULT_RANGE)`.
    pub fn no_size_limits() -> Self {
        Self::default()
    }

    pub fn with_min_size(mut self, min_size: i32) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn with_max_size(mut self, max_size: i32) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_preferred_size(mut self, preferred_size: i32) -> Self {
        self.preferred_size = Some(preferred_size);
        self
    }

    /// Reject bounds that are negative or inverted.
    ///
    /// Selectors clamp such input silently; this check is for configuration
    /// sources that should fail loudly instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.min_size, self.max_size, self.preferred_size]
            .into_iter()
            .flatten()
        {
            if value < 0 {
                return Err(ConfigError::NegativeCount(value as i64));
            }
        }
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            crate::error::check_min_max(min as i64, max as i64)?;
        }
        Ok(())
    }
}

/// Strategy deriving a size from a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSelector {
    /// Uniform in `[0, DEFAULT_RANGE)`
    NoSizeParameters,
    /// Always `preferred`, without consuming the seed
    PreferredOnly { preferred: i32 },
    /// Uniform in `[min, min + DEFAULT_RANGE)`
    MinOnly { min: i32 },
    /// Uniform in `[0, max)`
    MaxOnly { max: i32 },
    MinPreferred { min: i32, preferred: i32 },
    MaxPreferred { max: i32, preferred: i32 },
    /// Uniform in `[min, max]`
    MinMax { min: i32, max: i32 },
    MinMaxPreferred { min: i32, max: i32, preferred: i32 },
}

impl SizeSelector {
    /// Pick the strategy matching the bounds that are present.
    pub fn from_parameters(parameters: &SizeParameters) -> Self {
        match (
            parameters.min_size,
            parameters.max_size,
            parameters.preferred_size,
        ) {
            (None, None, None) => Self::no_size_parameters(),
            (None, None, Some(preferred)) => Self::preferred_only(preferred),
            (Some(min), None, None) => Self::min_only(min),
            (None, Some(max), None) => Self::max_only(max),
            (Some(min), None, Some(preferred)) => Self::min_preferred(min, preferred),
            (None, Some(max), Some(preferred)) => Self::max_preferred(max, preferred),
            (Some(min), Some(max), None) => Self::min_max(min, max),
            (Some(min), Some(max), Some(preferred)) => Self::min_max_preferred(min, max, preferred),
        }
    }

    pub fn no_size_parameters() -> Self {
        Self::NoSizeParameters
    }

    pub fn preferred_only(preferred: i32) -> Self {
        Self::PreferredOnly {
            preferred: preferred.max(0),
        }
    }

    pub fn min_only(min: i32) -> Self {
        Self::MinOnly {
            min: clamp_open_min(min),
        }
    }

    pub fn max_only(max: i32) -> Self {
        Self::MaxOnly { max: max.max(0) }
    }

    pub fn min_preferred(min: i32, preferred: i32) -> Self {
        Self::MinPreferred {
            min: clamp_open_min(min),
            preferred: preferred.max(0),
        }
    }

    pub fn max_preferred(max: i32, preferred: i32) -> Self {
        Self::MaxPreferred {
            max: max.max(0),
            preferred: preferred.max(0),
        }
    }

    pub fn min_max(min: i32, max: i32) -> Self {
        let min = min.max(0);
        Self::MinMax {
            min,
            max: max.max(min),
        }
    }

    pub fn min_max_preferred(min: i32, max: i32, preferred: i32) -> Self {
        let min = min.max(0);
        Self::MinMaxPreferred {
            min,
            max: max.max(min),
            preferred: preferred.max(0),
        }
    }

    /// Resolve a size from the seed.
    pub fn select(&self, seed: Seed) -> Outcome<usize> {
        let outcome = match *self {
            Self::NoSizeParameters => seed.next_int_bounded(DEFAULT_RANGE),
            Self::PreferredOnly { preferred } => Outcome::new(seed, preferred),
            Self::MinOnly { min } => open_range(min, seed),
            Self::MaxOnly { max } => seed.next_int_bounded(max),
            Self::MinPreferred { min, preferred } => {
                prefer(seed, preferred, |next| open_range(min, next))
            }
            Self::MaxPreferred { max, preferred } => {
                prefer(seed, preferred, |next| next.next_int_bounded(max))
            }
            Self::MinMax { min, max } => seed.next_int_between(min, max),
            Self::MinMaxPreferred { min, max, preferred } => {
                prefer(seed, preferred, |next| next.next_int_between(min, max))
            }
        };
        // every branch yields a value >= 0
        outcome.map(|size| size as usize)
    }
}

impl Default for SizeSelector {
    fn default() -> Self {
        Self::NoSizeParameters
    }
}

fn clamp_open_min(min: i32) -> i32 {
    min.clamp(0, i32::MAX - DEFAULT_RANGE)
}

fn open_range(min: i32, seed: Seed) -> Outcome<i32> {
    seed.next_int_exclusive(min, min + DEFAULT_RANGE)
}

/// The prefer draw always advances the seed; the fallback starts from the
/// advanced seed.
fn prefer(seed: Seed, preferred: i32, otherwise: impl FnOnce(Seed) -> Outcome<i32>) -> Outcome<i32> {
    let roll = seed.next_int_bounded(PREFER_DENOMINATOR);
    if roll.value < PREFER_NUMERATOR {
        Outcome::new(roll.next_seed, preferred)
    } else {
        otherwise(roll.next_seed)
    }
}
