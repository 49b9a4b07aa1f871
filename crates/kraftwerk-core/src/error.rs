//! Configuration errors raised while building generators.

use thiserror::Error;

/// An invalid argument passed to a generator, size selector or bias
/// constructor.
///
/// These are raised eagerly at construction time, never during generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `min` is greater than `max`
    #[error("Invalid range: min ({min}) must not exceed max ({max})")]
    InvalidRange { min: i64, max: i64 },

    /// Exclusive bound is zero or negative
    #[error("Bound must be positive, got {0}")]
    NonPositiveBound(i64),

    /// Exclusive range with an empty interval
    #[error("Origin ({origin}) must be less than bound ({bound})")]
    OriginNotBelowBound { origin: i64, bound: i64 },

    /// A count or size below zero
    #[error("Count must be non-negative, got {0}")]
    NegativeCount(i64),

    /// Floating-point range that is inverted or not finite
    #[error("Invalid floating-point range: [{min}, {max}]")]
    InvalidFloatRange { min: f64, max: f64 },

    /// Weighted choice where every weight is zero
    #[error("At least one weight must be positive")]
    NoPositiveWeight,

    /// Weighted choice whose total exceeds the range of a bounded draw
    #[error("Total weight exceeds {}", i32::MAX)]
    WeightOverflow,

    /// Choice over zero alternatives
    #[error("Choice requires at least one alternative")]
    EmptyChoice,

    /// Bias setting without any interesting elements
    #[error("Bias setting requires at least one element")]
    EmptyBias,
}

pub(crate) fn check_min_max(min: i64, max: i64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange { min, max });
    }
    Ok(())
}

pub(crate) fn check_bound(bound: i64) -> Result<(), ConfigError> {
    if bound <= 0 {
        return Err(ConfigError::NonPositiveBound(bound));
    }
    Ok(())
}

pub(crate) fn check_origin_bound(origin: i64, bound: i64) -> Result<(), ConfigError> {
    if origin >= bound {
        return Err(ConfigError::OriginNotBelowBound { origin, bound });
    }
    Ok(())
}

pub(crate) fn check_float_range(min: f64, max: f64) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ConfigError::InvalidFloatRange { min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks() {
        assert!(check_min_max(1, 1).is_ok());
        assert_eq!(
            check_min_max(2, 1),
            Err(ConfigError::InvalidRange { min: 2, max: 1 })
        );
        assert_eq!(check_bound(0), Err(ConfigError::NonPositiveBound(0)));
        assert_eq!(
            check_origin_bound(5, 5),
            Err(ConfigError::OriginNotBelowBound { origin: 5, bound: 5 })
        );
        assert!(check_float_range(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidRange { min: 10, max: 1 };
        assert_eq!(
            err.to_string(),
            "Invalid range: min (10) must not exceed max (1)"
        );
        assert_eq!(
            ConfigError::WeightOverflow.to_string(),
            "Total weight exceeds 2147483647"
        );
    }
}
