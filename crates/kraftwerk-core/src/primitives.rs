//! Primitive generators: one seed draw each.
//!
//! Constructors that take bounds validate them immediately and return a
//! [`ConfigError`] instead of a generator that would misbehave later.

use crate::error::{check_bound, check_float_range, check_min_max, check_origin_bound, ConfigError};
use crate::generator::Generator;
use crate::instruction::{Instruction, Primitive};

fn primitive<A>(primitive: Primitive) -> Generator<A> {
    Generator::from_instruction(Instruction::Primitive(primitive))
}

/// Any `i32`.
pub fn int() -> Generator<i32> {
    primitive(Primitive::Int)
}

/// `[0, bound)`
pub fn int_bounded(bound: i32) -> Result<Generator<i32>, ConfigError> {
    check_bound(bound as i64)?;
    Ok(primitive(Primitive::IntBounded { bound }))
}

/// `[min, max]`
pub fn int_between(min: i32, max: i32) -> Result<Generator<i32>, ConfigError> {
    check_min_max(min as i64, max as i64)?;
    Ok(primitive(Primitive::IntBetween { min, max }))
}

/// `[origin, bound)`
pub fn int_exclusive(origin: i32, bound: i32) -> Result<Generator<i32>, ConfigError> {
    check_origin_bound(origin as i64, bound as i64)?;
    Ok(primitive(Primitive::IntExclusive { origin, bound }))
}

/// An index into a collection of `bound` elements. Never biased.
pub fn int_index(bound: i32) -> Result<Generator<i32>, ConfigError> {
    check_bound(bound as i64)?;
    Ok(primitive(Primitive::IntIndex { bound }))
}

pub fn long() -> Generator<i64> {
    primitive(Primitive::Long)
}

pub fn long_bounded(bound: i64) -> Result<Generator<i64>, ConfigError> {
    check_bound(bound)?;
    Ok(primitive(Primitive::LongBounded { bound }))
}

pub fn long_between(min: i64, max: i64) -> Result<Generator<i64>, ConfigError> {
    check_min_max(min, max)?;
    Ok(primitive(Primitive::LongBetween { min, max }))
}

pub fn long_exclusive(origin: i64, bound: i64) -> Result<Generator<i64>, ConfigError> {
    check_origin_bound(origin, bound)?;
    Ok(primitive(Primitive::LongExclusive { origin, bound }))
}

pub fn long_index(bound: i64) -> Result<Generator<i64>, ConfigError> {
    check_bound(bound)?;
    Ok(primitive(Primitive::LongIndex { bound }))
}

/// `[0, 1)`
pub fn float() -> Generator<f32> {
    primitive(Primitive::Float)
}

/// `[0, 1) * scale`; a negative scale flips the interval.
pub fn float_scaled(scale: f32) -> Result<Generator<f32>, ConfigError> {
    if !scale.is_finite() {
        return Err(ConfigError::InvalidFloatRange {
            min: 0.0,
            max: scale as f64,
        });
    }
    Ok(primitive(Primitive::FloatScaled { scale }))
}

/// `[min, max)`, or exactly `min` when the bounds are equal.
///
/// A sum that rounds up to `max` is replaced by the largest value below it.
pub fn float_between(min: f32, max: f32) -> Result<Generator<f32>, ConfigError> {
    check_float_range(min as f64, max as f64)?;
    Ok(float_scaled(max - min)?.map(move |offset| {
        let value = min + offset;
        if value < max || min == max {
            value
        } else {
            below_f32(max)
        }
    }))
}

pub fn double() -> Generator<f64> {
    primitive(Primitive::Double)
}

pub fn double_scaled(scale: f64) -> Result<Generator<f64>, ConfigError> {
    if !scale.is_finite() {
        return Err(ConfigError::InvalidFloatRange {
            min: 0.0,
            max: scale,
        });
    }
    Ok(primitive(Primitive::DoubleScaled { scale }))
}

/// `[min, max)`, or exactly `min` when the bounds are equal.
pub fn double_between(min: f64, max: f64) -> Result<Generator<f64>, ConfigError> {
    check_float_range(min, max)?;
    Ok(double_scaled(max - min)?.map(move |offset| {
        let value = min + offset;
        if value < max || min == max {
            value
        } else {
            below_f64(max)
        }
    }))
}

/// Largest `f32` strictly below a finite `x`.
fn below_f32(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f32::from_bits(1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

/// Largest `f64` strictly below a finite `x`.
fn below_f64(x: f64) -> f64 {
    if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f64::from_bits(1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}

pub fn boolean() -> Generator<bool> {
    primitive(Primitive::Boolean)
}

/// `false` and `true` with the given relative weights.
pub fn boolean_weighted(false_weight: u32, true_weight: u32) -> Result<Generator<bool>, ConfigError> {
    let total = false_weight as i64 + true_weight as i64;
    if total == 0 {
        return Err(ConfigError::NoPositiveWeight);
    }
    if total > i32::MAX as i64 {
        return Err(ConfigError::WeightOverflow);
    }
    Ok(primitive(Primitive::BooleanWeighted {
        false_weight,
        true_weight,
    }))
}

/// `true` with probability `true_weight` percent.
pub fn boolean_with_true_weight(true_weight: u32) -> Result<Generator<bool>, ConfigError> {
    check_min_max(true_weight as i64, 100)?;
    boolean_weighted(100 - true_weight, true_weight)
}

pub fn byte() -> Generator<i8> {
    primitive(Primitive::Byte)
}

pub fn short() -> Generator<i16> {
    primitive(Primitive::Short)
}

/// `count` random bytes.
pub fn bytes(count: usize) -> Generator<Vec<u8>> {
    primitive(Primitive::Bytes { count })
}

/// Standard normal distribution.
pub fn gaussian() -> Generator<f64> {
    primitive(Primitive::Gaussian)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    fn sample<A: std::fmt::Debug + 'static>(generator: &Generator<A>, count: usize) -> Vec<A> {
        generator.stream(Seed::new(2024)).next_n(count)
    }

    #[test]
    fn test_validation() {
        assert_eq!(int_bounded(0).unwrap_err(), ConfigError::NonPositiveBound(0));
        assert_eq!(
            int_between(3, 2).unwrap_err(),
            ConfigError::InvalidRange { min: 3, max: 2 }
        );
        assert_eq!(
            int_exclusive(4, 4).unwrap_err(),
            ConfigError::OriginNotBelowBound { origin: 4, bound: 4 }
        );
        assert_eq!(long_index(-1).unwrap_err(), ConfigError::NonPositiveBound(-1));
        assert!(float_between(1.0, 0.0).is_err());
        assert!(double_scaled(f64::INFINITY).is_err());
        assert_eq!(
            boolean_weighted(0, 0).unwrap_err(),
            ConfigError::NoPositiveWeight
        );
        assert_eq!(
            boolean_with_true_weight(101).unwrap_err(),
            ConfigError::InvalidRange { min: 101, max: 100 }
        );
    }

    #[test]
    fn test_ranges_hold_under_bias() {
        assert!(sample(&int_between(-3, 3).unwrap(), 2000)
            .iter()
            .all(|n| (-3..=3).contains(n)));
        assert!(sample(&int_exclusive(10, 20).unwrap(), 2000)
            .iter()
            .all(|n| (10..20).contains(n)));
        assert!(sample(&long_between(5, 6).unwrap(), 500)
            .iter()
            .all(|n| (5..=6).contains(n)));
        assert!(sample(&int_index(3).unwrap(), 500)
            .iter()
            .all(|n| (0..3).contains(n)));
        assert!(sample(&double_between(-1.0, 1.0).unwrap(), 2000)
            .iter()
            .all(|x| (-1.0..1.0).contains(x)));
        assert!(sample(&float(), 2000).iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn test_between_excludes_upper_bound_after_rounding() {
        let max = 1.0 + f64::EPSILON;
        assert!(sample(&double_between(1.0, max).unwrap(), 500)
            .iter()
            .all(|&x| (1.0..max).contains(&x)));
        let max = 1.0 + f32::EPSILON;
        assert!(sample(&float_between(1.0, max).unwrap(), 500)
            .iter()
            .all(|&x| (1.0..max).contains(&x)));
        assert_eq!(double_between(2.5, 2.5).unwrap().run(Seed::new(1)).value, 2.5);

        assert!(below_f64(1.0) < 1.0 && below_f64(1.0) > 0.99);
        assert!(below_f64(0.0) < 0.0);
        assert!(below_f64(-1.0) < -1.0);
        assert!(below_f32(0.0) < 0.0);
    }

    #[test]
    fn test_boolean_weighted_extremes() {
        assert!(sample(&boolean_weighted(0, 5).unwrap(), 200).iter().all(|&b| b));
        assert!(sample(&boolean_with_true_weight(0).unwrap(), 200)
            .iter()
            .all(|&b| !b));
    }

    #[test]
    fn test_bytes_length() {
        assert_eq!(bytes(7).run(Seed::new(1)).value.len(), 7);
        assert!(bytes(0).run(Seed::new(1)).value.is_empty());
    }
}
