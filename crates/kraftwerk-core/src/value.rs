//! Type-erased values flowing through the instruction tree.
//!
//! [`Generator`](crate::Generator) is the typed façade; internally every
//! produced value is boxed as a [`Value`] so a single interpreter can match
//! over the closed [`Instruction`](crate::Instruction) enum. The façade only
//! ever unboxes a value as the type its own constructor boxed, so a failed
//! downcast is a broken internal invariant rather than a user error.

use std::any::{type_name, Any};
use std::fmt::Debug;

/// Value produced by interpreting an instruction.
pub type Value = Box<dyn Erased>;

/// Any generated value: inspectable for traces, recoverable by type.
pub trait Erased: Any + Debug {
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + Debug> Erased for T {
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Box a value.
pub(crate) fn erase<A: Any + Debug>(value: A) -> Value {
    Box::new(value)
}

/// Recover a value boxed by [`erase`].
pub(crate) fn unerase<A: Any>(value: Value) -> A {
    match value.into_any().downcast::<A>() {
        Ok(value) => *value,
        Err(_) => unreachable!("generated value is not a {}", type_name::<A>()),
    }
}

/// Recover an aggregate builder boxed by its own `initial` closure.
pub(crate) fn unerase_builder<B: Any>(builder: Box<dyn Any>) -> B {
    match builder.downcast::<B>() {
        Ok(builder) => *builder,
        Err(_) => unreachable!("aggregate builder is not a {}", type_name::<B>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_value() {
        let value = erase(vec![1u8, 2, 3]);
        assert_eq!(format!("{value:?}"), "[1, 2, 3]");
        assert_eq!(unerase::<Vec<u8>>(value), vec![1, 2, 3]);
    }
}
