//! Fixed-arity products.
//!
//! Components run left to right; each one starts from the seed the previous
//! one returned.

use crate::generator::Generator;
use crate::instruction::Instruction;
use crate::value::{erase, unerase, Value};
use std::fmt::Debug;
use std::sync::Arc;

fn next_component<A: 'static>(values: &mut impl Iterator<Item = Value>) -> A {
    match values.next() {
        Some(value) => unerase(value),
        None => unreachable!("product produced fewer values than its arity"),
    }
}

macro_rules! tupled_fn {
    ($(#[$doc:meta])* $name:ident => $($arg:ident: $T:ident),+) => {
        $(#[$doc])*
        pub fn $name<$($T: Debug + 'static),+>($($arg: Generator<$T>),+) -> Generator<($($T,)+)> {
            Generator::from_instruction(Instruction::Product {
                operands: vec![$(Arc::clone($arg.instruction())),+],
                pack: Arc::new(|values: Vec<Value>| {
                    let mut values = values.into_iter();
                    erase(($(next_component::<$T>(&mut values),)+))
                }),
            })
        }
    };
}

tupled_fn!(
    /// Pair of independent draws.
    tupled2 => a: A, b: B
);
tupled_fn!(tupled3 => a: A, b: B, c: C);
tupled_fn!(tupled4 => a: A, b: B, c: C, d: D);
tupled_fn!(tupled5 => a: A, b: B, c: C, d: D, e: E);
tupled_fn!(tupled6 => a: A, b: B, c: C, d: D, e: E, f: F);
tupled_fn!(tupled7 => a: A, b: B, c: C, d: D, e: E, f: F, g: G);
tupled_fn!(tupled8 => a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H);

/// Tuple of 2 to 8 generators.
///
/// ```
/// use kraftwerk_core::{constant, int_exclusive, tupled, Seed};
///
/// let generator = tupled!(constant("x"), int_exclusive(0, 5).unwrap());
/// let (x, v) = generator.run(Seed::new(7)).value;
/// assert_eq!(x, "x");
/// assert!((0..5).contains(&v));
/// ```
#[macro_export]
macro_rules! tupled {
    ($a:expr, $b:expr $(,)?) => {
        $crate::tupled2($a, $b)
    };
    ($a:expr, $b:expr, $c:expr $(,)?) => {
        $crate::tupled3($a, $b, $c)
    };
    ($a:expr, $b:expr, $c:expr, $d:expr $(,)?) => {
        $crate::tupled4($a, $b, $c, $d)
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr $(,)?) => {
        $crate::tupled5($a, $b, $c, $d, $e)
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr $(,)?) => {
        $crate::tupled6($a, $b, $c, $d, $e, $f)
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr $(,)?) => {
        $crate::tupled7($a, $b, $c, $d, $e, $f, $g)
    };
    ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr, $h:expr $(,)?) => {
        $crate::tupled8($a, $b, $c, $d, $e, $f, $g, $h)
    };
}
