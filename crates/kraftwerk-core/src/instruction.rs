//! The instruction tree: an immutable recipe describing how to produce a value.
//!
//! `Instruction` is a closed sum type. Each interpreter matches it
//! exhaustively; nothing here consumes randomness or runs user code.

use crate::value::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub type ConstantFn = Arc<dyn Fn() -> Value + Send + Sync>;
pub type MapFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
pub type FlatMapFn = Arc<dyn Fn(Value) -> Arc<Instruction> + Send + Sync>;
pub type SizedFn = Arc<dyn Fn(usize) -> Arc<Instruction> + Send + Sync>;
pub type PackFn = Arc<dyn Fn(Vec<Value>) -> Value + Send + Sync>;

pub type InitialFn = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;
pub type AddFn = Arc<dyn Fn(Box<dyn Any>, Value) -> Box<dyn Any> + Send + Sync>;
pub type BuildFn = Arc<dyn Fn(Box<dyn Any>) -> Value + Send + Sync>;

/// A generation recipe.
pub enum Instruction {
    /// Always the same value; consumes no randomness
    Constant(ConstantFn),
    /// A single draw from the seed
    Primitive(Primitive),
    Mapped { f: MapFn, operand: Arc<Instruction> },
    FlatMapped { f: FlatMapFn, operand: Arc<Instruction> },
    /// Resolve a size, then run the instruction built for that size
    Sized(SizedFn),
    /// Label and application data; never nested
    WithMetadata {
        metadata: Metadata,
        operand: Arc<Instruction>,
    },
    Aggregate(Aggregate),
    /// Fixed-arity tuple of 2 to 8 components
    Product {
        operands: Vec<Arc<Instruction>>,
        pack: PackFn,
    },
    /// Weighted alternative
    Choice(Choice),
}

impl Instruction {
    /// Wrap `operand` with metadata.
    ///
    /// When `operand` already carries metadata the wrapper replaces it
    /// instead of nesting.
    pub fn with_metadata(metadata: Metadata, operand: &Arc<Instruction>) -> Instruction {
        match operand.as_ref() {
            Instruction::WithMetadata { operand: inner, .. } => Instruction::WithMetadata {
                metadata,
                operand: Arc::clone(inner),
            },
            _ => Instruction::WithMetadata {
                metadata,
                operand: Arc::clone(operand),
            },
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Instruction::WithMetadata { metadata, .. } => Some(metadata),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.metadata().and_then(Metadata::label)
    }

    /// The instruction itself, or the operand of a metadata wrapper.
    pub fn without_metadata(&self) -> &Instruction {
        match self {
            Instruction::WithMetadata { operand, .. } => operand.as_ref(),
            other => other,
        }
    }

    /// Short name of the recipe step, used as the default trace text.
    pub fn description(&self) -> String {
        match self {
            Instruction::Constant(_) => "constant".to_string(),
            Instruction::Primitive(primitive) => primitive.description(),
            Instruction::Mapped { .. } => "fmap".to_string(),
            Instruction::FlatMapped { .. } => "flatMap".to_string(),
            Instruction::Sized(_) => "sized".to_string(),
            Instruction::WithMetadata { operand, .. } => operand.description(),
            Instruction::Aggregate(_) => "aggregate".to_string(),
            Instruction::Product { operands, .. } => format!("product{}", operands.len()),
            Instruction::Choice(_) => "choice".to_string(),
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::WithMetadata { metadata, operand } => f
                .debug_struct("WithMetadata")
                .field("metadata", metadata)
                .field("operand", operand)
                .finish(),
            Instruction::Mapped { operand, .. } => {
                f.debug_struct("Mapped").field("operand", operand).finish()
            }
            Instruction::FlatMapped { operand, .. } => {
                f.debug_struct("FlatMapped").field("operand", operand).finish()
            }
            Instruction::Product { operands, .. } => {
                f.debug_struct("Product").field("operands", operands).finish()
            }
            Instruction::Aggregate(aggregate) => f
                .debug_struct("Aggregate")
                .field("elements", &aggregate.elements)
                .finish(),
            Instruction::Choice(choice) => f
                .debug_struct("Choice")
                .field("cumulative", &choice.cumulative)
                .field("alternatives", &choice.alternatives)
                .finish(),
            Instruction::Primitive(primitive) => f.debug_tuple("Primitive").field(primitive).finish(),
            other => f.write_str(&other.description()),
        }
    }
}

/// Primitive draws, one per seed operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Int,
    /// `[0, bound)`
    IntBounded { bound: i32 },
    /// `[min, max]`
    IntBetween { min: i32, max: i32 },
    /// `[origin, bound)`
    IntExclusive { origin: i32, bound: i32 },
    /// `[0, bound)`, never biased
    IntIndex { bound: i32 },
    Long,
    LongBounded { bound: i64 },
    LongBetween { min: i64, max: i64 },
    LongExclusive { origin: i64, bound: i64 },
    LongIndex { bound: i64 },
    /// `[0, 1)`
    Float,
    /// `[0, 1) * scale`
    FloatScaled { scale: f32 },
    Double,
    DoubleScaled { scale: f64 },
    Boolean,
    BooleanWeighted { false_weight: u32, true_weight: u32 },
    Byte,
    Short,
    Bytes { count: usize },
    Gaussian,
}

impl Primitive {
    pub fn description(&self) -> String {
        match *self {
            Primitive::Int => "int".to_string(),
            Primitive::IntBounded { bound } => interval("int", 0, bound, true),
            Primitive::IntBetween { min, max } => interval("int", min, max, false),
            Primitive::IntExclusive { origin, bound } => interval("int", origin, bound, true),
            Primitive::IntIndex { bound } => interval("index", 0, bound, true),
            Primitive::Long => "long".to_string(),
            Primitive::LongBounded { bound } => interval("long", 0, bound, true),
            Primitive::LongBetween { min, max } => interval("long", min, max, false),
            Primitive::LongExclusive { origin, bound } => interval("long", origin, bound, true),
            Primitive::LongIndex { bound } => interval("index", 0, bound, true),
            Primitive::Float => "float".to_string(),
            Primitive::FloatScaled { scale } => format!("float*{scale}"),
            Primitive::Double => "double".to_string(),
            Primitive::DoubleScaled { scale } => format!("double*{scale}"),
            Primitive::Boolean => "boolean".to_string(),
            Primitive::BooleanWeighted {
                false_weight,
                true_weight,
            } => format!("boolean({false_weight}:{true_weight})"),
            Primitive::Byte => "byte".to_string(),
            Primitive::Short => "short".to_string(),
            Primitive::Bytes { count } => format!("bytes[{count}]"),
            Primitive::Gaussian => "gaussian".to_string(),
        }
    }
}

fn interval(name: &str, low: impl fmt::Display, high: impl fmt::Display, exclusive: bool) -> String {
    let close = if exclusive { ')' } else { ']' };
    format!("{name}[{low}, {high}{close}")
}

/// Optional label and application data attached to an instruction.
#[derive(Clone, Default)]
pub struct Metadata {
    label: Option<String>,
    application_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Metadata {
    pub fn new(label: Option<String>, application_data: Option<Arc<dyn Any + Send + Sync>>) -> Self {
        Self {
            label,
            application_data,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn application_data(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.application_data.as_ref()
    }

    pub fn with_label(mut self, label: String) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_application_data(mut self, data: Arc<dyn Any + Send + Sync>) -> Self {
        self.application_data = Some(data);
        self
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("label", &self.label)
            .field("application_data", &self.application_data.is_some())
            .finish()
    }
}

/// Fold of an ordered element sequence into a builder.
///
/// `initial` runs exactly once per generation, so each run gets a fresh
/// builder.
pub struct Aggregate {
    pub(crate) initial: InitialFn,
    pub(crate) add: AddFn,
    pub(crate) build: BuildFn,
    pub(crate) elements: Vec<Arc<Instruction>>,
}

impl Aggregate {
    pub(crate) fn new(
        initial: InitialFn,
        add: AddFn,
        build: BuildFn,
        elements: Vec<Arc<Instruction>>,
    ) -> Self {
        Self {
            initial,
            add,
            build,
            elements,
        }
    }

    pub fn elements(&self) -> &[Arc<Instruction>] {
        &self.elements
    }
}

/// Weighted alternatives with a precomputed cumulative-weight table.
pub struct Choice {
    cumulative: Vec<i32>,
    alternatives: Vec<Arc<Instruction>>,
}

impl Choice {
    /// Both vectors have the same, non-zero length and the last cumulative
    /// weight is positive. Built only by the frequency module.
    pub(crate) fn new(cumulative: Vec<i32>, alternatives: Vec<Arc<Instruction>>) -> Self {
        Self {
            cumulative,
            alternatives,
        }
    }

    pub fn total_weight(&self) -> i32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn alternatives(&self) -> &[Arc<Instruction>] {
        &self.alternatives
    }

    /// Index of the first bucket whose cumulative weight exceeds `roll`.
    pub fn bucket(&self, roll: i32) -> usize {
        self.cumulative
            .partition_point(|&boundary| boundary <= roll)
            .min(self.alternatives.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::erase;

    fn constant(n: i32) -> Arc<Instruction> {
        Arc::new(Instruction::Constant(Arc::new(move || erase(n))))
    }

    #[test]
    fn test_metadata_replaces_instead_of_nesting() {
        let base = constant(1);
        let once = Arc::new(Instruction::with_metadata(
            Metadata::default().with_label("first".to_string()),
            &base,
        ));
        let twice = Instruction::with_metadata(
            Metadata::default().with_label("second".to_string()),
            &once,
        );

        assert_eq!(twice.label(), Some("second"));
        match &twice {
            Instruction::WithMetadata { operand, .. } => {
                assert!(Arc::ptr_eq(operand, &base));
            }
            other => panic!("expected metadata wrapper, got {other:?}"),
        }
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(Primitive::IntBounded { bound: 10 }.description(), "int[0, 10)");
        assert_eq!(Primitive::IntBetween { min: 1, max: 10 }.description(), "int[1, 10]");
        assert_eq!(Primitive::IntIndex { bound: 5 }.description(), "index[0, 5)");
        assert_eq!(Primitive::Bytes { count: 4 }.description(), "bytes[4]");
        let product = Instruction::Product {
            operands: vec![constant(1), constant(2), constant(3)],
            pack: Arc::new(|values| erase(values.len())),
        };
        assert_eq!(product.description(), "product3");
    }

    #[test]
    fn test_choice_bucket_skips_zero_weights() {
        // weights [2, 0, 3]
        let choice = Choice::new(vec![2, 2, 5], vec![constant(0), constant(1), constant(2)]);
        assert_eq!(choice.total_weight(), 5);
        assert_eq!(choice.bucket(0), 0);
        assert_eq!(choice.bucket(1), 0);
        assert_eq!(choice.bucket(2), 2);
        assert_eq!(choice.bucket(4), 2);
    }
}
