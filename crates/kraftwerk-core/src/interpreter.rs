//! Interpreters: evaluate an instruction tree against a seed.
//!
//! # Architecture
//!
//! ```text
//! StandardInterpreter ──┐
//!                       ├──> Evaluator<R: Recorder> ──> Outcome<Value>
//! TracingInterpreter  ──┘          │
//!                                  └── R = Silent | TraceRecorder
//! ```
//!
//! There is exactly one per-variant evaluation algorithm. The two public
//! interpreters differ only in the recorder they plug into it, so a traced
//! run always yields the same value and next seed as a standard run.

use crate::bias::{BiasSetting, DoubleRange, FloatRange, IntRange, LongRange};
use crate::generator::Generator;
use crate::instruction::{Instruction, Primitive};
use crate::outcome::Outcome;
use crate::parameters::Parameters;
use crate::seed::Seed;
use crate::trace::Trace;
use crate::value::{erase, unerase, Value};
use std::fmt::Debug;
use tracing::trace;

/// Turns a generator and a seed into an output and the next seed.
pub trait Interpreter {
    type Output<A>;

    fn parameters(&self) -> &Parameters;

    fn run<A: Debug + 'static>(&self, generator: &Generator<A>, seed: Seed) -> Outcome<Self::Output<A>>;
}

/// Produces plain values.
#[derive(Debug, Clone, Default)]
pub struct StandardInterpreter {
    parameters: Parameters,
}

impl StandardInterpreter {
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

impl Interpreter for StandardInterpreter {
    type Output<A> = A;

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run<A: Debug + 'static>(&self, generator: &Generator<A>, seed: Seed) -> Outcome<A> {
        Evaluator::new(&self.parameters, Silent)
            .eval(generator.instruction(), seed)
            .map(unerase::<A>)
    }
}

/// A value together with the trace of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Traced<A> {
    pub value: A,
    pub trace: Trace,
}

/// Produces values plus a [`Trace`] tree.
#[derive(Debug, Clone, Default)]
pub struct TracingInterpreter {
    parameters: Parameters,
}

impl TracingInterpreter {
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

impl Interpreter for TracingInterpreter {
    type Output<A> = Traced<A>;

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run<A: Debug + 'static>(&self, generator: &Generator<A>, seed: Seed) -> Outcome<Traced<A>> {
        let mut evaluator = Evaluator::new(&self.parameters, TraceRecorder::default());
        let outcome = evaluator.eval(generator.instruction(), seed);
        let trace = evaluator.recorder.finish();
        outcome.map(|value| Traced {
            value: unerase::<A>(value),
            trace,
        })
    }
}

/// Observer of node entry and exit during evaluation.
trait Recorder {
    fn enter(&mut self, instruction: &Instruction, seed: Seed);
    fn leave(&mut self, value: &Value);
}

struct Silent;

impl Recorder for Silent {
    #[inline]
    fn enter(&mut self, _instruction: &Instruction, _seed: Seed) {}

    #[inline]
    fn leave(&mut self, _value: &Value) {}
}

/// Builds the trace tree with a stack of open nodes.
#[derive(Default)]
struct TraceRecorder {
    open: Vec<Trace>,
    root: Option<Trace>,
}

impl TraceRecorder {
    fn finish(self) -> Trace {
        match self.root {
            Some(root) => root,
            None => unreachable!("evaluation always records a root node"),
        }
    }
}

impl Recorder for TraceRecorder {
    fn enter(&mut self, instruction: &Instruction, seed: Seed) {
        self.open.push(Trace {
            description: instruction.description(),
            label: instruction.label().map(str::to_string),
            seed_value: seed.seed_value(),
            value: String::new(),
            children: Vec::new(),
        });
    }

    fn leave(&mut self, value: &Value) {
        let Some(mut node) = self.open.pop() else {
            unreachable!("leave without matching enter");
        };
        node.value = format!("{value:?}");
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
    }
}

struct Evaluator<'p, R> {
    parameters: &'p Parameters,
    recorder: R,
}

impl<'p, R: Recorder> Evaluator<'p, R> {
    fn new(parameters: &'p Parameters, recorder: R) -> Self {
        Self {
            parameters,
            recorder,
        }
    }

    fn eval(&mut self, instruction: &Instruction, seed: Seed) -> Outcome<Value> {
        self.recorder.enter(instruction, seed);
        let outcome = self.step(instruction.without_metadata(), seed);
        self.recorder.leave(&outcome.value);
        outcome
    }

    fn step(&mut self, instruction: &Instruction, seed: Seed) -> Outcome<Value> {
        match instruction {
            Instruction::Constant(value) => Outcome::new(seed, value()),
            Instruction::Primitive(primitive) => self.primitive(*primitive, seed),
            Instruction::Mapped { f, operand } => self.eval(operand, seed).map(|value| f(value)),
            Instruction::FlatMapped { f, operand } => {
                let (next, value) = self.eval(operand, seed).into_parts();
                let continuation = f(value);
                self.eval(&continuation, next)
            }
            Instruction::Sized(f) => {
                let (next, size) = self.resolve_size(seed).into_parts();
                trace!(size, "resolved size");
                let sized = f(size);
                self.eval(&sized, next)
            }
            // only reached for a wrapper nested by hand; it gets its own node
            Instruction::WithMetadata { .. } => self.eval(instruction, seed),
            Instruction::Aggregate(aggregate) => {
                let mut builder = (aggregate.initial)();
                let mut current = seed;
                for element in aggregate.elements() {
                    let (next, value) = self.eval(element, current).into_parts();
                    builder = (aggregate.add)(builder, value);
                    current = next;
                }
                Outcome::new(current, (aggregate.build)(builder))
            }
            Instruction::Product { operands, pack } => {
                let mut values = Vec::with_capacity(operands.len());
                let mut current = seed;
                for operand in operands {
                    let (next, value) = self.eval(operand, current).into_parts();
                    values.push(value);
                    current = next;
                }
                Outcome::new(current, pack(values))
            }
            Instruction::Choice(choice) => {
                let roll = seed.next_int_bounded(choice.total_weight());
                let index = choice.bucket(roll.value);
                trace!(
                    roll = roll.value,
                    index,
                    total_weight = choice.total_weight(),
                    "selected alternative"
                );
                self.eval(&choice.alternatives()[index], roll.next_seed)
            }
        }
    }

    /// Size from the active selector, with size bias applied on top.
    fn resolve_size(&self, seed: Seed) -> Outcome<usize> {
        let selector = self.parameters.size_selector();
        match self.parameters.bias().size_bias(selector) {
            Some(bias) => bias.apply(seed, |next| selector.select(next)),
            None => selector.select(seed),
        }
    }

    fn primitive(&self, primitive: Primitive, seed: Seed) -> Outcome<Value> {
        let bias = self.parameters.bias();
        match primitive {
            Primitive::Int => biased(bias.int_bias(IntRange::FULL), seed, Seed::next_int),
            Primitive::IntBounded { bound } => {
                biased(bias.int_bias(IntRange::new(0, bound - 1)), seed, |s| {
                    s.next_int_bounded(bound)
                })
            }
            Primitive::IntBetween { min, max } => {
                biased(bias.int_bias(IntRange::new(min, max)), seed, |s| {
                    s.next_int_between(min, max)
                })
            }
            Primitive::IntExclusive { origin, bound } => {
                biased(bias.int_bias(IntRange::new(origin, bound - 1)), seed, |s| {
                    s.next_int_exclusive(origin, bound)
                })
            }
            Primitive::IntIndex { bound } => seed.next_int_bounded(bound).map(erase),
            Primitive::Long => biased(bias.long_bias(LongRange::FULL), seed, Seed::next_long),
            Primitive::LongBounded { bound } => {
                biased(bias.long_bias(LongRange::new(0, bound - 1)), seed, |s| {
                    s.next_long_bounded(bound)
                })
            }
            Primitive::LongBetween { min, max } => {
                biased(bias.long_bias(LongRange::new(min, max)), seed, |s| {
                    s.next_long_between(min, max)
                })
            }
            Primitive::LongExclusive { origin, bound } => {
                biased(bias.long_bias(LongRange::new(origin, bound - 1)), seed, |s| {
                    s.next_long_exclusive(origin, bound)
                })
            }
            Primitive::LongIndex { bound } => seed.next_long_bounded(bound).map(erase),
            Primitive::Float => {
                let range = FloatRange {
                    origin: 0.0,
                    end: 1.0,
                };
                biased(bias.float_bias(range), seed, Seed::next_float)
            }
            Primitive::FloatScaled { scale } => {
                let range = FloatRange {
                    origin: 0.0,
                    end: scale,
                };
                biased(bias.float_bias(range), seed, |s| {
                    s.next_float().map(|unit| unit * scale)
                })
            }
            Primitive::Double => {
                let range = DoubleRange {
                    origin: 0.0,
                    end: 1.0,
                };
                biased(bias.double_bias(range), seed, Seed::next_double)
            }
            Primitive::DoubleScaled { scale } => {
                let range = DoubleRange {
                    origin: 0.0,
                    end: scale,
                };
                biased(bias.double_bias(range), seed, |s| {
                    s.next_double().map(|unit| unit * scale)
                })
            }
            Primitive::Boolean => seed.next_boolean().map(erase),
            Primitive::BooleanWeighted {
                false_weight,
                true_weight,
            } => {
                // construction guarantees the total fits in i32
                let total = (false_weight + true_weight) as i32;
                seed.next_int_bounded(total)
                    .map(|roll| erase(roll >= false_weight as i32))
            }
            Primitive::Byte => biased(bias.byte_bias(), seed, Seed::next_byte),
            Primitive::Short => biased(bias.short_bias(), seed, Seed::next_short),
            Primitive::Bytes { count } => seed.next_bytes(count).map(erase),
            Primitive::Gaussian => seed.next_gaussian().map(erase),
        }
    }
}

fn biased<A: Clone + Debug + 'static>(
    setting: Option<BiasSetting<A>>,
    seed: Seed,
    draw: impl FnOnce(Seed) -> Outcome<A>,
) -> Outcome<Value> {
    match setting {
        Some(setting) => setting.apply(seed, draw),
        None => draw(seed),
    }
    .map(erase)
}
