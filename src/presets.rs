//! Named demonstration generators.
//!
//! Each preset builds a generator from the core algebra and wraps it as a
//! [`Sampler`], which hides the value type so the CLI can run any preset the
//! same way.

use kraftwerk_core::{
    at_least_one_of_values, boolean, byte, bytes, constant, double_between, either, frequency,
    gaussian, int, int_between, int_exclusive, list, list_of_n, maybe, non_empty_list,
    one_of_values, tupled, ConfigError, GeneratedStream, Generator, Parameters, Seed,
    StandardInterpreter, Trace, TracingInterpreter,
};
use serde::Serialize;
use std::fmt::Debug;

/// One produced value, rendered for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Position in the worker's stream
    pub index: usize,
    /// Seed signature the value was produced from
    pub seed: i64,
    /// `Debug` rendering of the value
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Trace>,
}

/// A generator with its value type erased.
pub trait Sampler: Send + Sync {
    /// Pull `count` values starting at `seed`.
    fn sample(&self, parameters: &Parameters, seed: Seed, count: usize) -> Vec<Sample>;

    /// Like [`sample`](Self::sample), recording a trace for every value.
    fn sample_traced(&self, parameters: &Parameters, seed: Seed, count: usize) -> Vec<Sample>;
}

impl<A: Debug + 'static> Sampler for Generator<A> {
    fn sample(&self, parameters: &Parameters, seed: Seed, count: usize) -> Vec<Sample> {
        let mut stream =
            GeneratedStream::new(self.clone(), seed, StandardInterpreter::new(parameters.clone()));
        let mut samples = Vec::with_capacity(count);
        for index in 0..count {
            let seed = stream.current_seed().seed_value();
            let Some(value) = stream.next() else { break };
            samples.push(Sample {
                index,
                seed,
                value: format!("{value:?}"),
                trace: None,
            });
        }
        samples
    }

    fn sample_traced(&self, parameters: &Parameters, seed: Seed, count: usize) -> Vec<Sample> {
        let mut stream =
            GeneratedStream::new(self.clone(), seed, TracingInterpreter::new(parameters.clone()));
        let mut samples = Vec::with_capacity(count);
        for index in 0..count {
            let seed = stream.current_seed().seed_value();
            let Some(traced) = stream.next() else { break };
            samples.push(Sample {
                index,
                seed,
                value: format!("{:?}", traced.value),
                trace: Some(traced.trace),
            });
        }
        samples
    }
}

/// A named generator.
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Result<Box<dyn Sampler>, ConfigError>,
}

impl Preset {
    pub fn build(&self) -> Result<Box<dyn Sampler>, ConfigError> {
        (self.build)()
    }
}

impl Debug for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preset")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

fn boxed<A: Debug + 'static>(generator: Generator<A>) -> Box<dyn Sampler> {
    Box::new(generator)
}

fn flat_map_list() -> Result<Box<dyn Sampler>, ConfigError> {
    let generator = int_between(1, 10)?
        .labeled("length")
        .flat_map(|n| list_of_n(n as usize, boolean()).labeled("flags"));
    Ok(boxed(generator))
}

fn tuple() -> Result<Box<dyn Sampler>, ConfigError> {
    Ok(boxed(tupled!(
        constant("x").labeled("tag"),
        int_exclusive(0, 5)?.labeled("value"),
    )))
}

fn ints() -> Result<Box<dyn Sampler>, ConfigError> {
    Ok(boxed(int().labeled("int")))
}

fn weighted() -> Result<Box<dyn Sampler>, ConfigError> {
    let generator = frequency(vec![
        (1, constant("rare").labeled("rare")),
        (3, constant("uncommon").labeled("uncommon")),
        (6, constant("common").labeled("common")),
    ])?;
    Ok(boxed(generator))
}

fn optional() -> Result<Box<dyn Sampler>, ConfigError> {
    Ok(boxed(tupled!(
        maybe(int_between(0, 99)?).labeled("maybe"),
        either(boolean(), bytes(4)).labeled("either"),
    )))
}

fn nested() -> Result<Box<dyn Sampler>, ConfigError> {
    let row = list(byte()).labeled("row");
    Ok(boxed(non_empty_list(row).labeled("rows")))
}

fn coordinates() -> Result<Box<dyn Sampler>, ConfigError> {
    Ok(boxed(tupled!(
        double_between(-90.0, 90.0)?.labeled("latitude"),
        double_between(-180.0, 180.0)?.labeled("longitude"),
    )))
}

fn palette() -> Result<Box<dyn Sampler>, ConfigError> {
    let base = one_of_values(["red", "green", "blue"])?.labeled("base");
    let extras = at_least_one_of_values(["alpha", "shade", "tint", "tone"])?.labeled("extras");
    Ok(boxed(tupled!(base, extras)))
}

fn normal() -> Result<Box<dyn Sampler>, ConfigError> {
    Ok(boxed(gaussian().labeled("gaussian")))
}

/// All presets, in listing order.
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "flat-map-list",
        description: "A length in [1, 10], then that many booleans",
        build: flat_map_list,
    },
    Preset {
        name: "tuple",
        description: "The constant \"x\" paired with an int in [0, 5)",
        build: tuple,
    },
    Preset {
        name: "ints",
        description: "Full-range 32-bit integers",
        build: ints,
    },
    Preset {
        name: "weighted",
        description: "Weighted choice between three labels (1:3:6)",
        build: weighted,
    },
    Preset {
        name: "optional",
        description: "An optional int paired with a boolean-or-bytes",
        build: optional,
    },
    Preset {
        name: "nested",
        description: "A non-empty list of byte lists, sized by the size parameters",
        build: nested,
    },
    Preset {
        name: "coordinates",
        description: "Latitude and longitude pairs",
        build: coordinates,
    },
    Preset {
        name: "palette",
        description: "A base colour and a non-empty subset of modifiers",
        build: palette,
    },
    Preset {
        name: "gaussian",
        description: "Standard normal doubles",
        build: normal,
    },
];

/// Look up a preset by name.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_builds() {
        for preset in PRESETS {
            assert!(preset.build().is_ok(), "{} failed to build", preset.name);
        }
    }

    #[test]
    fn test_names_are_unique() {
        for (i, preset) in PRESETS.iter().enumerate() {
            assert!(PRESETS[i + 1..].iter().all(|other| other.name != preset.name));
        }
    }

    #[test]
    fn test_sample_records_seeds() {
        let sampler = find("ints").unwrap().build().unwrap();
        let seed = Seed::new(5);
        let samples = sampler.sample(&Parameters::default(), seed, 3);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].seed, seed.seed_value());
        assert_ne!(samples[0].seed, samples[1].seed);
        assert!(samples.iter().all(|s| s.trace.is_none()));
    }

    #[test]
    fn test_traced_sample_matches_plain() {
        let sampler = find("flat-map-list").unwrap().build().unwrap();
        let parameters = Parameters::default();
        let plain = sampler.sample(&parameters, Seed::new(11), 5);
        let traced = sampler.sample_traced(&parameters, Seed::new(11), 5);
        for (p, t) in plain.iter().zip(&traced) {
            assert_eq!(p.value, t.value);
            assert_eq!(p.seed, t.seed);
            assert!(t.trace.as_ref().and_then(|trace| trace.find("length")).is_some());
        }
    }
}
