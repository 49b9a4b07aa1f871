//! Sampling configuration files.
//!
//! A configuration file fixes the seed, the number of values and the size and
//! bias parameters handed to the interpreter. YAML and TOML are both accepted;
//! the format follows the file extension.
//!
//! ```yaml
//! seed: 42
//! count: 5
//! size:
//!   min_size: 1
//!   max_size: 8
//! bias:
//!   enabled: true
//!   inner_weight: 100
//!   size_inner_weight: 20
//! ```

use kraftwerk_core::bias::{DEFAULT_INNER_WEIGHT, DEFAULT_SIZE_INNER_WEIGHT};
use kraftwerk_core::{ConfigError, Parameters, SizeParameters, StandardBias};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error parsing TOML
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Parsed values that the generators would reject
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Edge-case bias settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    pub enabled: bool,
    pub inner_weight: u32,
    pub size_inner_weight: u32,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inner_weight: DEFAULT_INNER_WEIGHT,
            size_inner_weight: DEFAULT_SIZE_INNER_WEIGHT,
        }
    }
}

/// Everything needed to reproduce one sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Initial seed; drawn from system entropy when absent
    pub seed: Option<i64>,
    /// Number of values per worker
    pub count: i64,
    pub size: SizeParameters,
    pub bias: BiasConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            count: 10,
            size: SizeParameters::default(),
            bias: BiasConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Load from a `.yaml`/`.yml` or `.toml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let content = fs::read_to_string(path)?;
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(ConfigFileError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigFileError> {
        let config: GenerationConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigFileError> {
        let config: GenerationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count < 0 {
            return Err(ConfigError::NegativeCount(self.count));
        }
        self.size.validate()
    }

    /// Interpreter parameters for these settings.
    pub fn to_parameters(&self) -> Parameters {
        let parameters = Parameters::default().with_size_parameters(self.size);
        if self.bias.enabled {
            parameters.with_bias(StandardBias::new(
                self.bias.inner_weight,
                self.bias.size_inner_weight,
            ))
        } else {
            parameters.without_bias()
        }
    }

    /// `count` as a length; only meaningful after [`validate`](Self::validate).
    pub fn count(&self) -> usize {
        usize::try_from(self.count).unwrap_or(0)
    }
}
