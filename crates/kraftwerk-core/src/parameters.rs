//! Parameters shared by every node of one interpretation.

use crate::bias::{BiasSettings, NoBias, StandardBias};
use crate::size::{SizeParameters, SizeSelector};
use std::sync::Arc;

/// Size bounds and bias settings carried by an interpreter.
///
/// The selector is derived from the size parameters once, when they are set.
#[derive(Debug, Clone)]
pub struct Parameters {
    size_parameters: SizeParameters,
    size_selector: SizeSelector,
    bias: Arc<dyn BiasSettings>,
}

impl Parameters {
    pub fn new(size_parameters: SizeParameters, bias: Arc<dyn BiasSettings>) -> Self {
        Self {
            size_parameters,
            size_selector: SizeSelector::from_parameters(&size_parameters),
            bias,
        }
    }

    pub fn size_parameters(&self) -> &SizeParameters {
        &self.size_parameters
    }

    pub fn size_selector(&self) -> &SizeSelector {
        &self.size_selector
    }

    pub fn bias(&self) -> &dyn BiasSettings {
        self.bias.as_ref()
    }

    pub fn with_size_parameters(mut self, size_parameters: SizeParameters) -> Self {
        self.size_selector = SizeSelector::from_parameters(&size_parameters);
        self.size_parameters = size_parameters;
        self
    }

    pub fn with_bias(mut self, bias: impl BiasSettings + 'static) -> Self {
        self.bias = Arc::new(bias);
        self
    }

    pub fn without_bias(self) -> Self {
        self.with_bias(NoBias)
    }
}

impl Default for Parameters {
    /// No size limits, standard edge-case bias.
    fn default() -> Self {
        Self::new(
            SizeParameters::no_size_limits(),
            Arc::new(StandardBias::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::IntRange;

    #[test]
    fn test_default_parameters() {
        let parameters = Parameters::default();
        assert_eq!(parameters.size_selector(), &SizeSelector::NoSizeParameters);
        assert!(parameters.bias().int_bias(IntRange::FULL).is_some());
    }

    #[test]
    fn test_builders() {
        let parameters = Parameters::default()
            .with_size_parameters(SizeParameters::default().with_min_size(2).with_max_size(4))
            .without_bias();
        assert_eq!(
            parameters.size_selector(),
            &SizeSelector::MinMax { min: 2, max: 4 }
        );
        assert!(parameters.bias().int_bias(IntRange::FULL).is_none());
    }
}
