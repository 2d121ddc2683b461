use crate::activation::ActivationFunction;
use crate::config::TrainingConfig;
use crate::err::{NetError, NetResult};
use crate::layer::Layer;
use crate::layer_fabric::create_layer;
use crate::network::Network;
use crate::util::Float;

/// Fluent factory of zero-initialized networks.
///
/// ```
/// use layerwise::NetworkBuilder;
///
/// let net = NetworkBuilder::new().add_layers(&[3, 4, 3]).build().unwrap();
/// assert_eq!(net.neuron_counts(), vec![3, 4, 3]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct NetworkBuilder {
    sizes: Vec<usize>,
    cfg: TrainingConfig,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends layers with the given neuron counts, input side first
    pub fn add_layers(mut self, sizes: &[usize]) -> Self {
        self.sizes.extend_from_slice(sizes);
        self
    }

    pub fn set_learning_rate(mut self, lr: Float) -> Self {
        self.cfg.learning_rate = lr;
        self
    }

    pub fn set_activation_function(mut self, activation: ActivationFunction) -> Self {
        self.cfg.activation = activation;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.cfg
    }

    pub fn build(&self) -> NetResult<Network> {
        if self.sizes.is_empty() || self.sizes.contains(&0) {
            return Err(NetError::InvalidLayerSize);
        }

        let layers: Vec<Layer> = self
            .sizes
            .iter()
            .enumerate()
            .map(|(idx, size)| create_layer(*size, self.sizes.get(idx + 1).copied()))
            .collect();

        Network::from_layers(layers)
    }

    /// Network together with the training configuration set on this builder
    pub fn build_with_config(&self) -> NetResult<(Network, TrainingConfig)> {
        self.cfg.validate()?;
        Ok((self.build()?, self.cfg.clone()))
    }
}
