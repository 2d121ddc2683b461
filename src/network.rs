use std::fmt;

use log::{debug, info, warn};

use ndarray::{ArrayView1, Axis};
use ndarray_stats::QuantileExt;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use serde::{Deserialize, Serialize};

use crate::err::{NetError, NetResult};
use crate::layer::Layer;
use crate::layer_fabric::{adapt_weights, create_layer};
use crate::learn_params::ForwardPass;
use crate::util::{Float, WsBlob, WsMat};

/// Feedforward network, layer 0 is the input layer, the last one is the output layer.
///
/// For every layer except the last, each neuron carries exactly as many weights
/// as the next layer has neurons. Output-layer neurons carry none.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SerdeNetwork")]
pub struct Network {
    layers: Vec<Layer>,
}

/// Helper class to validate on deserialization
#[derive(Deserialize)]
struct SerdeNetwork {
    layers: Vec<Layer>,
}

impl TryFrom<SerdeNetwork> for Network {
    type Error = NetError;

    fn try_from(value: SerdeNetwork) -> Result<Self, Self::Error> {
        Network::from_layers(value.layers)
    }
}

/// Normalized Xavier bound for one layer boundary
pub fn xavier_bound(fan_in: usize, fan_out: usize) -> Float {
    (6.0 as Float).sqrt() / ((fan_in + fan_out) as Float).sqrt()
}

impl Network {
    pub fn from_layers(layers: Vec<Layer>) -> NetResult<Self> {
        let net = Self { layers };
        net.validate()?;
        Ok(net)
    }

    /// Checks neuron counts and that weight vectors fit the next layer
    pub fn validate(&self) -> NetResult<()> {
        for (idx, l) in self.layers.iter().enumerate() {
            if l.is_empty() {
                return Err(NetError::InvalidLayerSize);
            }

            let expected = self.layers.get(idx + 1).map(|next| next.len());

            for n in &l.neurons {
                if n.weights_len() != expected {
                    return Err(NetError::WeightVectorSizeMismatch {
                        expected: expected.unwrap_or(0),
                        actual: n.weights_len().unwrap_or(0),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layers_count(&self) -> usize {
        self.layers.len()
    }

    pub fn neuron_counts(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.len()).collect()
    }

    pub fn input_len(&self) -> usize {
        self.layers.first().map(|l| l.len()).unwrap_or(0)
    }

    pub fn output_len(&self) -> usize {
        self.layers.last().map(|l| l.len()).unwrap_or(0)
    }

    /// Pure read of a layer's outgoing weights as `[neurons][next layer neurons]`
    pub fn get_weights_from_layer(layer: &Layer) -> Option<WsMat> {
        layer.weights_matrix()
    }

    /// Every boundary matrix, input side first
    pub fn weights(&self) -> WsBlob {
        self.layers.iter().filter_map(|l| l.weights_matrix()).collect()
    }

    pub fn set_layer_weights(&mut self, index: usize, weights: &WsMat) -> NetResult<()> {
        let len = self.layers.len();
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(NetError::IndexOutOfRange { index, len })?;

        layer.update_weights(weights)
    }

    /// Adds one delta matrix per boundary. All shapes are checked before any weight changes.
    pub fn apply_deltas(&mut self, deltas: &[WsMat]) -> NetResult<()> {
        let boundaries = self.layers.len().saturating_sub(1);

        if deltas.len() != boundaries {
            return Err(NetError::ArraySizeMismatch {
                expected: boundaries,
                actual: deltas.len(),
            });
        }

        for (i, d) in deltas.iter().enumerate() {
            let shape = (self.layers[i].len(), self.layers[i + 1].len());

            if d.dim() != shape {
                return Err(NetError::WeightVectorSizeMismatch {
                    expected: shape.0 * shape.1,
                    actual: d.len(),
                });
            }
        }

        for (l, d) in self.layers.iter_mut().zip(deltas.iter()) {
            l.add_delta_weights(d)?;
        }

        Ok(())
    }

    /// Forward pass retaining raw and activated values of every layer
    pub fn calculate_output<F>(&self, input: ArrayView1<Float>, activation: F) -> NetResult<ForwardPass>
    where
        F: Fn(Float) -> Float,
    {
        if input.len() != self.input_len() {
            return Err(NetError::InputSizeMismatch {
                expected: self.input_len(),
                actual: input.len(),
            });
        }

        let mut pass = ForwardPass::default();
        pass.outputs_per_layer.push(input.to_owned());
        pass.raw_per_layer.push(input.to_owned());

        let mut prev_weights = match self.layers.first().and_then(|l| l.weights_matrix()) {
            Some(ws) => ws,
            None => return Ok(pass),
        };

        for l in self.layers.iter().skip(1) {
            let prev_out = pass.outputs_per_layer.last().cloned().unwrap_or_default();
            let out = l.calculate_outputs(prev_out.view(), &prev_weights, &activation)?;

            pass.outputs_per_layer.push(out.output);
            pass.raw_per_layer.push(out.raw);

            let next_weights = out.current_weights;
            pass.weights_per_layer.push(prev_weights);

            match next_weights {
                Some(ws) => prev_weights = ws,
                None => break,
            }
        }

        Ok(pass)
    }

    fn check_index(&self, index: usize, min: usize, max: usize) -> NetResult<()> {
        if index < min || index > max || max >= self.layers.len() {
            warn!("Rejected layer index {} for network {}", index, self);
            return Err(NetError::IndexOutOfRange {
                index,
                len: self.layers.len(),
            });
        }

        Ok(())
    }

    /// Inserts a zeroed layer at `index`, between the input and output layers
    pub fn insert_hidden_layer(&mut self, index: usize, neuron_count: usize) -> NetResult<()> {
        let len = self.layers.len();
        self.check_index(index, 1, len.saturating_sub(1))?;

        if neuron_count == 0 {
            return Err(NetError::InvalidLayerSize);
        }

        let new_layer = create_layer(neuron_count, Some(self.layers[index].len()));
        self.layers[index - 1] = adapt_weights(&self.layers[index - 1], Some(neuron_count));
        self.layers.insert(index, new_layer);

        info!("Inserted hidden layer {} with {} neurons : {}", index, neuron_count, self);

        Ok(())
    }

    pub fn remove_hidden_layer(&mut self, index: usize) -> NetResult<()> {
        let len = self.layers.len();

        if len < 3 {
            return Err(NetError::IndexOutOfRange { index, len });
        }

        self.check_index(index, 1, len - 2)?;

        self.layers.remove(index);

        let next_len = self.layers[index].len();
        if self.layers[index - 1].outgoing_len() != Some(next_len) {
            self.layers[index - 1] = adapt_weights(&self.layers[index - 1], Some(next_len));
        }

        info!("Removed hidden layer {} : {}", index, self);

        Ok(())
    }

    pub fn change_layer_neuron_amount(&mut self, index: usize, neuron_count: usize) -> NetResult<()> {
        let len = self.layers.len();
        self.check_index(index, 0, len.saturating_sub(1))?;

        if neuron_count == 0 {
            return Err(NetError::InvalidLayerSize);
        }

        let outgoing = self.layers.get(index + 1).map(|l| l.len());
        self.layers[index] = create_layer(neuron_count, outgoing);

        if index > 0 {
            self.layers[index - 1] = adapt_weights(&self.layers[index - 1], Some(neuron_count));
        }

        info!("Layer {} resized to {} neurons : {}", index, neuron_count, self);

        Ok(())
    }

    pub fn add_neuron_to_layer(&mut self, index: usize) -> NetResult<()> {
        let count = self.layer_len(index)?;
        self.change_layer_neuron_amount(index, count + 1)
    }

    pub fn remove_neuron_from_layer(&mut self, index: usize) -> NetResult<()> {
        let count = self.layer_len(index)?;
        self.change_layer_neuron_amount(index, count.saturating_sub(1))
    }

    fn layer_len(&self, index: usize) -> NetResult<usize> {
        self.layers
            .get(index)
            .map(|l| l.len())
            .ok_or(NetError::IndexOutOfRange {
                index,
                len: self.layers.len(),
            })
    }

    /// Normalized Xavier initialization of every weight
    pub fn initialize_weights<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for i in 0..self.layers.len().saturating_sub(1) {
            let fan_in = self.layers[i].len();
            let fan_out = self.layers[i + 1].len();
            let bound = xavier_bound(fan_in, fan_out);

            let ws = WsMat::random_using(
                (fan_in, fan_out),
                Uniform::new_inclusive(-bound, bound),
                rng,
            );

            for (neuron, row) in self.layers[i].neurons.iter_mut().zip(ws.axis_iter(Axis(0))) {
                neuron.weights = Some(row.to_owned());
            }

            debug!("Boundary {} initialized within +-{}", i, bound);
        }

        info!("Weights initialized for network {}", self);
    }

    /// Largest weight network-wide, `None` without any weights
    pub fn get_maximum_weight(&self) -> Option<Float> {
        self.weights()
            .iter()
            .filter_map(|m| QuantileExt::max(m).ok().copied())
            .reduce(Float::max)
    }

    pub fn get_minimum_weight(&self) -> Option<Float> {
        self.weights()
            .iter()
            .filter_map(|m| QuantileExt::min(m).ok().copied())
            .reduce(Float::min)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sizes: Vec<String> = self.layers.iter().map(|l| l.len().to_string()).collect();

        write!(f, "{}", sizes.join("-"))
    }
}
