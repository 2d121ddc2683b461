use ndarray::{Array1, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::err::{NetError, NetResult};
use crate::neuron::Neuron;
use crate::util::{DataVec, Float, WsMat};

/// Result of evaluating one layer during the forward pass
#[derive(Clone, Debug)]
pub struct LayerOutputs {
    pub output: DataVec,
    pub raw: DataVec,
    /// This layer's outgoing weights, `None` for the output layer
    pub current_weights: Option<WsMat>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new(neurons: Vec<Neuron>) -> Self {
        Self { neurons }
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Length of every neuron's weight vector, `None` when the layer has none
    pub fn outgoing_len(&self) -> Option<usize> {
        self.neurons.first().and_then(|n| n.weights_len())
    }

    pub fn is_output(&self) -> bool {
        self.outgoing_len().is_none()
    }

    /// Outgoing weights reshaped as `[neurons][next layer neurons]`
    pub fn weights_matrix(&self) -> Option<WsMat> {
        let cols = self.outgoing_len()?;
        let mut mat = WsMat::zeros((self.len(), cols));

        for (mut row, neuron) in mat.axis_iter_mut(Axis(0)).zip(self.neurons.iter()) {
            if let Some(ws) = &neuron.weights {
                row.assign(ws);
            }
        }

        Some(mat)
    }

    /// Computes raw sums and activated outputs of this layer.
    ///
    /// `previous_weights` has one row per neuron of the previous layer and
    /// one column per neuron of this layer.
    pub fn calculate_outputs<F>(
        &self,
        input: ArrayView1<Float>,
        previous_weights: &WsMat,
        activation: F,
    ) -> NetResult<LayerOutputs>
    where
        F: Fn(Float) -> Float,
    {
        if previous_weights.ncols() != self.len() {
            return Err(NetError::WeightVectorSizeMismatch {
                expected: self.len(),
                actual: previous_weights.ncols(),
            });
        }

        let mut raw = Array1::zeros(self.len());

        for (i, entering) in previous_weights.axis_iter(Axis(1)).enumerate() {
            raw[i] = Neuron::calculate_output(input, entering)?;
        }

        let output = raw.mapv(|x| activation(x));

        Ok(LayerOutputs {
            output,
            raw,
            current_weights: self.weights_matrix(),
        })
    }

    fn check_shape(&self, mat: &WsMat) -> NetResult<()> {
        if mat.nrows() != self.len() {
            return Err(NetError::WeightVectorSizeMismatch {
                expected: self.len(),
                actual: mat.nrows(),
            });
        }

        let cols = self.outgoing_len().unwrap_or(0);

        if mat.ncols() != cols {
            return Err(NetError::WeightVectorSizeMismatch {
                expected: cols,
                actual: mat.ncols(),
            });
        }

        Ok(())
    }

    /// Replaces every neuron's weights. The output layer accepts only an empty-column matrix.
    pub fn update_weights(&mut self, new_weights: &WsMat) -> NetResult<()> {
        self.check_shape(new_weights)?;

        for (neuron, row) in self.neurons.iter_mut().zip(new_weights.axis_iter(Axis(0))) {
            if let Some(ws) = neuron.weights.as_mut() {
                ws.assign(&row);
            }
        }

        Ok(())
    }

    /// Elementwise in-place addition of a same-shaped delta matrix
    pub fn add_delta_weights(&mut self, deltas: &WsMat) -> NetResult<()> {
        self.check_shape(deltas)?;

        for (neuron, row) in self.neurons.iter_mut().zip(deltas.axis_iter(Axis(0))) {
            if let Some(ws) = neuron.weights.as_mut() {
                *ws += &row;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer_fabric::create_layer;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn weights_matrix_reshapes_neuron_weights() {
        let mut l = create_layer(2, Some(3));
        l.update_weights(&arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]))
            .unwrap();

        let m = l.weights_matrix().unwrap();
        assert_eq!(m, arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
        assert_eq!(l.weights_matrix().unwrap(), m);

        assert!(create_layer(2, None).weights_matrix().is_none());
    }

    #[test]
    fn calculate_outputs_uses_columns_of_previous_weights() {
        let prev = WsMat::from_shape_fn((4, 3), |(_, j)| [0.1, 0.2, 0.3][j]);
        let l = create_layer(3, Some(5));
        let input = arr1(&[5.0, 6.0, 2.0, 3.0]);

        let out = l.calculate_outputs(input.view(), &prev, |x| x).unwrap();

        for (i, expected) in [1.6, 3.2, 4.8].iter().enumerate() {
            assert_abs_diff_eq!(out.output[i], *expected, epsilon = 1e-9);
            assert_abs_diff_eq!(out.raw[i], *expected, epsilon = 1e-9);
        }
        assert_eq!(out.current_weights.unwrap().dim(), (3, 5));
    }

    #[test]
    fn calculate_outputs_applies_activation_after_raw_sum() {
        let prev = WsMat::from_elem((2, 1), 1.0);
        let l = create_layer(1, None);

        let out = l
            .calculate_outputs(arr1(&[1.0, -3.0]).view(), &prev, |x| x.max(0.0))
            .unwrap();

        assert_eq!(out.raw[0], -2.0);
        assert_eq!(out.output[0], 0.0);
        assert!(out.current_weights.is_none());
    }

    #[test]
    fn calculate_outputs_checks_sizes() {
        let l = create_layer(3, None);
        let prev = WsMat::zeros((2, 4));

        assert_eq!(
            l.calculate_outputs(arr1(&[1.0, 1.0]).view(), &prev, |x| x)
                .unwrap_err(),
            NetError::WeightVectorSizeMismatch {
                expected: 3,
                actual: 4
            }
        );

        let prev = WsMat::zeros((2, 3));
        assert!(l
            .calculate_outputs(arr1(&[1.0]).view(), &prev, |x| x)
            .is_err());
    }

    #[test]
    fn update_weights_rejects_wrong_shape_without_mutation() {
        let mut l = create_layer(2, Some(2));
        let before = l.clone();

        assert!(l.update_weights(&WsMat::ones((2, 3))).is_err());
        assert!(l.update_weights(&WsMat::ones((3, 2))).is_err());
        assert_eq!(l, before);
    }

    #[test]
    fn add_delta_weights_accumulates() {
        let mut l = create_layer(2, Some(2));
        l.update_weights(&WsMat::ones((2, 2))).unwrap();
        l.add_delta_weights(&arr2(&[[0.5, -1.0], [0.0, 2.0]]))
            .unwrap();

        assert_eq!(l.weights_matrix().unwrap(), arr2(&[[1.5, 0.0], [1.0, 3.0]]));
    }

    #[test]
    fn output_layer_only_accepts_empty_columns() {
        let mut l = create_layer(2, None);

        assert!(l.update_weights(&WsMat::zeros((2, 0))).is_ok());
        assert!(l.add_delta_weights(&WsMat::zeros((2, 1))).is_err());
        assert!(l.is_output());
    }
}
