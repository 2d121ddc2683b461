use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::err::{NetError, NetResult};
use crate::util::{DataVec, Float};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    /// Weights towards every neuron of the next layer, `None` in the output layer
    pub weights: Option<DataVec>,
}

impl Neuron {
    pub fn new(weights: Option<DataVec>) -> Self {
        Self { weights }
    }

    pub fn with_zeroed_weights(count: usize) -> Self {
        Self {
            weights: Some(DataVec::zeros(count)),
        }
    }

    pub fn output_neuron() -> Self {
        Self { weights: None }
    }

    pub fn weights_len(&self) -> Option<usize> {
        self.weights.as_ref().map(|w| w.len())
    }

    /// Weighted sum of `input` against the weights entering this neuron
    pub fn calculate_output(
        input: ArrayView1<Float>,
        entering_weights: ArrayView1<Float>,
    ) -> NetResult<Float> {
        if input.len() != entering_weights.len() {
            return Err(NetError::WeightVectorSizeMismatch {
                expected: input.len(),
                actual: entering_weights.len(),
            });
        }

        Ok(input.dot(&entering_weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn calculate_output_is_dot_product() {
        let input = arr1(&[5.0, 6.0, 2.0, 3.0]);
        let ws = arr1(&[0.9, 0.8, 0.7, 0.6]);

        let out = Neuron::calculate_output(input.view(), ws.view()).unwrap();
        assert_abs_diff_eq!(out, 12.5, epsilon = 1e-12);
    }

    #[test]
    fn calculate_output_rejects_length_mismatch() {
        let input = arr1(&[1.0, 2.0]);
        let ws = arr1(&[1.0, 2.0, 3.0]);

        assert_eq!(
            Neuron::calculate_output(input.view(), ws.view()),
            Err(NetError::WeightVectorSizeMismatch {
                expected: 2,
                actual: 3
            })
        );
    }
}
