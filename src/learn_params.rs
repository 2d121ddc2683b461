use serde::Serialize;

use crate::util::{DataVec, Float, WsBlob};

/// Everything one forward pass captured, layer by layer.
///
/// `outputs_per_layer[0]` and `raw_per_layer[0]` are both the network input.
/// `weights_per_layer[i]` is the `i -> i + 1` boundary matrix the pass used.
#[derive(Clone, Debug, Default)]
pub struct ForwardPass {
    pub outputs_per_layer: Vec<DataVec>,
    pub raw_per_layer: Vec<DataVec>,
    pub weights_per_layer: WsBlob,
}

impl ForwardPass {
    /// Outputs of the last layer
    pub fn output(&self) -> Option<&DataVec> {
        self.outputs_per_layer.last()
    }
}

/// One example pushed through the network
#[derive(Clone, Debug, Serialize)]
pub struct TestResult {
    pub expected_values: DataVec,
    pub actual_values: DataVec,
    pub outputs_per_layer: Vec<DataVec>,
    pub raw_per_layer: Vec<DataVec>,
}

impl TestResult {
    /// `target - output` for every output neuron
    pub fn errors(&self) -> DataVec {
        &self.expected_values - &self.actual_values
    }

    /// Mean over outputs of the squared error
    pub fn loss(&self) -> Float {
        self.errors().mapv(|e| e * e).mean().unwrap_or(0.0)
    }
}

/// Summary of one epoch
#[derive(Clone, Debug, Serialize)]
pub struct TrainingResult {
    pub epoch: usize,
    pub training_loss: Float,
    pub test_loss: Float,
    pub training_results: Vec<TestResult>,
    pub test_results: Vec<TestResult>,
}
