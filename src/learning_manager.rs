use log::debug;

use ndarray::{ArrayView1, Axis, Zip};

use crate::activation::ActivationFunction;
use crate::config::TrainingConfig;
use crate::dataloader::{TrainingDataset, TrainingExample};
use crate::err::{NetError, NetResult};
use crate::layer::Layer;
use crate::learn_params::{TestResult, TrainingResult};
use crate::network::Network;
use crate::util::{mean, DataVec, Float, WsBlob, WsMat};

/// Full-batch gradient descent trainer.
///
/// Every epoch evaluates all training examples against one weight snapshot,
/// accumulates the deltas of every example and applies their mean once.
#[derive(Clone, Debug)]
pub struct LearningManager {
    epoch: usize,
    pub learning_rate: Float,
    pub activation: ActivationFunction,
    pub training_set: Vec<TrainingExample>,
    pub test_set: Vec<TrainingExample>,
}

impl Default for LearningManager {
    fn default() -> Self {
        Self::new(&TrainingConfig::default())
    }
}

impl LearningManager {
    pub fn new(cfg: &TrainingConfig) -> Self {
        Self {
            epoch: 0,
            learning_rate: cfg.learning_rate,
            activation: cfg.activation,
            training_set: Vec::new(),
            test_set: Vec::new(),
        }
    }

    pub fn with_dataset(cfg: &TrainingConfig, dataset: &TrainingDataset) -> Self {
        let mut lm = Self::new(cfg);
        lm.training_set = dataset.training_examples.clone();
        lm.test_set = dataset.test_examples.clone();
        lm
    }

    /// Completed backpropagation passes
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn run_one_example(&self, net: &Network, example: &TrainingExample) -> NetResult<TestResult> {
        let pass = net.calculate_output(example.input_values.view(), |x| self.activation.function(x))?;

        let actual = pass.output().cloned().unwrap_or_default();

        if actual.len() != example.expected_outputs.len() {
            return Err(NetError::OutputSizeMismatch {
                expected: actual.len(),
                actual: example.expected_outputs.len(),
            });
        }

        Ok(TestResult {
            expected_values: example.expected_outputs.clone(),
            actual_values: actual,
            outputs_per_layer: pass.outputs_per_layer,
            raw_per_layer: pass.raw_per_layer,
        })
    }

    pub fn run_all_examples(
        &self,
        net: &Network,
        examples: &[TrainingExample],
    ) -> NetResult<Vec<TestResult>> {
        examples
            .iter()
            .map(|ex| self.run_one_example(net, ex))
            .collect()
    }

    /// `target - output` per output neuron
    pub fn calculate_error_for_output_layer(
        &self,
        outputs: ArrayView1<Float>,
        targets: ArrayView1<Float>,
    ) -> NetResult<DataVec> {
        check_len(outputs.len(), targets.len())?;
        Ok(&targets - &outputs)
    }

    /// Pushes `next_errors` back through the outgoing weights of `layer`.
    /// No activation derivative is applied here.
    pub fn calculate_error_for_hidden_layer(
        &self,
        next_errors: ArrayView1<Float>,
        layer: &Layer,
    ) -> NetResult<DataVec> {
        let ws = layer
            .weights_matrix()
            .ok_or(NetError::WeightVectorSizeMismatch {
                expected: next_errors.len(),
                actual: 0,
            })?;

        if ws.ncols() != next_errors.len() {
            return Err(NetError::WeightVectorSizeMismatch {
                expected: ws.ncols(),
                actual: next_errors.len(),
            });
        }

        Ok(ws.dot(&next_errors))
    }

    pub fn calculate_error_and_derivative_products(
        &self,
        errors: ArrayView1<Float>,
        raw: ArrayView1<Float>,
    ) -> NetResult<DataVec> {
        check_len(errors.len(), raw.len())?;

        Ok(Zip::from(&errors)
            .and(&raw)
            .map_collect(|e, r| e * self.activation.derivative(*r)))
    }

    /// Deltas for the outgoing weights of `layer`:
    /// `2 * lr * (err_j * f'(raw_j)) * out_i`
    pub fn calculate_deltas_for_layer(
        &self,
        layer: &Layer,
        downstream_errors: ArrayView1<Float>,
        downstream_raw: ArrayView1<Float>,
        outputs: ArrayView1<Float>,
    ) -> NetResult<WsMat> {
        let products = self.calculate_error_and_derivative_products(downstream_errors, downstream_raw)?;

        if layer.len() != outputs.len() || layer.outgoing_len() != Some(products.len()) {
            return Err(NetError::WeightVectorSizeMismatch {
                expected: layer.outgoing_len().unwrap_or(0),
                actual: products.len(),
            });
        }

        Ok(self.scaled_outer(products.view(), outputs))
    }

    fn scaled_outer(&self, products: ArrayView1<Float>, outputs: ArrayView1<Float>) -> WsMat {
        let rate = 2.0 * self.learning_rate;

        outputs
            .insert_axis(Axis(1))
            .dot(&products.insert_axis(Axis(0)))
            .mapv(|v| v * rate)
    }

    /// One batch update from `results`, which must come from the current weights.
    /// Returns the mean loss of `results`.
    pub fn run_back_propagation(
        &mut self,
        net: &mut Network,
        results: &[TestResult],
    ) -> NetResult<Float> {
        if results.is_empty() {
            return Err(NetError::EmptyTrainingSet);
        }

        let layers_count = net.layers_count();
        let mut sums: WsBlob = net
            .weights()
            .iter()
            .map(|ws| WsMat::zeros(ws.dim()))
            .collect();

        for r in results {
            check_len(layers_count, r.outputs_per_layer.len())?;
            check_len(layers_count, r.raw_per_layer.len())?;

            let mut errors = self.calculate_error_for_output_layer(
                r.actual_values.view(),
                r.expected_values.view(),
            )?;

            for b in (0..layers_count - 1).rev() {
                let products =
                    self.calculate_error_and_derivative_products(errors.view(), r.raw_per_layer[b + 1].view())?;

                let delta = self.scaled_outer(products.view(), r.outputs_per_layer[b].view());

                if delta.dim() != sums[b].dim() {
                    return Err(NetError::WeightVectorSizeMismatch {
                        expected: sums[b].len(),
                        actual: delta.len(),
                    });
                }

                sums[b] += &delta;

                if b > 0 {
                    errors = self.calculate_error_for_hidden_layer(products.view(), &net.layers()[b])?;
                }
            }
        }

        let count = results.len() as Float;
        for s in sums.iter_mut() {
            s.mapv_inplace(|v| v / count);
        }

        net.apply_deltas(&sums)?;
        self.epoch += 1;

        let losses: Vec<Float> = results.iter().map(|r| r.loss()).collect();
        let loss = mean(&losses);

        debug!("Epoch {} done, loss {}", self.epoch, loss);

        Ok(loss)
    }

    /// Evaluates both sets, then updates weights from the training set only
    pub fn train_for_one_epoch(&mut self, net: &mut Network) -> NetResult<TrainingResult> {
        let training_results = self.run_all_examples(net, &self.training_set)?;
        let test_results = self.run_all_examples(net, &self.test_set)?;

        let training_loss = self.run_back_propagation(net, &training_results)?;

        let test_losses: Vec<Float> = test_results.iter().map(|r| r.loss()).collect();

        Ok(TrainingResult {
            epoch: self.epoch,
            training_loss,
            test_loss: mean(&test_losses),
            training_results,
            test_results,
        })
    }

    pub fn train_for_multiple_epochs(
        &mut self,
        net: &mut Network,
        epochs: usize,
    ) -> NetResult<Vec<TrainingResult>> {
        (0..epochs).map(|_| self.train_for_one_epoch(net)).collect()
    }
}

fn check_len(expected: usize, actual: usize) -> NetResult<()> {
    if expected != actual {
        return Err(NetError::ArraySizeMismatch { expected, actual });
    }

    Ok(())
}
