use ndarray::Array;
use serde::{Deserialize, Serialize};

use crate::err::{NetError, NetResult};
use crate::util::{DataVec, Float};

/// Input vector paired with the outputs the network should produce for it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input_values: DataVec,
    pub expected_outputs: DataVec,
}

impl TrainingExample {
    pub fn new(input: Vec<Float>, expected: Vec<Float>) -> Self {
        Self {
            input_values: Array::from_vec(input),
            expected_outputs: Array::from_vec(expected),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataset {
    /// Column names, inputs first then outputs. May be empty.
    pub variable_names: Vec<String>,
    pub training_examples: Vec<TrainingExample>,
    /// Held out, never used for weight updates
    pub test_examples: Vec<TrainingExample>,
}

impl TrainingDataset {
    pub fn new(training_examples: Vec<TrainingExample>) -> Self {
        Self {
            training_examples,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.training_examples.len() + self.test_examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn input_len(&self) -> Option<usize> {
        self.first_example().map(|e| e.input_values.len())
    }

    pub fn output_len(&self) -> Option<usize> {
        self.first_example().map(|e| e.expected_outputs.len())
    }

    fn first_example(&self) -> Option<&TrainingExample> {
        self.training_examples
            .first()
            .or_else(|| self.test_examples.first())
    }

    /// Moves the trailing `fraction` of the training examples to the end of the test set.
    /// Order is preserved in both sets.
    pub fn split_test(&mut self, fraction: Float) -> NetResult<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(NetError::InvalidFormat(format!(
                "test fraction must be within 0..1, got {}",
                fraction
            )));
        }

        let len = self.training_examples.len();
        let test_count = ((len as Float) * fraction).round() as usize;
        let moved = self.training_examples.split_off(len - test_count.min(len));

        self.test_examples.extend(moved);

        Ok(())
    }
}
