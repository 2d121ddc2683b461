use std::error::Error;
use std::fs::File;
use std::io::{ErrorKind, Write};

use log::error;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::err::{NetError, NetResult};
use crate::util::Float;

/// Training parameters consumed by the trainer and by the caller-side stop conditions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: Float,
    pub activation: ActivationFunction,
    /// Only used for accuracy reporting
    pub classification_threshold: Float,
    /// Stop once the training loss drops below, `0.0` disables
    pub target_error: Float,
    /// Stop after this many epochs, `0` disables
    pub target_epoch: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.3,
            activation: ActivationFunction::Sigmoid,
            classification_threshold: 0.5,
            target_error: 0.0,
            target_epoch: 0,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> NetResult<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate >= 0.0) {
            return Err(NetError::InvalidFormat(format!(
                "learning rate must be finite and >= 0, got {}",
                self.learning_rate
            )));
        }

        if !(self.target_error.is_finite() && self.target_error >= 0.0) {
            return Err(NetError::InvalidFormat(format!(
                "target error must be finite and >= 0, got {}",
                self.target_error
            )));
        }

        Ok(())
    }

    pub fn from_file(filepath: &str) -> Result<Self, Box<dyn Error>> {
        let cfg_file = File::open(filepath)?;
        let cfg: TrainingConfig = serde_yaml::from_reader(cfg_file)?;
        cfg.validate()?;

        Ok(cfg)
    }

    pub fn to_file(&self, filepath: &str) -> Result<(), Box<dyn Error>> {
        let yaml_str_result = serde_yaml::to_string(&self);

        let mut output = File::create(filepath)?;

        match yaml_str_result {
            Ok(yaml_str) => {
                output.write_all(yaml_str.as_bytes())?;
            }
            Err(x) => {
                error!("Error (serde-yaml) serializing training config !!!");
                return Err(Box::new(std::io::Error::new(ErrorKind::Other, x)));
            }
        }

        Ok(())
    }
}
