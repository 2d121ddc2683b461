use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Write};

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;
use crate::dataloader::TrainingDataset;
use crate::network::Network;

/// Everything needed to resume work on a network: topology with weights, data and settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Save {
    pub network: Network,
    #[serde(default)]
    pub training_dataset: TrainingDataset,
    #[serde(default)]
    pub training_config: TrainingConfig,
}

impl Save {
    pub fn new(network: Network, training_dataset: TrainingDataset, training_config: TrainingConfig) -> Self {
        Self {
            network,
            training_dataset,
            training_config,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Network shapes are validated while parsing, the training config afterwards
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let save: Save = serde_json::from_str(json)?;
        save.training_config.validate()?;

        Ok(save)
    }

    pub fn to_file(&self, filepath: &str) -> Result<(), Box<dyn Error>> {
        let json = self.to_json()?;

        let mut output = File::create(filepath)?;
        output.write_all(json.as_bytes())?;

        info!("Saved network {} to {}", self.network, filepath);

        Ok(())
    }

    pub fn from_file(filepath: &str) -> Result<Self, Box<dyn Error>> {
        let file = File::open(filepath)?;
        let save: Save = serde_json::from_reader(BufReader::new(file))?;
        save.training_config.validate()?;

        Ok(save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::dataloader::TrainingExample;
    use crate::network_builder::NetworkBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Save {
        let mut net = NetworkBuilder::new().add_layers(&[3, 4, 2]).build().unwrap();
        net.initialize_weights(&mut StdRng::seed_from_u64(3));

        let mut ds = TrainingDataset::new(vec![
            TrainingExample::new(vec![0.1, 0.2, 0.3], vec![1.0, 0.0]),
            TrainingExample::new(vec![0.4, 0.5, 0.6], vec![0.0, 1.0]),
        ]);
        ds.variable_names = vec!["a", "b", "c", "x", "y"]
            .into_iter()
            .map(String::from)
            .collect();
        ds.split_test(0.5).unwrap();

        let cfg = TrainingConfig {
            activation: ActivationFunction::SigmoidBipolar,
            ..TrainingConfig::default()
        };

        Save::new(net, ds, cfg)
    }

    #[test]
    fn json_round_trip() {
        let save = sample();
        let back = Save::from_json(&save.to_json().unwrap()).unwrap();

        assert_eq!(back, save);
        assert_eq!(back.network.weights(), save.network.weights());
        assert_eq!(back.training_dataset.test_examples.len(), 1);
    }

    #[test]
    fn json_with_bad_config_is_rejected() {
        let mut save = sample();
        save.training_config.learning_rate = -0.5;

        assert!(Save::from_json(&save.to_json().unwrap()).is_err());
    }

    #[test]
    fn activation_stored_by_name() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"SigmoidBipolar\""));
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join("layerwise_snapshot_test.json");
        let path = path.to_str().unwrap();

        let save = sample();
        save.to_file(path).unwrap();

        assert_eq!(Save::from_file(path).unwrap(), save);
        std::fs::remove_file(path).unwrap();
    }
}
