use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::Instant;

use log::{debug, info};

use crate::config::TrainingConfig;
use crate::dataloader::{TrainingDataset, TrainingExample};
use crate::err::NetError;
use crate::learn_params::TrainingResult;
use crate::learning_manager::LearningManager;
use crate::metrics;
use crate::network::Network;
use crate::util::{mean, Float};

pub enum CallbackReturnAction {
    None,
    Stop,
}

/// Callback args : (epoch, training loss, test loss)
pub type EpochCallback = Box<dyn FnMut(usize, Float, Float) -> CallbackReturnAction>;

/// Drives epochs of a `LearningManager` until a stop condition holds
pub struct Orchestra {
    network: Network,
    lm: LearningManager,
    cfg: TrainingConfig,
    snap_epoch: usize,
    err_log: Option<String>,
    pub name: String,
    callbacks: Vec<EpochCallback>,
}

impl Orchestra {
    pub fn new(network: Network, cfg: TrainingConfig, dataset: &TrainingDataset) -> Self {
        let lm = LearningManager::with_dataset(&cfg, dataset);

        Self {
            network,
            lm,
            cfg,
            snap_epoch: 0,
            err_log: None,
            name: "network".to_owned(),
            callbacks: Vec::new(),
        }
    }

    /// Saves the weights state every `snap_epoch` epochs, `0` disables
    pub fn snap_epoch(mut self, snap_epoch: usize) -> Self {
        self.snap_epoch = snap_epoch;
        self
    }

    /// Appends `epoch training_loss test_loss` lines to `filepath`
    pub fn write_err_to_file(mut self, filepath: &str) -> Self {
        self.err_log = Some(filepath.to_owned());
        self
    }

    pub fn add_callback(&mut self, c: EpochCallback) {
        self.callbacks.push(c);
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn learning_manager(&self) -> &LearningManager {
        &self.lm
    }

    pub fn save_model_state(&self, filepath: &str) -> Result<(), Box<dyn Error>> {
        self.network.save_state(filepath)
    }

    /// Mean loss and accuracy of the current network on `examples`
    pub fn evaluate(&self, examples: &[TrainingExample]) -> Result<(Float, Float), Box<dyn Error>> {
        let results = self.lm.run_all_examples(&self.network, examples)?;

        let losses: Vec<Float> = results.iter().map(|r| r.loss()).collect();
        let accuracy = metrics::accuracy(&results, self.cfg.classification_threshold);

        Ok((mean(&losses), accuracy))
    }

    /// Trains with the limits of the training configuration
    pub fn train(&mut self) -> Result<Option<TrainingResult>, Box<dyn Error>> {
        self.train_for_error_or_epoch(self.cfg.target_error, self.cfg.target_epoch)
    }

    /// Trains till the training loss becomes lower than `err` or
    /// `max_epoch` epochs are done.
    /// If `err` is 0, the error threshold is ignored.
    /// If `max_epoch` is 0, the epoch limit is ignored.
    pub fn train_for_error_or_epoch(
        &mut self,
        err: Float,
        max_epoch: usize,
    ) -> Result<Option<TrainingResult>, Box<dyn Error>> {
        if err <= 0.0 && max_epoch == 0 {
            return Err(Box::new(NetError::InvalidFormat(
                "neither target error nor target epoch is set".to_owned(),
            )));
        }

        let mut err_file = match &self.err_log {
            Some(path) => Some(create_empty_error_file(path)?),
            None => None,
        };

        let bench_time = Instant::now();
        let mut last = None;
        let mut flag_stop = false;

        loop {
            if max_epoch != 0 && self.lm.epoch() >= max_epoch {
                info!("Reached max epoch");
                break;
            }

            let res = self.lm.train_for_one_epoch(&mut self.network)?;
            let epoch = res.epoch;

            debug!(
                "Epoch {} : training loss {}, test loss {}",
                epoch, res.training_loss, res.test_loss
            );

            if let Some(f) = err_file.as_mut() {
                append_error(f, epoch, res.training_loss, res.test_loss)?;
            }

            if self.snap_epoch != 0 && epoch % self.snap_epoch == 0 {
                let filename = format!("{}_{}.state", self.name, epoch);
                self.save_model_state(&filename)?;
            }

            for it_cb in self.callbacks.iter_mut() {
                match it_cb(epoch, res.training_loss, res.test_loss) {
                    CallbackReturnAction::None => (),
                    CallbackReturnAction::Stop => flag_stop = true,
                }
            }

            let reached = err > 0.0 && res.training_loss < err;
            last = Some(res);

            if flag_stop {
                info!("Stopping training loop on epoch {}...", epoch);
                break;
            }

            if reached {
                info!("Reached satisfying error value");
                break;
            }
        }

        if let Some(res) = &last {
            info!(
                "Training finished on epoch {} in {} ms, loss : {}",
                res.epoch,
                bench_time.elapsed().as_millis(),
                res.training_loss
            );
        }

        Ok(last)
    }
}

fn create_empty_error_file(filepath: &str) -> Result<File, Box<dyn Error>> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(filepath)?;
    Ok(file)
}

fn append_error(f: &mut File, epoch: usize, train_err: Float, test_err: Float) -> Result<(), Box<dyn Error>> {
    writeln!(f, "{} {:.6} {:.6}", epoch, train_err, test_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network_builder::NetworkBuilder;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn orchestra() -> Orchestra {
        let net = NetworkBuilder::new().add_layers(&[2, 2, 1]).build().unwrap();
        let mut ds = TrainingDataset::new(vec![
            TrainingExample::new(vec![1.0, 0.0], vec![1.0]),
            TrainingExample::new(vec![0.0, 1.0], vec![0.0]),
            TrainingExample::new(vec![1.0, 1.0], vec![1.0]),
            TrainingExample::new(vec![0.0, 0.0], vec![0.0]),
        ]);
        ds.split_test(0.25).unwrap();

        Orchestra::new(net, TrainingConfig::default(), &ds)
    }

    #[test]
    fn stops_on_target_epoch() {
        let mut orc = orchestra();
        let last = orc.train_for_error_or_epoch(0.0, 5).unwrap().unwrap();

        assert_eq!(last.epoch, 5);
        assert_eq!(orc.learning_manager().epoch(), 5);
        assert_eq!(last.test_results.len(), 1);
    }

    #[test]
    fn stops_on_target_error() {
        let mut orc = orchestra();
        let last = orc.train_for_error_or_epoch(0.3, 100).unwrap().unwrap();

        // zero weights give 0.25 on the first epoch
        assert_eq!(last.epoch, 1);
    }

    #[test]
    fn requires_a_limit() {
        let mut orc = orchestra();
        assert!(orc.train().is_err());
        assert_eq!(orc.learning_manager().epoch(), 0);
    }

    #[test]
    fn callback_can_stop() {
        let mut orc = orchestra();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_cb = seen.clone();

        orc.add_callback(Box::new(move |epoch, _, _| {
            seen_cb.borrow_mut().push(epoch);
            if epoch == 3 {
                CallbackReturnAction::Stop
            } else {
                CallbackReturnAction::None
            }
        }));

        let last = orc.train_for_error_or_epoch(0.0, 10).unwrap().unwrap();

        assert_eq!(last.epoch, 3);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn writes_error_log() {
        let path = std::env::temp_dir().join("layerwise_err_log_test.txt");
        let path = path.to_str().unwrap();

        let mut orc = orchestra().write_err_to_file(path);
        orc.train_for_error_or_epoch(0.0, 4).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1 "));
        assert!(lines[3].starts_with("4 "));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn snapshots_every_snap_epoch() {
        let name = std::env::temp_dir().join("layerwise_snap_epoch_test");
        let name = name.to_str().unwrap().to_owned();
        let file = |epoch: usize| format!("{}_{}.state", name, epoch);

        let mut orc = orchestra().snap_epoch(2);
        orc.name = name.clone();
        orc.train_for_error_or_epoch(0.0, 5).unwrap();

        assert!(std::path::Path::new(&file(2)).exists());
        assert!(std::path::Path::new(&file(4)).exists());
        assert!(!std::path::Path::new(&file(3)).exists());
        assert!(!std::path::Path::new(&file(5)).exists());

        let mut net = NetworkBuilder::new().add_layers(&[2, 2, 1]).build().unwrap();
        net.load_state(&file(4)).unwrap();
        assert_eq!(net.neuron_counts(), vec![2, 2, 1]);

        std::fs::remove_file(file(2)).unwrap();
        std::fs::remove_file(file(4)).unwrap();
    }

    #[test]
    fn evaluate_reports_loss_and_accuracy() {
        let orc = orchestra();
        let examples = vec![
            TrainingExample::new(vec![1.0, 0.0], vec![1.0]),
            TrainingExample::new(vec![0.0, 1.0], vec![0.0]),
        ];

        let (loss, acc) = orc.evaluate(&examples).unwrap();

        // untrained output is exactly 0.5, which counts on the upper side
        assert_eq!(loss, 0.25);
        assert_eq!(acc, 0.5);
    }
}
