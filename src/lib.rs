/// Folder
pub mod util;
pub mod dataloader;

/// Files
pub mod activation;
pub mod neuron;
pub mod layer;
pub mod layer_fabric;
pub mod network;
pub mod network_builder;
pub mod learn_params;
pub mod learning_manager;
pub mod config;
pub mod snapshot;
pub mod state;
pub mod metrics;
pub mod orchestra;
pub mod err;

pub use activation::ActivationFunction;
pub use network::Network;
pub use network_builder::NetworkBuilder;

pub mod prelude {
    pub use crate::activation::ActivationFunction;
    pub use crate::config::TrainingConfig;
    pub use crate::dataloader::{CsvReader, TrainingDataset, TrainingExample};
    pub use crate::err::{NetError, NetResult};
    pub use crate::learn_params::{TestResult, TrainingResult};
    pub use crate::learning_manager::LearningManager;
    pub use crate::network::Network;
    pub use crate::network_builder::NetworkBuilder;
    pub use crate::orchestra::{CallbackReturnAction, Orchestra};
    pub use crate::snapshot::Save;
}
