use layerwise::prelude::*;
use layerwise::util::Float;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn one_hot_examples() -> Vec<TrainingExample> {
    vec![
        TrainingExample::new(vec![1.0, 0.3, 0.4], vec![1.0, 0.0, 0.0]),
        TrainingExample::new(vec![0.2, 0.9, 0.1], vec![0.0, 1.0, 0.0]),
        TrainingExample::new(vec![0.0, 0.0, 0.7], vec![0.0, 0.0, 1.0]),
        TrainingExample::new(vec![1.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]),
        TrainingExample::new(vec![0.0, 1.0, 0.0], vec![0.0, 1.0, 0.0]),
        TrainingExample::new(vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 1.0]),
        TrainingExample::new(vec![0.0, 0.5, 0.0], vec![0.0, 1.0, 0.0]),
        TrainingExample::new(vec![0.0, 0.0, 0.8], vec![0.0, 0.0, 1.0]),
    ]
}

fn assert_loss_decreases(mut net: Network) {
    let mut lm = LearningManager::new(&TrainingConfig {
        learning_rate: 0.3,
        activation: ActivationFunction::Sigmoid,
        ..TrainingConfig::default()
    });
    lm.training_set = one_hot_examples();

    let mut avg_error: Float = 1.0;

    for _ in 0..5 {
        let old_avg_error = avg_error;

        for _ in 0..5 {
            let results = lm.run_all_examples(&net, &lm.training_set).unwrap();
            avg_error = lm.run_back_propagation(&mut net, &results).unwrap();
        }

        assert!(avg_error < old_avg_error, "{} !< {}", avg_error, old_avg_error);
    }

    assert_eq!(lm.epoch(), 25);
}

#[test]
fn backpropagation_reduces_loss_from_zero_weights() {
    let net = NetworkBuilder::new().add_layers(&[3, 4, 3]).build().unwrap();
    assert_loss_decreases(net);
}

#[test]
fn backpropagation_reduces_loss_from_xavier_weights() {
    let mut net = NetworkBuilder::new().add_layers(&[3, 4, 3]).build().unwrap();
    net.initialize_weights(&mut StdRng::seed_from_u64(42));
    assert_loss_decreases(net);
}

#[test]
fn orchestra_learns_one_hot_mapping() {
    let mut net = NetworkBuilder::new().add_layers(&[3, 6, 3]).build().unwrap();
    net.initialize_weights(&mut StdRng::seed_from_u64(11));

    let cfg = TrainingConfig {
        learning_rate: 1.0,
        ..TrainingConfig::default()
    };
    let ds = TrainingDataset::new(one_hot_examples());

    let mut orc = Orchestra::new(net, cfg, &ds);
    let (loss_before, _) = orc.evaluate(&ds.training_examples).unwrap();

    orc.train_for_error_or_epoch(0.0, 3000).unwrap();

    let (loss_after, acc) = orc.evaluate(&ds.training_examples).unwrap();

    assert!(loss_after < loss_before / 2.0);
    assert!(acc >= 0.75);
}

#[test]
fn snapshot_round_trip_after_mutation_and_training() {
    let (mut net, cfg) = NetworkBuilder::new()
        .add_layers(&[3, 4, 3])
        .set_activation_function(ActivationFunction::Tanh)
        .build_with_config()
        .unwrap();

    net.insert_hidden_layer(2, 5).unwrap();
    net.initialize_weights(&mut StdRng::seed_from_u64(5));

    let mut ds = TrainingDataset::new(one_hot_examples());
    ds.split_test(0.25).unwrap();

    let mut lm = LearningManager::with_dataset(&cfg, &ds);
    lm.train_for_multiple_epochs(&mut net, 3).unwrap();

    let save = Save::new(net, ds, cfg);
    let back = Save::from_json(&save.to_json().unwrap()).unwrap();

    assert_eq!(back.network.neuron_counts(), vec![3, 4, 5, 3]);
    assert_eq!(back.network.weights(), save.network.weights());
    assert_eq!(back.training_dataset, save.training_dataset);
    assert_eq!(back.training_config.activation, ActivationFunction::Tanh);
}

#[test]
fn csv_dataset_feeds_training() {
    let data = "x0,x1,y\n0,0,0\n0,1,1\n1,0,1\n1,1,1\n";
    let ds = CsvReader::new()
        .has_headers(true)
        .read_from(data.as_bytes(), &[2])
        .unwrap();

    let mut net = NetworkBuilder::new().add_layers(&[2, 1]).build().unwrap();
    let mut lm = LearningManager::with_dataset(&TrainingConfig::default(), &ds);

    let first = lm.train_for_one_epoch(&mut net).unwrap();
    let rest = lm.train_for_multiple_epochs(&mut net, 20).unwrap();

    assert_eq!(first.training_results.len(), 4);
    assert!(rest.last().unwrap().training_loss < first.training_loss);
}
