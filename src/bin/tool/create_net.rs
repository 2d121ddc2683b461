use std::error::Error;

use clap::ArgMatches;

use log::info;

use rand::rngs::StdRng;
use rand::SeedableRng;

use layerwise::prelude::*;

use crate::{arg, parse_list};

/// Seeded when `Seed` is given, from entropy otherwise
pub fn rng_from_args(args: &ArgMatches) -> StdRng {
    match args.get_one::<u64>("Seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    }
}

pub fn create_net(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let sizes: Vec<usize> = parse_list(arg::<String>(args, "Layers")?)?;
    let activation = ActivationFunction::from_name(arg::<String>(args, "Activation")?)?;
    let learn_rate = *arg::<f64>(args, "LearnRate")?;
    let out_file = arg::<String>(args, "OutFile")?;

    let (mut net, cfg) = NetworkBuilder::new()
        .add_layers(&sizes)
        .set_activation_function(activation)
        .set_learning_rate(learn_rate)
        .build_with_config()?;

    net.initialize_weights(&mut rng_from_args(args));

    println!("Finally network : {}", net);

    info!("Writing network snapshot to file {}", out_file);
    Save::new(net, TrainingDataset::default(), cfg).to_file(out_file)?;

    Ok(())
}
