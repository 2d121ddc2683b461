use std::error::Error;

use clap::ArgMatches;

use log::{error, info};

use layerwise::prelude::*;

use crate::arg;
use crate::create_net::rng_from_args;

fn count(args: &ArgMatches) -> Result<usize, Box<dyn Error>> {
    match args.get_one::<usize>("Count") {
        Some(c) => Ok(*c),
        None => {
            error!("Neuron count wasn't provided (--count)");
            Err(Box::new(NetError::InvalidLayerSize))
        }
    }
}

pub fn mutate_net(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let net_file = arg::<String>(args, "Net")?;
    let out_file = args.get_one::<String>("OutFile").unwrap_or(net_file);
    let op = arg::<String>(args, "Op")?;
    let index = *arg::<usize>(args, "Index")?;

    let mut save = Save::from_file(net_file)?;
    let net = &mut save.network;

    info!("Network before : {}", net);

    match op.as_str() {
        "insert" => net.insert_hidden_layer(index, count(args)?)?,
        "remove" => net.remove_hidden_layer(index)?,
        "resize" => net.change_layer_neuron_amount(index, count(args)?)?,
        "add_neuron" => net.add_neuron_to_layer(index)?,
        "remove_neuron" => net.remove_neuron_from_layer(index)?,
        _ => {
            error!("Unknown mutation {}", op);
            return Err(Box::new(NetError::InvalidFormat(format!("unknown mutation {}", op))));
        }
    }

    net.initialize_weights(&mut rng_from_args(args));

    println!("Network after : {}", net);

    save.to_file(out_file)?;

    Ok(())
}
