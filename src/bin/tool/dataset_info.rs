use std::error::Error;

use clap::ArgMatches;

use log::{error, info};

use layerwise::prelude::*;
use layerwise::util::minmax_normalize_columns;

use crate::{arg, parse_list};

/// Reads the csv dataset named by `Data`, `None` when the argument is absent
pub fn load_dataset(args: &ArgMatches) -> Result<Option<TrainingDataset>, Box<dyn Error>> {
    let filepath = match args.get_one::<String>("Data") {
        Some(f) => f,
        None => return Ok(None),
    };

    let outputs: Vec<usize> = match args.get_one::<String>("Outputs") {
        Some(o) => parse_list(o)?,
        None => {
            error!("Output columns weren't provided (--outputs)");
            return Err(Box::new(NetError::InvalidFormat("missing --outputs".to_owned())));
        }
    };

    let mut ds = CsvReader::new()
        .has_headers(*arg::<bool>(args, "Headers")?)
        .read_dataset(filepath, &outputs)?;

    if *arg::<bool>(args, "Normalize")? {
        info!("Normalizing input columns");
        minmax_normalize_columns(&mut ds.training_examples);
    }

    Ok(Some(ds))
}

pub fn dataset_info(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let ds = match load_dataset(args)? {
        Some(ds) => ds,
        None => {
            error!("Dataset wasn't provided (--dataset)");
            return Err(Box::new(NetError::InvalidFormat("missing --dataset".to_owned())));
        }
    };

    println!("Dataset length : {}", ds.len());
    println!("Input length : {}", ds.input_len().unwrap_or(0));
    println!("Output length : {}", ds.output_len().unwrap_or(0));
    println!("Variables : {}", ds.variable_names.join(", "));

    let show_n = *arg::<usize>(args, "ShowN")?;

    for (idx, ex) in ds.training_examples.iter().take(show_n).enumerate() {
        println!("#{} : {} -> {}", idx, ex.input_values, ex.expected_outputs);
    }

    Ok(())
}
