use std::error::Error;

use clap::ArgMatches;

use log::info;

use layerwise::prelude::*;

use crate::arg;
use crate::dataset_info::load_dataset;

/// Trains a network snapshot with its own or a provided csv dataset
/// and writes the trained snapshot back
pub fn train_net(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let net_file = arg::<String>(args, "Net")?;
    let out_file = args.get_one::<String>("OutFile").unwrap_or(net_file);

    let mut save = Save::from_file(net_file)?;

    if let Some(ds) = load_dataset(args)? {
        info!("Using dataset with {} examples", ds.len());
        save.training_dataset = ds;
    }

    if let Some(split) = args.get_one::<f64>("TestSplit") {
        info!("Test split : {}", split);
        save.training_dataset.split_test(*split)?;
    }

    let mut cfg = save.training_config.clone();

    if let Some(err) = args.get_one::<f64>("Err") {
        cfg.target_error = *err;
    }

    if let Some(max_epoch) = args.get_one::<usize>("MaxEpoch") {
        cfg.target_epoch = *max_epoch;
    }

    if let Some(lr) = args.get_one::<f64>("LearnRate") {
        cfg.learning_rate = *lr;
    }

    cfg.validate()?;

    let mut orc = Orchestra::new(save.network.clone(), cfg.clone(), &save.training_dataset);
    orc.name = out_file.trim_end_matches(".json").to_owned();

    if let Some(snap_epoch) = args.get_one::<usize>("SnapEpoch") {
        info!("Snapshot epoch : {}", snap_epoch);
        orc = orc.snap_epoch(*snap_epoch);
    }

    if let Some(err_file) = args.get_one::<String>("ErrToFile") {
        info!("Writing error to {}", err_file);
        orc = orc.write_err_to_file(err_file);
    }

    if let Some(last) = orc.train()? {
        println!(
            "Epoch {} : training loss {:.6}, test loss {:.6}",
            last.epoch, last.training_loss, last.test_loss
        );
    }

    if !save.training_dataset.test_examples.is_empty() {
        let (loss, acc) = orc.evaluate(&save.training_dataset.test_examples)?;
        println!("Test loss : {:.6}, accuracy : {:.4}", loss, acc);
    }

    save.network = orc.into_network();
    save.training_config = cfg;
    save.to_file(out_file)?;

    Ok(())
}
