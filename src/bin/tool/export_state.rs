use std::error::Error;

use clap::ArgMatches;

use layerwise::snapshot::Save;

use crate::arg;

pub fn export_state(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let save = Save::from_file(arg::<String>(args, "Net")?)?;
    save.network.save_state(arg::<String>(args, "OutFile")?)?;

    Ok(())
}
