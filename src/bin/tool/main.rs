extern crate layerwise;

use std::error::Error;
use std::str::FromStr;

use clap::{Arg, ArgAction, ArgMatches, Command};

use layerwise::err::NetError;

pub mod create_net;
pub mod dataset_info;
pub mod export_state;
pub mod mutate;
pub mod train;

#[cfg(feature = "log_log4rs")]
fn init_logger() -> Result<(), Box<dyn Error>> {
    use log::LevelFilter;
    use log4rs::append::console::ConsoleAppender;
    use log4rs::append::file::FileAppender;
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::default()))
        .build("log.txt")?;

    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::default()))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(
            Root::builder()
                .appender("console")
                .appender("logfile")
                .build(LevelFilter::Info),
        )?;

    log4rs::init_config(config)?;

    Ok(())
}

#[cfg(not(feature = "log_log4rs"))]
fn init_logger() -> Result<(), Box<dyn Error>> {
    use env_logger::Env;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    Ok(())
}

/// Value of an argument clap already guarantees (required or defaulted)
pub fn arg<'a, T>(args: &'a ArgMatches, id: &str) -> Result<&'a T, Box<dyn Error>>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id)
        .ok_or_else(|| Box::new(NetError::InvalidFormat(format!("missing argument {}", id))) as Box<dyn Error>)
}

/// Parses "3,4,3" like lists
pub fn parse_list<T: FromStr>(s: &str) -> Result<Vec<T>, Box<dyn Error>> {
    s.split(',')
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| Box::new(NetError::InvalidFormat(format!("bad list value '{}'", v))) as Box<dyn Error>)
        })
        .collect()
}

fn net_arg() -> Arg<'static> {
    Arg::new("Net")
        .long("net")
        .short('n')
        .help("Provides a network snapshot (json) file")
        .takes_value(true)
        .require_equals(true)
        .required(true)
}

fn dataset_args(cmd: Command<'static>, required: bool) -> Command<'static> {
    cmd.arg(
        Arg::new("Data")
            .long("dataset")
            .short('d')
            .help("Provides a csv dataset file")
            .takes_value(true)
            .require_equals(true)
            .required(required),
    )
    .arg(
        Arg::new("Outputs")
            .long("outputs")
            .help("Comma separated indexes of the output columns, e.g. 2,3")
            .takes_value(true)
            .require_equals(true),
    )
    .arg(
        Arg::new("Headers")
            .long("headers")
            .help("First csv row holds column names")
            .action(ArgAction::Set)
            .value_parser(clap::value_parser!(bool))
            .require_equals(true)
            .default_value("false"),
    )
    .arg(
        Arg::new("Normalize")
            .long("normalize")
            .help("Min-max normalize every input column")
            .action(ArgAction::Set)
            .value_parser(clap::value_parser!(bool))
            .require_equals(true)
            .default_value("false"),
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger()?;

    let train_cmd = Command::new("train")
        .about("Train a network snapshot, continues from its current weights")
        .arg(net_arg())
        .arg(
            Arg::new("TestSplit")
                .long("test_split")
                .help("Fraction of the dataset moved to the test set, 0.0 - 1.0")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .require_equals(true),
        )
        .arg(
            Arg::new("MaxEpoch")
                .long("max_epoch")
                .help("Provides maximum epoch number for training")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .require_equals(true),
        )
        .arg(
            Arg::new("Err")
                .long("err")
                .help("Train till the training loss will be less than this value")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .require_equals(true),
        )
        .arg(
            Arg::new("LearnRate")
                .long("learn_rate")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .require_equals(true),
        )
        .arg(
            Arg::new("SnapEpoch")
                .long("snap_epoch")
                .help("Each snap_epoch weights state will be saved")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .require_equals(true),
        )
        .arg(
            Arg::new("ErrToFile")
                .long("err_to_file")
                .help("Records per-epoch losses to this file")
                .takes_value(true)
                .require_equals(true),
        )
        .arg(
            Arg::new("OutFile")
                .long("out")
                .short('o')
                .help("Trained snapshot output file, defaults to --net")
                .takes_value(true)
                .require_equals(true),
        );

    let matches = Command::new("layerwise tool")
        .version("0.1.0")
        .about("Create, mutate, train and test feedforward networks")
        .subcommand_required(true)
        .subcommand(
            Command::new("create_net")
                .about("Create a new network snapshot with Xavier initialized weights")
                .arg(
                    Arg::new("Layers")
                        .long("layers")
                        .short('l')
                        .help("Comma separated neuron counts, input layer first, e.g. 3,4,3")
                        .takes_value(true)
                        .require_equals(true)
                        .required(true),
                )
                .arg(
                    Arg::new("Activation")
                        .long("activation")
                        .short('a')
                        .help("Sigmoid, SigmoidBipolar, Tanh or ReLU")
                        .takes_value(true)
                        .require_equals(true)
                        .default_value("Sigmoid"),
                )
                .arg(
                    Arg::new("LearnRate")
                        .long("learn_rate")
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(f64))
                        .require_equals(true)
                        .default_value("0.3"),
                )
                .arg(
                    Arg::new("Seed")
                        .long("seed")
                        .help("Seed of the weights initialization")
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(u64))
                        .require_equals(true),
                )
                .arg(
                    Arg::new("OutFile")
                        .long("out")
                        .short('o')
                        .help("Specifies snapshot output file")
                        .takes_value(true)
                        .require_equals(true)
                        .default_value("net.json"),
                ),
        )
        .subcommand(
            Command::new("mutate")
                .about("Change the topology of a network snapshot, then reinitialize its weights")
                .arg(net_arg())
                .arg(
                    Arg::new("Op")
                        .long("op")
                        .help("insert, remove, resize, add_neuron or remove_neuron")
                        .takes_value(true)
                        .require_equals(true)
                        .required(true),
                )
                .arg(
                    Arg::new("Index")
                        .long("index")
                        .short('i')
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(usize))
                        .require_equals(true)
                        .required(true),
                )
                .arg(
                    Arg::new("Count")
                        .long("count")
                        .short('c')
                        .help("Neuron count for insert and resize")
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(usize))
                        .require_equals(true),
                )
                .arg(
                    Arg::new("Seed")
                        .long("seed")
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(u64))
                        .require_equals(true),
                )
                .arg(
                    Arg::new("OutFile")
                        .long("out")
                        .short('o')
                        .help("Mutated snapshot output file, defaults to --net")
                        .takes_value(true)
                        .require_equals(true),
                ),
        )
        .subcommand(dataset_args(train_cmd, false))
        .subcommand(dataset_args(
            Command::new("test")
                .about("Report loss and accuracy of a network snapshot")
                .arg(net_arg()),
            false,
        ))
        .subcommand(dataset_args(
            Command::new("dataset_info").about("Inspect csv dataset").arg(
                Arg::new("ShowN")
                    .long("show_n")
                    .action(ArgAction::Set)
                    .value_parser(clap::value_parser!(usize))
                    .require_equals(true)
                    .default_value("5"),
            ),
            true,
        ))
        .subcommand(
            Command::new("export_state")
                .about("Write the weights of a network snapshot as protobuf state")
                .arg(net_arg())
                .arg(
                    Arg::new("OutFile")
                        .long("out")
                        .short('o')
                        .takes_value(true)
                        .require_equals(true)
                        .default_value("net.state"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("create_net", args)) => create_net::create_net(args)?,
        Some(("mutate", args)) => mutate::mutate_net(args)?,
        Some(("train", args)) => train::train_net(args)?,
        Some(("test", args)) => test::test_net(args)?,
        Some(("dataset_info", args)) => dataset_info::dataset_info(args)?,
        Some(("export_state", args)) => export_state::export_state(args)?,
        _ => (),
    }

    Ok(())
}
