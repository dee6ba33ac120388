use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use mframe_cli::inspect::render_table;
use mframe_cli::train::input::TrainConfig;
use mframe_cli::train::trainer;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(
            env_logger::Env::default().filter_or("MFRAME_LOG", "warn,mframe=info,mframe_cli=info"),
        )
        .init();

    let matches = Command::new("mframe")
        .version(clap::crate_version!())
        .about("Train and inspect gradient-descent regression models on delimited text tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Fit a linear regression model and report its test error")
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration file (JSON)")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_data")
                        .short('d')
                        .long("train_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to training data. Overrides the training data file \
                             specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_data")
                        .short('t')
                        .long("test_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to test data. When neither this nor the configuration \
                             file names one, part of the training data is held out.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("CSV file that test-set predictions will be written to.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("model_file")
                        .short('m')
                        .long("model_file")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("JSON file that the fitted model will be written to.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Target column: a label or a zero-based position.")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("features")
                        .long("features")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Feature columns: a label, a comma-separated label list, a position, or a slice like 1..3.")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("epochs")
                        .long("epochs")
                        .value_parser(clap::value_parser!(usize))
                        .help("Number of gradient-descent epochs."),
                )
                .arg(
                    Arg::new("learning_rate")
                        .long("learning-rate")
                        .value_parser(clap::value_parser!(f64))
                        .help("Gradient step scale."),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print a preview of a delimited data file")
                .arg(
                    Arg::new("data")
                        .help("Path to the data file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("separator")
                        .long("sep")
                        .default_value(",")
                        .help("Field separator; may be longer than one character."),
                )
                .arg(
                    Arg::new("no_header")
                        .long("no-header")
                        .help("Treat the first line as data instead of column labels.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("inspect", sub_m)) => handle_inspect(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let Some(config_path) = matches.get_one::<PathBuf>("config") else {
        eprintln!("[mframe::train] No config file provided; printing a default config template.");
        println!("{}", serde_json::to_string_pretty(&TrainConfig::default())?);
        return Ok(());
    };
    log::info!("[mframe::train] Training from config: {:?}", config_path);

    let params = TrainConfig::from_arguments(config_path, matches)?;

    match trainer::run_training(&params) {
        Ok(summary) => {
            println!("Mean absolute error: {:.2}", summary.mean_absolute_error);
            println!("R2 score: {:.4}", summary.r2);
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_inspect(matches: &ArgMatches) -> Result<()> {
    let Some(path) = matches.get_one::<PathBuf>("data") else {
        anyhow::bail!("A data file is required");
    };
    let separator = matches
        .get_one::<String>("separator")
        .map_or(",", String::as_str);
    let header = !matches.get_flag("no_header");

    println!("{}", render_table(path, separator, header)?);
    Ok(())
}
