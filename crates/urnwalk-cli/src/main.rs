use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use tracing_subscriber::EnvFilter;
use urnwalk_cli::{discover_report, load_config, normalize, LoadedSchema};

fn input_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("schema")
                .long("schema")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Avro schema (.avsc) describing the record"),
        )
        .arg(
            Arg::new("record")
                .long("record")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Record as a JSON document"),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .help("Record type to decode as (defaults to the schema root)"),
        )
}

fn cli() -> Command {
    Command::new("urnwalk")
        .version(urnwalk_core::VERSION)
        .about("Find and normalize URNs inside schema-described records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(input_args(
            Command::new("discover").about("Print every URN with the path that reaches it"),
        ))
        .subcommand(
            input_args(Command::new("normalize").about("Lowercase dataset names in every URN"))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Normalizer settings (YAML)"),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_input(args: &ArgMatches) -> Result<urnwalk_record::Record> {
    let schema_path = args
        .get_one::<PathBuf>("schema")
        .context("--schema is required")?;
    let record_path = args
        .get_one::<PathBuf>("record")
        .context("--record is required")?;

    let schema = LoadedSchema::read(schema_path)?;
    let json = std::fs::read_to_string(record_path)
        .with_context(|| format!("failed to read record {}", record_path.display()))?;
    schema
        .decode(args.get_one::<String>("type").map(String::as_str), &json)
        .with_context(|| format!("in {}", record_path.display()))
}

fn main() -> Result<()> {
    init_tracing();
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("discover", args)) => {
            let record = load_input(args)?;
            print!("{}", discover_report(&record));
        }
        Some(("normalize", args)) => {
            let mut record = load_input(args)?;
            let config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
            normalize(&mut record, config)?;
            println!("{}", serde_json::to_string_pretty(&record.to_json())?);
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}
