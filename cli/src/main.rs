mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use metagen_core::ChoiceMode;

use commands::GenerateOptions;

fn main() -> ExitCode {
    let cli = Command::new("metagen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates combinator parsers from analyzed PEG grammar trees");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    init_logger(matches.get_count("verbose"));
    dispatch_commands(&matches)
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("Increase log output (-v info, -vv debug, -vvv trace)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true),
    )
    .subcommand_required(true)
    .subcommand(
        Command::new("generate")
            .about("Generate a parser source file for each grammar bundle")
            .arg(
                Arg::new("bundles")
                    .help("Grammar bundle files (JSON with file, source and tree)")
                    .required(true)
                    .num_args(1..)
                    .value_parser(clap::value_parser!(PathBuf))
                    .index(1),
            )
            .arg(
                Arg::new("namespace")
                    .help("Namespace of the generated classes")
                    .short('n')
                    .long("namespace")
                    .required(true)
                    .value_name("NS"),
            )
            .arg(
                Arg::new("out-dir")
                    .help("Directory for generated files (defaults to each bundle's directory)")
                    .short('o')
                    .long("out-dir")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_name("DIR"),
            )
            .arg(
                Arg::new("mode")
                    .help("Ordered choice handling: runtime, strict or all-parses")
                    .short('m')
                    .long("mode")
                    .default_value("runtime")
                    .value_parser(|s: &str| s.parse::<ChoiceMode>())
                    .value_name("MODE"),
            ),
    )
    .subcommand(
        Command::new("inspect")
            .about("Print the analyzed rule table of a grammar bundle")
            .arg(
                Arg::new("bundle")
                    .help("Grammar bundle file")
                    .required(true)
                    .value_parser(clap::value_parser!(PathBuf))
                    .index(1),
            ),
    )
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let config = simplelog::ConfigBuilder::new().set_time_format_custom(&[]).build();
    if let Err(e) = simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("metagen: logging disabled: {}", e);
    }
}

/// Dispatches the command based on the parsed arguments.
fn dispatch_commands(matches: &ArgMatches) -> ExitCode {
    match matches.subcommand() {
        Some(("generate", sub_m)) => {
            let bundles: Vec<PathBuf> = sub_m
                .get_many::<PathBuf>("bundles")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            let options = GenerateOptions {
                namespace: sub_m.get_one::<String>("namespace").cloned().unwrap_or_default(),
                out_dir: sub_m.get_one::<PathBuf>("out-dir").cloned(),
                mode: sub_m.get_one::<ChoiceMode>("mode").copied().unwrap_or_default(),
            };

            if commands::generate(&bundles, &options) == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Some(("inspect", sub_m)) => match sub_m.get_one::<PathBuf>("bundle") {
            Some(path) if commands::inspect(path) => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        },
        _ => {
            eprintln!("No valid subcommand was used. Use --help for more information.");
            ExitCode::FAILURE
        }
    }
}
