use clap::{crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use pluma::{GenerationOptions, PlumaError};
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("post")
                .about("Creates a new blog post with front matter")
                .arg(
                    Arg::new("name")
                        .help("title of the post, dasherized into the file name")
                        .required(true),
                )
                .arg(
                    Arg::new("target")
                        .help("directory of the post relative to the project root [default: blog]")
                        .short('t')
                        .long("target"),
                )
                .arg(
                    Arg::new("extension")
                        .help("file extension of the post [default: md]")
                        .short('e')
                        .long("extension"),
                )
                .arg(
                    Arg::new("meta-data-file")
                        .help("yaml file with default front matter")
                        .short('m')
                        .long("meta-data-file"),
                )
                .arg(
                    Arg::new("root")
                        .help("project root directory")
                        .short('r')
                        .long("root")
                        .default_value("."),
                ),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    init_logger(is_verbose);

    match matches.subcommand() {
        Some(("post", args)) => handle_post(args)?,
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logger(is_verbose: bool) {
    let mut builder = env_logger::Builder::new();

    if is_verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder
            .filter_level(log::LevelFilter::Warn)
            .filter_module(crate_name!(), log::LevelFilter::Info);
    }

    builder.parse_default_env().init();
}

fn handle_post(args: &ArgMatches) -> Result<(), PlumaError> {
    let name = args.get_one::<String>("name").expect("name required");
    let root = args
        .get_one::<String>("root")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let options = GenerationOptions {
        name: name.clone(),
        target: args.get_one::<String>("target").cloned(),
        extension: args.get_one::<String>("extension").cloned(),
        meta_data_file: args.get_one::<String>("meta-data-file").cloned(),
    };

    let created = pluma::add_post(&root, options)?;

    println!("{} {}", "create".green(), created.target.full_path);

    Ok(())
}
