//! Argument definitions and dispatch

use crate::commands::{self, Lab, OutputFormat, ValuesFormat};
use crate::config::LabConfig;
use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use otlab_core::ScenarioId;
use otlab_resolve::Overrides;
use std::path::PathBuf;

fn scenario_arg(required: bool) -> Arg {
    Arg::new("scenario")
        .required(required)
        .value_parser(|s: &str| s.parse::<ScenarioId>())
        .help("Scenario id: scenario1, 1, the pattern name or the alias (datadog, otel, ddot)")
}

fn override_args() -> [Arg; 3] {
    [
        Arg::new("endpoint")
            .long("endpoint")
            .value_name("URL")
            .help("Telemetry endpoint override"),
        Arg::new("namespace")
            .long("namespace")
            .value_name("NS")
            .help("Namespace override"),
        Arg::new("prefix")
            .long("prefix")
            .value_name("PREFIX")
            .help("Service prefix override"),
    ]
}

fn service_arg() -> Arg {
    Arg::new("service")
        .long("service")
        .value_name("NAME")
        .help("Service base name from the demo catalog")
}

/// Command-line definition
#[must_use]
pub fn command() -> Command {
    Command::new("otlab")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve telemetry lab scenarios into deployable configuration")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("registry")
                .long("registry")
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("YAML scenario registry replacing the built-in table"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Lab config file (default: ./otlab.yaml if present)"),
        )
        .arg(
            Arg::new("repo")
                .long("repo")
                .global(true)
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Working tree inspected for revision info"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("list").about("List registered scenarios"))
        .subcommand(
            Command::new("describe")
                .about("Show a scenario descriptor")
                .arg(scenario_arg(true)),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a scenario with overrides")
                .arg(scenario_arg(true))
                .args(override_args()),
        )
        .subcommand(
            Command::new("metadata")
                .about("Show labels, annotations and service environment")
                .arg(scenario_arg(true))
                .args(override_args())
                .arg(service_arg()),
        )
        .subcommand(
            Command::new("values")
                .about("Render Helm values")
                .arg(scenario_arg(true))
                .args(override_args())
                .arg(service_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("set")
                        .value_parser(["set", "yaml"])
                        .help("Render as --set-string arguments or YAML"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Print the deploy plan as shell commands")
                .arg(scenario_arg(false))
                .args(override_args())
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("scenario")
                        .help("Plan every registered scenario"),
                ),
        )
}

/// Check whether `-v` was given anywhere on the command line
#[must_use]
pub fn verbose(matches: &ArgMatches) -> bool {
    matches.get_flag("verbose")
        || matches
            .subcommand()
            .is_some_and(|(_, args)| args.get_flag("verbose"))
}

fn overrides(args: &ArgMatches) -> Overrides {
    Overrides {
        endpoint: args.get_one::<String>("endpoint").cloned(),
        namespace: args.get_one::<String>("namespace").cloned(),
        service_prefix: args.get_one::<String>("prefix").cloned(),
    }
}

fn scenario(args: &ArgMatches) -> Result<ScenarioId> {
    args.get_one::<ScenarioId>("scenario")
        .copied()
        .context("missing scenario")
}

fn load_config(args: &ArgMatches) -> Result<LabConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => LabConfig::from_file(path)?,
        None => LabConfig::discover(".")?,
    };
    if let Some(path) = args.get_one::<PathBuf>("registry") {
        config = config.with_registry_file(path);
    }
    if let Some(path) = args.get_one::<PathBuf>("repo") {
        config = config.with_repository_root(path);
    }
    Ok(config)
}

/// Execute parsed arguments and return what should go to stdout
///
/// # Errors
/// Any configuration, registry or resolution failure.
pub fn run(matches: &ArgMatches) -> Result<String> {
    let Some((name, args)) = matches.subcommand() else {
        bail!("no subcommand given");
    };

    let lab = Lab::load(load_config(args)?)?;
    run_with(&lab, name, args)
}

/// Execute a subcommand against an already loaded lab
///
/// # Errors
/// As [`run`].
pub fn run_with(lab: &Lab, name: &str, args: &ArgMatches) -> Result<String> {
    let format = if args.get_flag("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let service = args
        .try_get_one::<String>("service")
        .ok()
        .flatten()
        .map(String::as_str);

    match name {
        "list" => commands::list(lab, format),
        "describe" => commands::describe(lab, scenario(args)?, format),
        "resolve" => commands::resolve(lab, scenario(args)?, &overrides(args), format),
        "metadata" => commands::metadata(lab, scenario(args)?, &overrides(args), service, format),
        "values" => {
            let values_format = match args.get_one::<String>("format").map(String::as_str) {
                Some("yaml") => ValuesFormat::Yaml,
                _ => ValuesFormat::Set,
            };
            commands::values(lab, scenario(args)?, &overrides(args), service, values_format)
        }
        "plan" => {
            let ids: Vec<ScenarioId> = if args.get_flag("all") {
                lab.registry().all_scenarios().collect()
            } else {
                match args.get_one::<ScenarioId>("scenario") {
                    Some(&id) => vec![id],
                    None => bail!("plan needs a scenario or --all"),
                }
            };
            commands::plan(lab, &ids, &overrides(args), format)
        }
        other => bail!("unknown subcommand '{other}'"),
    }
}
