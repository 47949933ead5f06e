//! Command-line interface for iscconf
//! Reads one configuration file and prints it back in the chosen format.
//!
//! Usage:
//!   iscconf `<path>` [--dialect `<dialect>`] [--format `<format>`] [--sort] [--typed] [--config `<file>`]
//!
//! Formats: isc (default), treeviz, json, yaml, tokens. Zone files always go through the typed
//! zone model; `--typed` selects the typed model for dhcpd files too.

use clap::{Arg, ArgAction, ArgMatches, Command};
use iscconf::isc::config::{IscConfig, Loader};
use iscconf::isc::dhcpd::{Global, ToIsc};
use iscconf::isc::dialect::Dialect;
use iscconf::isc::formats::{to_json, to_yaml, FormatRegistry};
use iscconf::isc::loader::{guess_dialect, DocumentLoader};
use iscconf::isc::sorting::sort_tree;
use iscconf::isc::zone::Zone;
use std::fmt::Display;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("iscconf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse and rewrite ISC configuration files (dhcpd.conf, named.conf, zone files)")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the configuration file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("dialect")
                .long("dialect")
                .short('d')
                .help("dhcpd, named or zone (default: guessed from the file name, then cli.default_dialect)")
                .value_parser(["dhcpd", "named", "zone"]),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["isc", "treeviz", "json", "yaml", "tokens"])
                .default_value("isc"),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .help("Sort top-level declarations before printing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("typed")
                .long("typed")
                .help("Go through the typed dhcpd model instead of the generic tree")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .get_matches();

    let config = load_config(&matches);
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or_default();
    let dialect = resolve_dialect(&matches, path, &config);
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("isc");

    let loader = DocumentLoader::from_path(path)
        .unwrap_or_else(|e| fail("Cannot load file", e))
        .with_dialect(dialect);
    debug!(path, %dialect, format, "loaded");

    let output = if format == "tokens" {
        let tokens = loader.tokenize().unwrap_or_else(|e| fail("Parse error", e));
        to_json(&tokens).unwrap_or_else(|e| fail("Error formatting tokens", e))
    } else if dialect == Dialect::Zone {
        let zone = loader.zone_model().unwrap_or_else(|e| fail("Parse error", e));
        render_zone(&zone, format, &config)
    } else if matches.get_flag("typed") {
        if dialect != Dialect::Dhcpd {
            fail("--typed", "only the dhcpd dialect has a typed model");
        }
        let mut global = loader.dhcpd_model().unwrap_or_else(|e| fail("Parse error", e));
        if matches.get_flag("sort") {
            global.sort_subnets();
        }
        render_dhcpd(&global, format, &config)
    } else {
        let mut tree = loader.parse().unwrap_or_else(|e| fail("Parse error", e));
        if matches.get_flag("sort") {
            tree = sort_tree(&tree, dialect);
        }
        FormatRegistry::with_defaults(config.serialize_options(dialect))
            .serialize(&tree, format)
            .unwrap_or_else(|e| fail("Output error", e))
    };

    print!("{}", output);
}

fn load_config(matches: &ArgMatches) -> IscConfig {
    let loader = match matches.get_one::<String>("config") {
        Some(file) => Loader::new().with_file(file),
        None => Loader::new(),
    };
    loader
        .build()
        .unwrap_or_else(|e| fail("Configuration error", e))
}

/// `--dialect`, else the file name, else `cli.default_dialect`.
fn resolve_dialect(matches: &ArgMatches, path: &str, config: &IscConfig) -> Dialect {
    match matches.get_one::<String>("dialect") {
        Some(name) => name.parse().unwrap_or_else(|e: String| fail("Bad dialect", e)),
        None => guess_dialect(Path::new(path)).unwrap_or(config.cli.default_dialect),
    }
}

fn render_zone(zone: &Zone, format: &str, config: &IscConfig) -> String {
    match format {
        "isc" => zone.to_isc_with(&config.zone_layout()),
        "json" => to_json(zone).unwrap_or_else(|e| fail("Output error", e)),
        "yaml" => to_yaml(zone).unwrap_or_else(|e| fail("Output error", e)),
        other => fail("Format not supported for zone files", other),
    }
}

fn render_dhcpd(global: &Global, format: &str, config: &IscConfig) -> String {
    match format {
        "isc" => global.to_isc_with(&config.serialize_options(Dialect::Dhcpd)),
        "json" => to_json(global).unwrap_or_else(|e| fail("Output error", e)),
        "yaml" => to_yaml(global).unwrap_or_else(|e| fail("Output error", e)),
        other => fail("Format not supported with --typed", other),
    }
}

fn fail(context: &str, error: impl Display) -> ! {
    eprintln!("{}: {}", context, error);
    std::process::exit(1);
}
