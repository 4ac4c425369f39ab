//! Tower Geometry CLI
//!
//! Usage:
//!   tower-geometry [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>       Run settings (TOML format)
//!       --dictionary <FILE>   Identifier dictionary XML
//!   -a, --anchor <MODE>       edge or center
//!   -f, --flavor <NAME=TABLE> Flavor to resolve (repeatable)
//!       --strict              Check indices against dictionary ranges
//!       --lint                Report overlapping or degenerate towers
//!   -d, --debug               Verbose logging
//!   -h, --help                Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tower_geometry::resolve::lint;
use tower_geometry::settings::parse_flavor_arg;
use tower_geometry::{
    format_catalog, run, AnchorMode, FlavorConfig, OutputConfig, RunError, Settings,
};

#[derive(Parser)]
#[command(name = "tower-geometry")]
#[command(about = "Resolve trigger tower indices into eta/phi coordinates")]
struct Cli {
    /// Run settings file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Identifier dictionary XML, overriding the settings
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Coordinate anchor: edge or center
    #[arg(short, long)]
    anchor: Option<AnchorMode>,

    /// Flavor and table as NAME=TABLE; replaces the configured flavors
    #[arg(short, long = "flavor", value_parser = parse_flavor_arg)]
    flavors: Vec<FlavorConfig>,

    /// Check indices against range constraints and sampling labels
    #[arg(long)]
    strict: bool,

    /// Report overlapping, degenerate or duplicate towers on stderr
    #[arg(long)]
    lint: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report = match run(&settings) {
        Ok(report) => report,
        Err(RunError::Dictionary(e)) => {
            let path = &settings.dictionary;
            match (e.span(), fs::read_to_string(path)) {
                (Some(_), Ok(source)) => {
                    eprintln!("{}", e.format(&source, &path.display().to_string()))
                }
                _ => eprintln!("Error loading dictionary '{}': {}", path.display(), e),
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let output = OutputConfig::default();
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(catalog) => {
                print!("{}", format_catalog(catalog, &output));
                if cli.lint {
                    for warning in lint::check(catalog) {
                        eprintln!(
                            "warning[{}] flavor {}: {}",
                            warning.category, catalog.flavor, warning.message
                        );
                    }
                }
            }
            Err(e) => {
                let table = settings
                    .flavors
                    .iter()
                    .find(|f| f.name == outcome.flavor)
                    .map(|f| f.table.as_path())
                    .unwrap_or_else(|| Path::new("?"));
                eprintln!(
                    "Error resolving flavor {} ({}): {}",
                    outcome.flavor,
                    table.display(),
                    e
                );
            }
        }
    }

    if !report.all_ok() {
        std::process::exit(1);
    }
}

/// Settings file or built-in defaults, with command-line overrides applied
fn load_settings(cli: &Cli) -> Result<Settings, RunError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    if let Some(dictionary) = &cli.dictionary {
        settings = settings.with_dictionary(dictionary);
    }

    let mut catalog = settings.catalog.clone();
    if let Some(anchor) = cli.anchor {
        catalog = catalog.with_anchor(anchor);
    }
    if cli.strict {
        catalog = catalog.with_strict(true);
    }
    settings = settings.with_catalog(catalog);

    if !cli.flavors.is_empty() {
        settings = settings.with_flavors(cli.flavors.clone())?;
    }
    Ok(settings)
}
