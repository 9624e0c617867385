//! battery-soc entry point: CLI wiring, config loading, and the read/fold/write pipeline.

use std::io::{self, IsTerminal};
use std::process;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use battery_soc::cli::{CliOptions, parse_args, print_usage};
use battery_soc::config::SocConfig;
use battery_soc::error::Error;
use battery_soc::io::{export_csv, import_csv, write_csv};
use battery_soc::sim::{Engine, TraceSummary};

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .compact()
        .init();
}

/// Loads the config file (or defaults), applies CLI overrides, and validates.
fn load_config(cli: &CliOptions) -> Result<SocConfig, Error> {
    let mut config = match &cli.config {
        Some(path) => SocConfig::from_toml_file(path)?,
        None => SocConfig::default(),
    };
    cli.apply(&mut config);

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(Error::Config(errors));
    }
    Ok(config)
}

fn run(cli: &CliOptions) -> Result<(), Error> {
    let config = load_config(cli)?;
    debug!(?config, "configuration loaded");

    let readings = import_csv(&config.input.path, config.input.strict)?;
    info!(
        path = %config.input.path.display(),
        count = readings.len(),
        "loaded power readings"
    );

    let engine = Engine::new(config.battery.battery(), config.battery.starting_soc);
    let rows = engine.run(readings);

    match &cli.output {
        Some(path) => {
            export_csv(&rows, path)?;
            info!(path = %path.display(), rows = rows.len(), "SoC rows written");
        }
        None => write_csv(&rows, io::stdout().lock())?,
    }

    let summary = TraceSummary::from_rows(&rows, engine.battery());
    debug!(
        final_soc = summary.final_soc,
        out_of_range = summary.out_of_range_steps,
        invalid = summary.invalid_steps,
        "run complete"
    );
    if cli.summary {
        eprintln!("{summary}");
    }

    Ok(())
}

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        print_usage();
        process::exit(0);
    }

    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
