use std::env;
use std::path::PathBuf;

use crate::battery::SocBounds;
use crate::config::SocConfig;

#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub clamp: bool,
    pub strict: bool,
    pub summary: bool,
    pub help: bool,
}

impl CliOptions {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut SocConfig) {
        if let Some(input) = &self.input {
            config.input.path.clone_from(input);
        }
        if self.clamp {
            config.battery.bounds = SocBounds::Clamped;
        }
        if self.strict {
            config.input.strict = true;
        }
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--input" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --input (expected a CSV file path)",
                )?;
                if opts.input.replace(PathBuf::from(path)).is_some() {
                    return Err("--input provided more than once".to_string());
                }
            }
            "--output" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --output (expected a file path)",
                )?;
                if opts.output.replace(PathBuf::from(path)).is_some() {
                    return Err("--output provided more than once".to_string());
                }
            }
            "--clamp" => opts.clamp = true,
            "--strict" => opts.strict = true,
            "--summary" => opts.summary = true,
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("battery-soc: state of charge over a series of half-hourly power readings");
    eprintln!();
    eprintln!("Usage: battery-soc [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>   Load battery and input settings from a TOML file");
    eprintln!("  --input <path>    CSV with Time and Power columns (default: power_over_time.csv)");
    eprintln!("  --output <path>   Write the CSV to a file instead of stdout");
    eprintln!("  --clamp           Clamp the state of charge to [0, 1] after every step");
    eprintln!("  --strict          Fail on malformed power values instead of reading them as NaN");
    eprintln!("  --summary         Print a run summary to stderr");
    eprintln!("  --help            Show this help message");
    eprintln!();
    eprintln!("Logging goes to stderr and is controlled by RUST_LOG (default: warn).");
}
