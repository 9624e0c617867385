//! Error type shared by the library and the binary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Everything that can abort a run before or after the SoC fold.
///
/// The fold itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open \"{}\": {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),

    #[error("invalid power value \"{value}\" on line {line}")]
    InvalidPower { line: u64, value: String },

    #[error("{}", join_config_errors(.0))]
    Config(Vec<ConfigError>),
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Self::Config(vec![error])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_power_mentions_line_and_value() {
        let e = Error::InvalidPower {
            line: 4,
            value: "abc".to_string(),
        };
        assert_eq!(e.to_string(), "invalid power value \"abc\" on line 4");
    }

    #[test]
    fn config_errors_are_joined() {
        let e = Error::Config(vec![
            ConfigError {
                field: "battery.capacity".into(),
                message: "must be > 0".into(),
            },
            ConfigError {
                field: "input.path".into(),
                message: "must not be empty".into(),
            },
        ]);
        assert_eq!(
            e.to_string(),
            "config error: battery.capacity: must be > 0; \
             config error: input.path: must not be empty"
        );
    }
}
