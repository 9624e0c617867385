//! CSV import of power readings.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Error;
use crate::sim::types::PowerReading;

/// Header of the time label column.
pub const TIME_COLUMN: &str = "Time";

/// Header of the power column.
pub const POWER_COLUMN: &str = "Power";

/// One CSV record before the power field is interpreted.
#[derive(Debug, Deserialize)]
struct RawReading {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Power")]
    power: String,
}

/// Parses a power field as a whole number of kW.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is
/// not a signed 64-bit integer, including decimals and exponent forms.
///
/// # Examples
///
/// ```
/// use battery_soc::io::parse_power;
///
/// assert_eq!(parse_power("-10"), Some(-10.0));
/// assert_eq!(parse_power(" 7 "), Some(7.0));
/// assert_eq!(parse_power("2.5"), None);
/// assert_eq!(parse_power("abc"), None);
/// assert_eq!(parse_power(""), None);
/// ```
pub fn parse_power(field: &str) -> Option<f64> {
    field.trim().parse::<i64>().ok().map(|p| p as f64)
}

/// Opens a CSV file and reads every reading in file order.
///
/// # Arguments
///
/// * `path` - CSV file with `Time` and `Power` columns
/// * `strict` - Fail on the first malformed power field instead of reading it as `NaN`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, see [`read_readings`].
pub fn import_csv(path: &Path, strict: bool) -> Result<Vec<PowerReading>, Error> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "reading power readings");
    read_readings(io::BufReader::new(file), strict)
}

/// Reads every reading from any CSV source, in order.
///
/// Columns other than `Time` and `Power` are ignored. In lenient mode a
/// malformed power field is logged and read as `NaN`, which poisons every
/// SoC computed after it.
///
/// # Errors
///
/// Returns an error if a required column is missing, the CSV is structurally
/// invalid, or (in strict mode) a power field is not an integer.
pub fn read_readings(reader: impl Read, strict: bool) -> Result<Vec<PowerReading>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in [TIME_COLUMN, POWER_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn(column));
        }
    }

    let mut readings = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let raw: RawReading = record.deserialize(Some(&headers))?;
        let line = record.position().map_or(0, csv::Position::line);

        let power_kw = match parse_power(&raw.power) {
            Some(p) => p,
            None if strict => {
                return Err(Error::InvalidPower {
                    line,
                    value: raw.power,
                });
            }
            None => {
                warn!(line, value = %raw.power, "power is not a number, reading as NaN");
                f64::NAN
            }
        };

        readings.push(PowerReading {
            time: raw.time,
            power_kw,
        });
    }

    debug!(count = readings.len(), "read power readings");
    Ok(readings)
}
