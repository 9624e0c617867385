//! CSV export for annotated SoC rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::SocRow;

/// Output column header.
pub const HEADER: [&str; 3] = ["Time", "Power", "SOC"];

/// Formats a SoC fraction with exactly two decimals.
///
/// Rounds the exact binary value of `soc`. Values sitting exactly halfway
/// between two hundredths (only `j / 8` for odd `j` is representable) round
/// away from zero. A computed `0.845` is stored just below 0.845 and so
/// prints `0.84`. Negative zero prints as `0.00`, `NaN` as `NaN`.
///
/// # Examples
///
/// ```
/// use battery_soc::io::format_soc;
///
/// assert_eq!(format_soc(0.8), "0.80");
/// assert_eq!(format_soc(0.7444), "0.74");
/// assert_eq!(format_soc(0.125), "0.13");
/// assert_eq!(format_soc(-0.125), "-0.13");
/// ```
pub fn format_soc(soc: f64) -> String {
    if soc == 0.0 {
        return "0.00".to_string();
    }

    let eighths = soc * 8.0;
    if eighths.is_finite()
        && eighths.fract() == 0.0
        && eighths.abs() < 9_007_199_254_740_992.0
        && (eighths as i64) % 2 != 0
    {
        // Exact tie: soc * 100 is an exact half, round() goes away from zero
        let hundredths = (soc * 100.0).round() as i64;
        let sign = if hundredths < 0 { "-" } else { "" };
        let abs = hundredths.unsigned_abs();
        return format!("{sign}{}.{:02}", abs / 100, abs % 100);
    }

    format!("{soc:.2}")
}

/// Formats a power value for the `Power` column.
///
/// Whole numbers print without a fractional part (`-10`, and `0` for
/// negative zero). Magnitudes of `1e21` and above use exponent form
/// (`1e+300`). Anything else uses the shortest `f64` display.
///
/// # Examples
///
/// ```
/// use battery_soc::io::format_power;
///
/// assert_eq!(format_power(-10.0), "-10");
/// assert_eq!(format_power(1e300), "1e+300");
/// assert_eq!(format_power(f64::NAN), "NaN");
/// ```
pub fn format_power(power_kw: f64) -> String {
    if power_kw.abs() >= 1e21 {
        let exp = format!("{power_kw:e}");
        return match exp.split_once('e') {
            Some((mantissa, e)) if !e.starts_with('-') => format!("{mantissa}e+{e}"),
            _ => exp,
        };
    }
    if power_kw.fract() == 0.0 {
        return (power_kw as i128).to_string();
    }
    power_kw.to_string()
}

/// Exports rows to a CSV file at the given path.
///
/// # Arguments
///
/// * `rows` - Complete run output
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[SocRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes rows as CSV to any writer.
///
/// Writes the `Time,Power,SOC` header followed by one line per row, in
/// order. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `rows` - Complete run output
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[SocRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;
    for r in rows {
        wtr.write_record(&[r.time.clone(), format_power(r.power_kw), format_soc(r.soc)])?;
    }

    wtr.flush()?;
    Ok(())
}
