//! Post-hoc run summary computed from the emitted rows.

use std::fmt;

use crate::battery::Battery;

use super::types::SocRow;

/// Aggregate figures derived from a complete run.
///
/// Computed post-hoc from `&[SocRow]` so the summary always agrees with the
/// rows that were written.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSummary {
    /// Number of rows.
    pub steps: usize,
    /// Rows with negative power.
    pub charging_steps: usize,
    /// Rows with positive power.
    pub discharging_steps: usize,
    /// Rows with zero power.
    pub idle_steps: usize,
    /// Rows whose power was not a number.
    pub invalid_steps: usize,
    /// Energy added to storage (capacity units, after efficiency).
    pub energy_stored: f64,
    /// Energy removed from storage (capacity units, after efficiency).
    pub energy_drawn: f64,
    /// Lowest SoC seen, ignoring `NaN`.
    pub min_soc: Option<f64>,
    /// Highest SoC seen, ignoring `NaN`.
    pub max_soc: Option<f64>,
    /// SoC after the last row.
    pub final_soc: Option<f64>,
    /// Rows whose SoC is outside `[0.0, 1.0]` (including `NaN`).
    pub out_of_range_steps: usize,
}

impl TraceSummary {
    /// Computes all figures from the complete row vector.
    ///
    /// # Arguments
    ///
    /// * `rows` - Complete run output
    /// * `battery` - Parameters the rows were computed with
    pub fn from_rows(rows: &[SocRow], battery: &Battery) -> Self {
        let mut summary = Self {
            steps: rows.len(),
            charging_steps: 0,
            discharging_steps: 0,
            idle_steps: 0,
            invalid_steps: 0,
            energy_stored: 0.0,
            energy_drawn: 0.0,
            min_soc: None,
            max_soc: None,
            final_soc: rows.last().map(|r| r.soc),
            out_of_range_steps: 0,
        };

        for r in rows {
            if r.power_kw.is_nan() {
                summary.invalid_steps += 1;
            } else if r.power_kw < 0.0 {
                summary.charging_steps += 1;
                summary.energy_stored += battery.energy_delta(r.power_kw);
            } else if r.power_kw > 0.0 {
                summary.discharging_steps += 1;
                summary.energy_drawn -= battery.energy_delta(r.power_kw);
            } else {
                summary.idle_steps += 1;
            }

            if !r.soc_in_range() {
                summary.out_of_range_steps += 1;
            }
            if !r.soc.is_nan() {
                summary.min_soc = Some(summary.min_soc.map_or(r.soc, |m| m.min(r.soc)));
                summary.max_soc = Some(summary.max_soc.map_or(r.soc, |m| m.max(r.soc)));
            }
        }

        summary
    }
}

fn fmt_soc(soc: Option<f64>) -> String {
    soc.map_or_else(|| "n/a".to_string(), |s| format!("{:.2}%", s * 100.0))
}

impl fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- SoC Summary ---")?;
        writeln!(
            f,
            "Steps:            {} ({} charging, {} discharging, {} idle, {} invalid)",
            self.steps,
            self.charging_steps,
            self.discharging_steps,
            self.idle_steps,
            self.invalid_steps
        )?;
        writeln!(f, "Energy stored:    {:.2}", self.energy_stored)?;
        writeln!(f, "Energy drawn:     {:.2}", self.energy_drawn)?;
        writeln!(
            f,
            "SoC range:        {} .. {}",
            fmt_soc(self.min_soc),
            fmt_soc(self.max_soc)
        )?;
        writeln!(f, "Final SoC:        {}", fmt_soc(self.final_soc))?;
        write!(f, "Out of range:     {} steps", self.out_of_range_steps)
    }
}
