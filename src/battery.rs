//! Linear charge/discharge transfer function for a single battery.

use serde::Deserialize;

/// Default state of charge before the first reading is applied.
pub const STARTING_SOC: f64 = 0.8;

/// Default battery capacity in energy units (kWh-like).
pub const BATTERY_CAPACITY: f64 = 100.0;

/// Default conversion efficiency, applied in both directions.
pub const EFFICIENCY_LOSS: f64 = 0.9;

/// Default duration covered by one reading, in hours.
pub const INTERVAL_HOURS: f64 = 0.5;

/// What happens when a step drives the SoC outside `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocBounds {
    /// Values pass through as computed, even below 0 or above 1.
    #[default]
    Unclamped,
    /// Values are clamped to `[0.0, 1.0]` after every step.
    Clamped,
}

/// A battery described only by the parameters of its SoC recurrence.
///
/// # Power Convention (Reading)
/// - Negative power: Charging (energy flows into the battery)
/// - Positive power: Discharging (energy flows out of the battery)
/// - Zero: Idle
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    /// Capacity in energy units; SoC is stored energy divided by this.
    pub capacity: f64,

    /// Conversion efficiency (0..=1.0). Multiplied in when charging, divided out when discharging.
    pub efficiency_loss: f64,

    /// Hours covered by one reading.
    pub interval_hours: f64,

    /// Bounds handling applied after each step.
    pub bounds: SocBounds,
}

impl Default for Battery {
    fn default() -> Self {
        Self {
            capacity: BATTERY_CAPACITY,
            efficiency_loss: EFFICIENCY_LOSS,
            interval_hours: INTERVAL_HOURS,
            bounds: SocBounds::Unclamped,
        }
    }
}

impl Battery {
    /// Creates a battery with the specified parameters.
    ///
    /// Parameters are not checked here; [`crate::config::SocConfig::validate`]
    /// is the place that rejects impossible values read from a file.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Capacity in energy units (should be > 0)
    /// * `efficiency_loss` - Conversion efficiency (0..=1.0)
    /// * `interval_hours` - Hours covered by one reading (should be > 0)
    /// * `bounds` - Clamping behaviour after each step
    pub fn new(capacity: f64, efficiency_loss: f64, interval_hours: f64, bounds: SocBounds) -> Self {
        Self {
            capacity,
            efficiency_loss,
            interval_hours,
            bounds,
        }
    }

    /// Energy moved into (positive) or out of (negative) storage by one reading.
    ///
    /// A `NaN` power takes the discharge branch and yields `NaN`.
    pub fn energy_delta(&self, power_kw: f64) -> f64 {
        if power_kw == 0.0 {
            0.0
        } else if power_kw < 0.0 {
            // Less energy reaches the cells than is drawn from the source
            (power_kw * self.interval_hours * self.efficiency_loss).abs()
        } else {
            // More energy leaves the cells than reaches the load
            -((power_kw * self.interval_hours) / self.efficiency_loss)
        }
    }

    /// Applies one reading to `current_soc` and returns the next SoC.
    ///
    /// An idle reading returns `current_soc` bit-for-bit, even in clamped
    /// mode. Never fails; out-of-range and `NaN` results are returned as-is
    /// unless [`SocBounds::Clamped`] is selected.
    pub fn next_soc(&self, power_kw: f64, current_soc: f64) -> f64 {
        if power_kw == 0.0 {
            return current_soc;
        }

        let current_energy = current_soc * self.capacity;
        let next = (current_energy + self.energy_delta(power_kw)) / self.capacity;

        match self.bounds {
            SocBounds::Unclamped => next,
            SocBounds::Clamped => next.clamp(0.0, 1.0),
        }
    }
}

/// Applies one reading with the default battery parameters.
///
/// # Examples
///
/// ```
/// use battery_soc::next_soc;
///
/// assert_eq!(next_soc(0.0, 0.8), 0.8);
/// assert!((next_soc(-10.0, 0.8) - 0.845).abs() < 1e-12);
/// assert!((next_soc(10.0, 0.8) - 0.744_444_444_444).abs() < 1e-9);
/// ```
pub fn next_soc(power_kw: f64, current_soc: f64) -> f64 {
    Battery::default().next_soc(power_kw, current_soc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_battery() {
        let battery = Battery::default();
        assert_eq!(battery.capacity, 100.0);
        assert_eq!(battery.efficiency_loss, 0.9);
        assert_eq!(battery.interval_hours, 0.5);
        assert_eq!(battery.bounds, SocBounds::Unclamped);
    }

    #[test]
    fn test_idle_is_exact_noop() {
        let battery = Battery::default();
        for soc in [0.0, 0.1234567, 0.8, 1.0, -0.3, 1.7] {
            assert_eq!(battery.next_soc(0.0, soc).to_bits(), soc.to_bits());
        }
    }

    #[test]
    fn test_negative_zero_power_is_idle() {
        assert_eq!(next_soc(-0.0, 0.42), 0.42);
    }

    #[test]
    fn test_charge_applies_efficiency_by_multiplying() {
        // 10 kW for 0.5 h = 5 kWh drawn, 90% stored = 4.5 kWh
        let battery = Battery::default();
        assert!((battery.energy_delta(-10.0) - 4.5).abs() < 1e-12);
        assert!((battery.next_soc(-10.0, 0.8) - 0.845).abs() < 1e-12);
    }

    #[test]
    fn test_discharge_applies_efficiency_by_dividing() {
        // 10 kW for 0.5 h = 5 kWh delivered, 5 / 0.9 kWh removed
        let battery = Battery::default();
        assert!((battery.energy_delta(10.0) + 5.0 / 0.9).abs() < 1e-12);
        let expected = (80.0 - 5.0 / 0.9) / 100.0;
        assert!((battery.next_soc(10.0, 0.8) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unclamped_allows_overflow_and_underflow() {
        let battery = Battery::default();
        let over = battery.next_soc(-100.0, 0.9);
        let under = battery.next_soc(100.0, 0.1);
        assert!(over > 1.0, "expected > 1.0, got {over}");
        assert!(under < 0.0, "expected < 0.0, got {under}");
    }

    #[test]
    fn test_clamped_limits_to_unit_interval() {
        let battery = Battery {
            bounds: SocBounds::Clamped,
            ..Battery::default()
        };
        assert_eq!(battery.next_soc(-100.0, 0.9), 1.0);
        assert_eq!(battery.next_soc(100.0, 0.1), 0.0);
        assert!((battery.next_soc(-10.0, 0.8) - 0.845).abs() < 1e-12);
    }

    #[test]
    fn test_nan_power_poisons_soc() {
        let battery = Battery::default();
        assert!(battery.energy_delta(f64::NAN).is_nan());
        assert!(battery.next_soc(f64::NAN, 0.8).is_nan());
        // Once poisoned, even idle steps keep NaN
        assert!(battery.next_soc(0.0, f64::NAN).is_nan());
        assert!(battery.next_soc(-5.0, f64::NAN).is_nan());
    }

    #[test]
    fn test_interval_scales_delta() {
        let hourly = Battery::new(100.0, 0.9, 1.0, SocBounds::Unclamped);
        assert!((hourly.energy_delta(-10.0) - 9.0).abs() < 1e-12);
        assert!((hourly.energy_delta(9.0) + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_scales_soc() {
        let small = Battery::new(10.0, 1.0, 0.5, SocBounds::Unclamped);
        // 2 kW for 0.5 h into a 10 kWh battery at 50% = 60%
        assert!((small.next_soc(-2.0, 0.5) - 0.6).abs() < 1e-12);
    }
}
