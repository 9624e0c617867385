//! SoC engine: a left-to-right fold of the battery recurrence over ordered readings.

use tracing::{trace, warn};

use crate::battery::{Battery, STARTING_SOC};

use super::types::{PowerReading, SocRow};

/// Fold engine owning the battery parameters and the seed SoC.
///
/// The engine holds no running state of its own; every call to
/// [`Engine::trace`], [`Engine::run`] or [`Engine::final_soc`] starts again
/// from `starting_soc`, so repeated runs over the same readings are
/// bit-identical.
///
/// # Examples
///
/// ```
/// use battery_soc::sim::engine::Engine;
/// use battery_soc::sim::types::PowerReading;
///
/// let engine = Engine::default();
/// let rows = engine.run(vec![
///     PowerReading::new("1", 0.0),
///     PowerReading::new("2", -10.0),
/// ]);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].soc, 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    battery: Battery,
    starting_soc: f64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Battery::default(), STARTING_SOC)
    }
}

impl Engine {
    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `battery` - Transfer function parameters
    /// * `starting_soc` - SoC before the first reading
    pub fn new(battery: Battery, starting_soc: f64) -> Self {
        Self {
            battery,
            starting_soc,
        }
    }

    /// Lazily applies readings in order, yielding one row per reading.
    ///
    /// Pulls one reading at a time and carries only the unrounded SoC
    /// between steps.
    pub fn trace<I>(&self, readings: I) -> Trace<'_, I::IntoIter>
    where
        I: IntoIterator<Item = PowerReading>,
    {
        Trace {
            battery: &self.battery,
            soc: self.starting_soc,
            in_range: (0.0..=1.0).contains(&self.starting_soc),
            readings: readings.into_iter(),
        }
    }

    /// Applies all readings in order and returns the complete row vector.
    ///
    /// An empty input yields an empty vector.
    pub fn run<I>(&self, readings: I) -> Vec<SocRow>
    where
        I: IntoIterator<Item = PowerReading>,
    {
        self.trace(readings).collect()
    }

    /// Folds readings down to the SoC after the last one, without building rows.
    ///
    /// Returns `starting_soc` for an empty input.
    pub fn final_soc<'r, I>(&self, readings: I) -> f64
    where
        I: IntoIterator<Item = &'r PowerReading>,
    {
        readings.into_iter().fold(self.starting_soc, |soc, reading| {
            self.battery.next_soc(reading.power_kw, soc)
        })
    }

    /// Returns a reference to the battery parameters.
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Returns the SoC the fold is seeded with.
    pub fn starting_soc(&self) -> f64 {
        self.starting_soc
    }
}

/// Iterator returned by [`Engine::trace`].
#[derive(Debug)]
pub struct Trace<'a, I> {
    battery: &'a Battery,
    soc: f64,
    in_range: bool,
    readings: I,
}

impl<I> Iterator for Trace<'_, I>
where
    I: Iterator<Item = PowerReading>,
{
    type Item = SocRow;

    fn next(&mut self) -> Option<SocRow> {
        let PowerReading { time, power_kw } = self.readings.next()?;
        let soc = self.battery.next_soc(power_kw, self.soc);
        trace!(%time, power_kw, from = self.soc, to = soc, "step");

        let in_range = (0.0..=1.0).contains(&soc);
        if self.in_range && !in_range {
            warn!(%time, soc, "state of charge left [0, 1]");
        }
        self.in_range = in_range;
        self.soc = soc;

        Some(SocRow {
            time,
            power_kw,
            soc,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.readings.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::SocBounds;

    fn readings(powers: &[f64]) -> Vec<PowerReading> {
        powers
            .iter()
            .enumerate()
            .map(|(i, &p)| PowerReading::new((i + 1).to_string(), p))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let engine = Engine::default();
        assert!(engine.run(Vec::new()).is_empty());
        assert_eq!(engine.final_soc(&Vec::<PowerReading>::new()), 0.8);
    }

    #[test]
    fn rows_preserve_time_and_power() {
        let engine = Engine::default();
        let rows = engine.run(vec![
            PowerReading::new("08:00", -4.0),
            PowerReading::new("08:30", 3.0),
        ]);
        assert_eq!(rows[0].time, "08:00");
        assert_eq!(rows[0].power_kw, -4.0);
        assert_eq!(rows[1].time, "08:30");
        assert_eq!(rows[1].power_kw, 3.0);
    }

    #[test]
    fn each_step_folds_previous_soc() {
        let engine = Engine::default();
        let input = readings(&[-10.0, 10.0, 0.0, -2.0]);
        let rows = engine.run(input.clone());

        let battery = Battery::default();
        let mut soc = 0.8;
        for (row, reading) in rows.iter().zip(&input) {
            soc = battery.next_soc(reading.power_kw, soc);
            assert_eq!(row.soc.to_bits(), soc.to_bits());
        }
    }

    #[test]
    fn final_soc_matches_last_row() {
        let engine = Engine::default();
        let input = readings(&[-3.0, 7.0, 0.0, 1.5, -9.0]);
        let rows = engine.run(input.clone());
        assert_eq!(
            engine.final_soc(&input).to_bits(),
            rows.last().map(|r| r.soc.to_bits()).unwrap_or_default()
        );
    }

    #[test]
    fn trace_is_lazy_and_carries_soc() {
        let engine = Engine::default();
        let mut trace = engine.trace(readings(&[-10.0, 0.0]));
        assert_eq!(trace.size_hint(), (2, Some(2)));

        let first = trace.next().map(|r| r.soc);
        assert_eq!(first, Some(Battery::default().next_soc(-10.0, 0.8)));
        let second = trace.next().map(|r| r.soc);
        assert_eq!(second, first);
        assert!(trace.next().is_none());
    }

    #[test]
    fn custom_starting_soc_is_used() {
        let engine = Engine::new(Battery::default(), 0.25);
        let rows = engine.run(readings(&[0.0]));
        assert_eq!(rows[0].soc, 0.25);
        assert_eq!(engine.starting_soc(), 0.25);
    }

    #[test]
    fn clamped_engine_stays_in_range() {
        let battery = Battery {
            bounds: SocBounds::Clamped,
            ..Battery::default()
        };
        let engine = Engine::new(battery, 0.8);
        let rows = engine.run(readings(&[-100.0, -100.0, 100.0, 100.0, 100.0]));
        assert!(rows.iter().all(SocRow::soc_in_range));
        assert_eq!(rows[0].soc, 1.0);
        assert_eq!(rows[4].soc, 0.0);
    }

    #[test]
    fn unclamped_engine_leaves_range() {
        let engine = Engine::default();
        let rows = engine.run(readings(&[-100.0, 100.0, 100.0, 100.0]));
        assert!(rows[0].soc > 1.0);
        assert!(rows[3].soc < 0.0);
    }

    #[test]
    fn nan_reading_poisons_remaining_rows() {
        let engine = Engine::default();
        let rows = engine.run(readings(&[-1.0, f64::NAN, 0.0, -5.0]));
        assert!(rows[0].soc.is_finite());
        assert!(rows[1..].iter().all(|r| r.soc.is_nan()));
    }
}
