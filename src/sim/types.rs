//! Core row types: input readings and annotated output rows.

/// One input record: a time label and the power drawn or supplied over that interval.
///
/// # Examples
///
/// ```
/// use battery_soc::sim::types::PowerReading;
///
/// let r = PowerReading::new("1", -10.0);
/// assert_eq!(r.time, "1");
/// assert_eq!(r.power_kw, -10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PowerReading {
    /// Opaque time label, copied to the output unchanged.
    pub time: String,
    /// Signed power (kW; negative=charging, positive=discharging, zero=idle).
    pub power_kw: f64,
}

impl PowerReading {
    /// Creates a reading from a time label and a power value.
    pub fn new(time: impl Into<String>, power_kw: f64) -> Self {
        Self {
            time: time.into(),
            power_kw,
        }
    }
}

/// One output record: the reading it came from and the SoC after applying it.
#[derive(Debug, Clone, PartialEq)]
pub struct SocRow {
    /// Time label of the originating reading.
    pub time: String,
    /// Power of the originating reading (kW).
    pub power_kw: f64,
    /// State of charge after this reading, at full precision.
    pub soc: f64,
}

impl SocRow {
    /// Returns `true` if the SoC is a number inside `[0.0, 1.0]`.
    pub fn soc_in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.soc)
    }
}
