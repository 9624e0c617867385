//! Battery state-of-charge calculator over a series of half-hourly power readings.

pub mod battery;
pub mod cli;
pub mod config;
pub mod error;
/// CSV import of power readings and export of annotated rows.
pub mod io;
/// SoC fold engine, row types, and run summary.
pub mod sim;

pub use battery::{Battery, SocBounds, next_soc};
pub use error::Error;
