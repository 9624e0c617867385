/// Fold of the SoC recurrence over ordered readings.
pub mod engine;
pub mod summary;
pub mod types;

pub use engine::Engine;
pub use summary::TraceSummary;
pub use types::{PowerReading, SocRow};
