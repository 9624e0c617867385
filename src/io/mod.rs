pub mod export;
pub mod import;

pub use export::{export_csv, format_power, format_soc, write_csv};
pub use import::{import_csv, parse_power, read_readings};
