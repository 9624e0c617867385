//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use battery_soc::io::write_csv;
use battery_soc::sim::{Engine, PowerReading, SocRow};

/// Builds readings labelled `1..=n` from a list of powers.
pub fn readings(powers: &[f64]) -> Vec<PowerReading> {
    powers
        .iter()
        .enumerate()
        .map(|(i, &p)| PowerReading::new((i + 1).to_string(), p))
        .collect()
}

/// Default engine (starting SoC 0.8, capacity 100, efficiency 0.9, 30 min interval).
pub fn default_engine() -> Engine {
    Engine::default()
}

/// Renders rows to the CSV text the binary would print.
pub fn render(rows: &[SocRow]) -> String {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf).expect("CSV write should succeed");
    String::from_utf8(buf).expect("CSV output should be UTF-8")
}

/// Writes `contents` to a fresh file in the system temp directory.
///
/// The name includes the process id and `name` so parallel tests don't collide.
pub fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("battery-soc-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join(name);
    fs::write(&path, contents).expect("temp file should be writable");
    path
}
