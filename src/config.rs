use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Console timing configuration.
///
/// Loaded from a JSON document with the same camelCase conventions as the
/// rest of the console's data. Every field has a default, so a partial file
/// still yields a working configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_tick_interval_ms")]
    tick_interval_ms: u64,
    #[serde(default = "default_refresh_interval_ms")]
    refresh_interval_ms: u64,
}

impl Config {
    /// Read a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Cadence of countdown recomputation. The dashboard relies on this
    /// staying at (close to) one second for a smoothly counting display.
    pub fn tick_interval(&self) -> Duration {
        // Timer periods must be non-zero.
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Cadence of full record refreshes from the backing source.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    1_000
}

fn default_refresh_interval_ms() -> u64 {
    30_000
}
