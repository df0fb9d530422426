use std::fs::File;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_DEBOUNCE_QUIET_MS: u64 = 100;
const DEFAULT_DEBOUNCE_MAX_WAIT_MS: u64 = 1000;

// Tuning knobs for the synchronizer.  The defaults are right for an interactive client;
// the settings file exists mostly so people pointing this at enormous clusters can back
// off the poll cadence.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    pub poll_interval_secs: u64,
    pub debounce_quiet_ms: u64,
    pub debounce_max_wait_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> SyncSettings {
        SyncSettings {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            debounce_quiet_ms: DEFAULT_DEBOUNCE_QUIET_MS,
            debounce_max_wait_ms: DEFAULT_DEBOUNCE_MAX_WAIT_MS,
        }
    }
}

impl SyncSettings {
    pub fn load(filename: &str) -> anyhow::Result<SyncSettings> {
        Ok(serde_yaml::from_reader(File::open(filename)?)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn debounce_quiet(&self) -> Duration {
        Duration::from_millis(self.debounce_quiet_ms)
    }

    pub fn debounce_max_wait(&self) -> Duration {
        Duration::from_millis(self.debounce_max_wait_ms)
    }
}
