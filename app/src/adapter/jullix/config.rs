use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_HOST: &str = "http://jullix.local";
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SENSOR_CONFIG: &str = "sensor_config.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JullixConfig {
    pub host: String,
    pub scan_interval_secs: u64,
    pub timeout_secs: u64,
    pub sensor_config: PathBuf,
}

impl Default for JullixConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sensor_config: PathBuf::from(DEFAULT_SENSOR_CONFIG),
        }
    }
}

impl JullixConfig {
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');

        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_owned()
        } else {
            format!("http://{host}")
        }
    }

    pub fn scan_interval(&self) -> Duration {
        //zero would make tokio's interval panic
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
