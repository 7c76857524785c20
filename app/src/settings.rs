use config::{Config, ConfigError, Environment, File};
use infrastructure::MonitoringConfig;
use serde::Deserialize;

use crate::adapter::jullix::JullixConfig;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub jullix: JullixConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl Settings {
    ///`config.toml` is optional, environment variables like `JULLIX__HOST` take precedence
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml").required(false))
            .add_source(Environment::default().separator("__").list_separator(","));

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use config::FileFormat;

    fn from_toml(content: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_full_settings() {
        let settings = from_toml(
            r#"
            [jullix]
            host = "192.168.1.50"
            scan_interval_secs = 15
            timeout_secs = 5
            sensor_config = "/etc/jullix/sensor_config.json"

            [monitoring]
            json = true

            [monitoring.logs]
            default_level = "warn"
            filters = ["jullix=debug"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.jullix.base_url(), "http://192.168.1.50");
        assert_eq!(settings.jullix.scan_interval(), Duration::from_secs(15));
        assert_eq!(settings.jullix.timeout(), Duration::from_secs(5));
        assert_eq!(settings.monitoring.logs.default_level, "warn");
        assert!(settings.monitoring.json);
    }

    #[test]
    fn test_defaults_apply() {
        let settings = from_toml("[jullix]\nhost = \"http://ems.lan\"\n").unwrap();

        assert_eq!(settings.jullix.base_url(), "http://ems.lan");
        assert_eq!(settings.jullix.scan_interval(), Duration::from_secs(30));
        assert_eq!(settings.jullix.timeout(), Duration::from_secs(10));
        assert_eq!(settings.monitoring.logs.default_level, "info");
    }
}
