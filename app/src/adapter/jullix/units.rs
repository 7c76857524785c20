use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use super::Category;

///Unit of measurement per category and flattened key, read from a document like
///`{"meter": {"power": {"unit_of_measurement": "W"}}}`
#[derive(Debug, Clone, Default)]
pub struct UnitLookup {
    config: Value,
}

impl UnitLookup {
    ///Never fails. A missing or broken file results in sensors without units.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(lookup) => {
                tracing::info!("Loaded sensor config from {}", path.display());
                lookup
            }
            Err(e) => {
                tracing::error!("Sensor config not available, no units will be set: {:?}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading sensor config {}", path.display()))?;

        let config = serde_json::from_str(&content)
            .with_context(|| format!("Error parsing sensor config {}", path.display()))?;

        Ok(Self::new(config))
    }

    pub fn new(config: Value) -> Self {
        Self { config }
    }

    pub fn unit_for(&self, category: Category, key: &str) -> Option<&str> {
        self.config
            .get(category.as_str())?
            .get(key)?
            .get("unit_of_measurement")?
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup() -> UnitLookup {
        UnitLookup::new(json!({
            "meter": {
                "power": {"unit_of_measurement": "W"},
                "captar_month_max": {"unit_of_measurement": "kW", "device_class": "power"},
                "tariff": {"device_class": "enum"}
            },
            "battery": {"soc": {"unit_of_measurement": "%"}}
        }))
    }

    #[test]
    fn test_unit_found() {
        assert_eq!(lookup().unit_for(Category::Meter, "power"), Some("W"));
        assert_eq!(lookup().unit_for(Category::Meter, "captar_month_max"), Some("kW"));
        assert_eq!(lookup().unit_for(Category::Battery, "soc"), Some("%"));
    }

    #[test]
    fn test_absent_on_any_level() {
        assert_eq!(lookup().unit_for(Category::Solar, "power"), None);
        assert_eq!(lookup().unit_for(Category::Meter, "voltage"), None);
        assert_eq!(lookup().unit_for(Category::Meter, "tariff"), None);
    }

    #[test]
    fn test_missing_file_degrades_to_no_units() {
        let lookup = UnitLookup::load(Path::new("does/not/exist/sensor_config.json"));

        assert_eq!(lookup.unit_for(Category::Meter, "power"), None);
    }

    #[test]
    fn test_malformed_file_degrades_to_no_units() {
        let path = std::env::temp_dir().join(format!("jullix-units-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let lookup = UnitLookup::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(lookup.unit_for(Category::Meter, "power"), None);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("jullix-units-ok-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"plug": {"power": {"unit_of_measurement": "W"}}}"#).unwrap();

        let lookup = UnitLookup::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(lookup.unit_for(Category::Plug, "power"), Some("W"));
    }
}
