use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[display("meter")]
    Meter,
    #[display("solar")]
    Solar,
    #[display("battery")]
    Battery,
    #[display("charger")]
    Charger,
    #[display("plug")]
    Plug,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Meter,
        Category::Solar,
        Category::Battery,
        Category::Charger,
        Category::Plug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Meter => "meter",
            Category::Solar => "solar",
            Category::Battery => "battery",
            Category::Charger => "charger",
            Category::Plug => "plug",
        }
    }

    ///Display name of the category, used as device model and default device name
    pub fn title(&self) -> &'static str {
        match self {
            Category::Meter => "Meter",
            Category::Solar => "Solar",
            Category::Battery => "Battery",
            Category::Charger => "Charger",
            Category::Plug => "Plug",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Meter => "mdi:flash",
            Category::Solar => "mdi:solar-power",
            Category::Battery => "mdi:battery",
            Category::Charger => "mdi:ev-station",
            Category::Plug => "mdi:power-plug",
        }
    }

    pub fn endpoint(&self) -> String {
        format!("/api/ems/{}", self.as_str())
    }

    pub fn is_timestamp_key(&self, key: &str) -> bool {
        matches!(self, Category::Meter) && matches!(key, "time" | "captar_month_max_time")
    }
}
