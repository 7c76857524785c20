mod http;
mod monitoring;

pub use monitoring::{EnvFilterConfig, MonitoringConfig};

pub use http::client::HttpClientConfig;
