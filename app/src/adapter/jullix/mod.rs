mod category;
mod client;
mod config;
mod coordinator;
mod enumerate;
mod flatten;
mod sensor;
mod snapshot;
mod units;

pub use category::Category;
pub use client::JullixHttpClient;
pub use config::JullixConfig;
pub use coordinator::RefreshCoordinator;
pub use enumerate::enumerate_sensors;
pub use flatten::{FlatSample, flatten, flatten_sample};
pub use sensor::{DeviceInfo, JullixSensor, SensorState, SensorValue, SnapshotSource, read_value};
pub use snapshot::{Payload, Sample, Snapshot, device_identity, name_base};
pub use units::UnitLookup;

use infrastructure::HttpClientConfig;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const USER_AGENT: &str = concat!("jullix-adapter/", env!("CARGO_PKG_VERSION"));

///Running adapter for one Jullix device. Owns the refresh task and the sensors created at setup.
pub struct JullixAdapter {
    sensors: Vec<JullixSensor>,
    snapshot: SnapshotSource,
    cancel: CancellationToken,
    refresh_task: Option<JoinHandle<()>>,
}

impl JullixAdapter {
    ///Returns only after the first snapshot was fetched, as sensors are derived from it
    pub async fn setup(config: &JullixConfig) -> anyhow::Result<Self> {
        let units = UnitLookup::load(&config.sensor_config);

        let http_config = HttpClientConfig::new(config.timeout()).with_user_agent(USER_AGENT);
        let client = JullixHttpClient::new(&config.base_url(), &http_config)?;
        let coordinator = RefreshCoordinator::new(client, config.scan_interval());

        tracing::info!("Fetching initial Jullix data from {}", config.base_url());
        let initial = coordinator.refresh().await;

        let snapshot = coordinator.subscribe();
        let sensors = enumerate_sensors(&initial, &units, &snapshot);
        tracing::info!("Registered {} Jullix sensors", sensors.len());

        let cancel = CancellationToken::new();
        let refresh_task = tokio::spawn(coordinator.run(cancel.clone()));

        Ok(Self {
            sensors,
            snapshot,
            cancel,
            refresh_task: Some(refresh_task),
        })
    }

    pub fn sensors(&self) -> &[JullixSensor] {
        &self.sensors
    }

    ///Notified after every refresh cycle
    pub fn subscribe(&self) -> SnapshotSource {
        let mut rx = self.snapshot.clone();
        rx.mark_unchanged();
        rx
    }

    pub async fn unload(mut self) {
        self.cancel.cancel();

        if let Some(task) = self.refresh_task.take() {
            if let Err(e) = task.await {
                tracing::error!("Jullix refresh task failed: {:?}", e);
            }
        }

        self.sensors.clear();
        tracing::info!("Jullix adapter unloaded");
    }
}

impl Drop for JullixAdapter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use mockito::Server;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn setup_registers_sensors_and_unload_stops_refresh() {
        let mut server = Server::new_async().await;
        let _meter = server
            .mock("GET", "/api/ems/meter")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "m1", "power": 10, "time": 250518214500}"#)
            .create_async()
            .await;
        let _plug = server
            .mock("GET", "/api/ems/plug")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "p1", "device": "Boiler", "power": 2000}]"#)
            .create_async()
            .await;

        let config = JullixConfig {
            host: server.url(),
            sensor_config: "does/not/exist.json".into(),
            ..JullixConfig::default()
        };

        let adapter = JullixAdapter::setup(&config).await.unwrap();

        let ids: Vec<&str> = adapter.sensors().iter().map(|s| s.unique_id()).collect();
        assert_eq!(
            ids,
            vec![
                "jullix_meter_m1_id",
                "jullix_meter_m1_power",
                "jullix_meter_m1_time",
                "jullix_plug_p1_device",
                "jullix_plug_p1_id",
                "jullix_plug_p1_power",
            ]
        );

        let time = adapter.sensors().iter().find(|s| s.key() == "time").unwrap();
        assert_eq!(time.value().unwrap().to_string(), "2025-05-18T21:45:00+00:00");
        assert_eq!(adapter.sensors()[4].device_info().name, "Boiler");

        tokio::time::timeout(Duration::from_secs(5), adapter.unload())
            .await
            .expect("unload did not complete");
    }

    #[tokio::test]
    async fn unload_cancels_refresh_in_flight() {
        let mut server = Server::new_async().await;
        let meter = server
            .mock("GET", "/api/ems/meter")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "m1", "power": 10}"#)
            .create_async()
            .await;

        let config = JullixConfig {
            host: server.url(),
            scan_interval_secs: 1,
            timeout_secs: 60,
            sensor_config: "does/not/exist.json".into(),
            ..JullixConfig::default()
        };

        let adapter = JullixAdapter::setup(&config).await.unwrap();
        assert_eq!(adapter.sensors().len(), 2);

        //next cycle hangs on the meter response
        meter.remove_async().await;
        let requested = Arc::new(Notify::new());
        let requested_in_body = requested.clone();
        let _slow_meter = server
            .mock("GET", "/api/ems/meter")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(move |w| {
                requested_in_body.notify_one();
                std::thread::sleep(Duration::from_secs(30));
                w.write_all(br#"{"id": "m1", "power": 20}"#)
            })
            .create_async()
            .await;

        tokio::time::timeout(Duration::from_secs(10), requested.notified())
            .await
            .expect("refresh cycle did not start");

        let started = std::time::Instant::now();
        tokio::time::timeout(Duration::from_secs(5), adapter.unload())
            .await
            .expect("unload waited for the pending request");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn setup_succeeds_when_device_is_unreachable() {
        let config = JullixConfig {
            host: "http://127.0.0.1:9".to_owned(),
            sensor_config: "does/not/exist.json".into(),
            ..JullixConfig::default()
        };

        let adapter = JullixAdapter::setup(&config).await.unwrap();

        assert!(adapter.sensors().is_empty());
        adapter.unload().await;
    }
}
