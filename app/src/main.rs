use jullix::adapter::jullix::{JullixAdapter, JullixSensor, SnapshotSource};
use jullix::settings::Settings;

#[tokio::main(flavor = "current_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    let adapter = JullixAdapter::setup(&settings.jullix)
        .await
        .expect("Error setting up Jullix adapter");

    for sensor in adapter.sensors() {
        tracing::info!(
            unique_id = sensor.unique_id(),
            unit = sensor.unit(),
            icon = sensor.icon(),
            device = ?sensor.device_info(),
            "Sensor {}",
            sensor.name()
        );
    }

    let reporter = report_states(adapter.subscribe(), adapter.sensors().to_vec());

    tracing::info!("Starting main loop");

    tokio::select!(
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        },
        _ = reporter => {},
    );

    adapter.unload().await;
}

async fn report_states(mut snapshot_rx: SnapshotSource, sensors: Vec<JullixSensor>) {
    while snapshot_rx.changed().await.is_ok() {
        let created = snapshot_rx.borrow_and_update().created();
        tracing::info!("Snapshot of {} received", created);

        for sensor in &sensors {
            match serde_json::to_string(&sensor.state()) {
                Ok(state) => tracing::debug!("{}", state),
                Err(e) => tracing::error!("Error serializing state of {}: {}", sensor.unique_id(), e),
            }
        }
    }

    tracing::warn!("Snapshot channel closed");
}
