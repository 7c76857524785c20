use std::collections::HashSet;

use super::flatten::flatten_sample;
use super::sensor::SnapshotSource;
use super::snapshot::{device_identity, name_base};
use super::{JullixSensor, Snapshot, UnitLookup};

///Creates one sensor per leaf of every device in the snapshot. Runs once; categories missing
///here never get sensors, even if they show up in later snapshots.
pub fn enumerate_sensors(snapshot: &Snapshot, units: &UnitLookup, source: &SnapshotSource) -> Vec<JullixSensor> {
    let mut sensors: Vec<JullixSensor> = vec![];
    let mut unique_ids = HashSet::new();

    for category in snapshot.categories() {
        let Some(payload) = snapshot.get(category) else {
            continue;
        };

        for sample in payload.samples() {
            let device_id = device_identity(sample, category);
            let name_base = name_base(sample, category);

            //all leaf types get a sensor, not only numeric ones
            for key in flatten_sample(sample).keys() {
                let sensor = JullixSensor::new(
                    category,
                    key,
                    &device_id,
                    &name_base,
                    units.unit_for(category, key),
                    source.clone(),
                );

                //devices without own identity share the category name, only the first one is kept
                if !unique_ids.insert(sensor.unique_id().to_owned()) {
                    tracing::warn!("Skipping sensor with duplicate unique id {}", sensor.unique_id());
                    continue;
                }

                sensors.push(sensor);
            }
        }

        tracing::debug!("Enumerated {} with {} device(s)", category, payload.samples().len());
    }

    sensors
}
