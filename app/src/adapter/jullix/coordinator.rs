use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::client::JullixHttpClient;
use super::sensor::SnapshotSource;
use super::{Category, Payload, Snapshot};

///Polls all categories on a fixed cadence and publishes each result as a new snapshot
pub struct RefreshCoordinator {
    client: JullixHttpClient,
    interval: Duration,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
}

impl RefreshCoordinator {
    pub fn new(client: JullixHttpClient, interval: Duration) -> Self {
        Self {
            client,
            interval,
            snapshot_tx: watch::channel(Arc::new(Snapshot::empty())).0,
        }
    }

    pub fn subscribe(&self) -> SnapshotSource {
        self.snapshot_tx.subscribe()
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.snapshot_tx.borrow().clone()
    }

    ///Fetches every category once and replaces the published snapshot
    pub async fn refresh(&self) -> Arc<Snapshot> {
        let snapshot = Arc::new(fetch_snapshot(&self.client).await);

        tracing::debug!(
            "Refreshed snapshot, available categories: {:?}",
            snapshot.categories().collect::<Vec<_>>()
        );

        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    ///Refreshes until cancelled. The first refresh is expected to have happened already, so the
    ///first cycle starts one interval from now.
    pub async fn run(self, cancel: CancellationToken) {
        let mut timer = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {},
            }

            //an in-flight refresh is dropped on cancellation
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.refresh() => {},
            }
        }

        tracing::info!("Jullix refresh stopped");
    }
}

async fn fetch_snapshot(client: &JullixHttpClient) -> Snapshot {
    let results = join_all(Category::ALL.into_iter().map(|category| async move {
        let payload = client
            .fetch(category)
            .await
            .and_then(|value| Payload::from_json(category, value));
        (category, payload)
    }))
    .await;

    results.into_iter().collect()
}
