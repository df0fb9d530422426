use std::sync::Arc;

use kl_core::cluster::{
    ClusterHandle,
    ResourceDescriptor,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::*;

use crate::config::SyncSettings;
use crate::synchronizer::{
    ResourceSynchronizer,
    SnapshotReceiver,
};

// Owns the synchronizer behind one UI slot (the resource list view, say).  Selecting a
// different kind stops the old worker before the new one spawns, so a slot never has two
// writers racing; closing the slot tears the worker down the same way.
pub struct SyncSession {
    cluster: Arc<ClusterHandle>,
    settings: SyncSettings,
    active: Option<ActiveSync>,
}

struct ActiveSync {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncSession {
    pub fn new(cluster: Arc<ClusterHandle>, settings: SyncSettings) -> SyncSession {
        SyncSession { cluster, settings, active: None }
    }

    pub async fn select(&mut self, descriptor: &ResourceDescriptor, namespace: Option<&str>) -> SnapshotReceiver {
        self.stop().await;
        info!("starting synchronizer for {}", descriptor.gvk);

        let (sync, snapshot_rx) =
            ResourceSynchronizer::new(&self.cluster, descriptor, namespace, self.settings.clone());
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(sync.run(stop_rx));

        self.active = Some(ActiveSync { stop_tx, task });
        snapshot_rx
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    // Waits for the old worker to wind down so no stale writer overlaps a new one
    pub async fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.stop_tx.send(true);
            let _ = active.task.await;
        }
    }
}
