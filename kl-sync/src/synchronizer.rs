use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;
use kl_core::cluster::{
    ClusterHandle,
    ResourceDescriptor,
};
use kl_core::k8s::{
    TypedScheme,
    conform_type_meta,
};
use kl_core::prelude::*;
use kube::api::{
    DynamicObject,
    ListParams,
};
use kube::runtime::watcher::{
    self,
    watcher,
};
use tokio::sync::watch;
use tokio::time;
use tracing::*;

use crate::collection::{
    ObjectCollection,
    Snapshot,
};
use crate::config::SyncSettings;
use crate::debounce::{
    Debounce,
    sleep_until_deadline,
};

pub type SnapshotReceiver = watch::Receiver<Snapshot>;
pub(crate) type ObjEventStream = BoxStream<'static, anyhow::Result<watcher::Event<DynamicObject>>>;
pub(crate) type StopReceiver = watch::Receiver<bool>;

// Keeps one collection eventually consistent with the live cluster resource set, using
// the cheapest mechanism the resource supports: a watch stream when the descriptor
// allows it, otherwise a periodic full relist.  Mutations land in the owned collection
// immediately; snapshots go out to subscribers through the debounce.
//
// There is deliberately no retry on the watch path: when the stream dies we log and
// return, and the owning session starts a fresh synchronizer the next time the user
// selects the resource.  The poll path just skips the failed tick.
pub struct ResourceSynchronizer {
    descriptor: ResourceDescriptor,
    api: kube::Api<DynamicObject>,
    scheme: Arc<TypedScheme>,
    settings: SyncSettings,
    collection: ObjectCollection,
    snapshot_tx: watch::Sender<Snapshot>,
    debounce: Debounce,
}

impl ResourceSynchronizer {
    pub fn new(
        cluster: &ClusterHandle,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
        settings: SyncSettings,
    ) -> (ResourceSynchronizer, SnapshotReceiver) {
        let api = cluster.dynamic_api(descriptor, namespace);
        ResourceSynchronizer::new_from_parts(api, cluster.scheme(), descriptor.clone(), settings)
    }

    pub(crate) fn new_from_parts(
        api: kube::Api<DynamicObject>,
        scheme: Arc<TypedScheme>,
        descriptor: ResourceDescriptor,
        settings: SyncSettings,
    ) -> (ResourceSynchronizer, SnapshotReceiver) {
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
        let debounce = Debounce::new(settings.debounce_quiet(), settings.debounce_max_wait());
        let collection = ObjectCollection::new(descriptor.gvk.clone());

        let sync = ResourceSynchronizer {
            descriptor,
            api,
            scheme,
            settings,
            collection,
            snapshot_tx,
            debounce,
        };
        (sync, snapshot_rx)
    }

    pub async fn run(self, stop_rx: StopReceiver) {
        if self.descriptor.supports_watch() {
            let stream = watcher(self.api.clone(), watcher::Config::default())
                .map(|res| res.map_err(anyhow::Error::from))
                .boxed();
            self.run_watch(stream, stop_rx).await;
        } else {
            self.run_poll(stop_rx).await;
        }
    }

    pub(crate) async fn run_watch(mut self, mut stream: ObjEventStream, mut stop_rx: StopReceiver) {
        debug!("watching {}", self.descriptor.gvk);

        // buffers the objects of an in-progress (re-)list
        let mut relist = vec![];
        loop {
            tokio::select! {
                _ = stop_rx.changed() => return,  // cancelled: nothing further, not even a flush
                _ = sleep_until_deadline(self.debounce.deadline()) => self.publish(),
                maybe_event = stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event, &mut relist),
                    Some(Err(err)) => {
                        error!("watch stream for {} failed: {err}", self.descriptor.gvk);
                        break;
                    },
                    None => break,
                },
            }
        }

        // the stream is gone; push out whatever already landed before we go
        if self.debounce.pending() {
            self.publish();
        }
    }

    async fn run_poll(mut self, mut stop_rx: StopReceiver) {
        debug!("polling {} every {:?}", self.descriptor.gvk, self.settings.poll_interval());

        loop {
            match self.api.list(&ListParams::default()).await {
                Ok(list) => {
                    let objs: Vec<_> = list.items.into_iter().filter_map(|o| self.ingest(o)).collect();
                    self.collection.replace_all(objs);
                    self.publish();
                },
                Err(err) => {
                    warn!("list failed for {}, retrying next interval: {err}", self.descriptor.gvk);
                },
            }

            tokio::select! {
                _ = stop_rx.changed() => return,
                _ = time::sleep(self.settings.poll_interval()) => {},
            }
        }
    }

    fn handle_event(&mut self, event: watcher::Event<DynamicObject>, relist: &mut Vec<KubeObject>) {
        match event {
            watcher::Event::Apply(obj) => {
                if let Some(obj) = self.ingest(obj)
                    && self.collection.apply(obj)
                {
                    self.debounce.touch();
                }
            },
            watcher::Event::Delete(obj) => {
                if let Some(obj) = self.ingest(obj)
                    && self.collection.delete(&obj)
                {
                    self.debounce.touch();
                }
            },
            watcher::Event::Init => relist.clear(),
            watcher::Event::InitApply(obj) => {
                if let Some(obj) = self.ingest(obj) {
                    relist.push(obj);
                }
            },
            watcher::Event::InitDone => {
                self.collection.replace_all(relist.drain(..));
                self.debounce.touch();
            },
        }
    }

    // Stamp the expected TypeMeta (list/watch items don't reliably carry one) and attach
    // the typed form if the scheme knows this kind; a conversion failure just means the
    // object stays dynamic-only.
    fn ingest(&self, mut obj: DynamicObject) -> Option<KubeObject> {
        if let Err(err) = conform_type_meta(&mut obj, &self.descriptor.gvk) {
            warn!("dropping object from {} stream: {err}", self.descriptor.gvk);
            return None;
        }
        match KubeObject::from_dynamic(obj, &self.scheme) {
            Ok(obj) => Some(obj),
            Err(err) => {
                warn!("dropping unusable object from {} stream: {err}", self.descriptor.gvk);
                None
            },
        }
    }

    fn publish(&mut self) {
        self.debounce.reset();
        let snapshot = self.collection.snapshot();
        debug!("publishing {} {} objects", snapshot.len(), self.descriptor.gvk);

        // subscribers may all be gone; that's fine, we keep the collection warm
        let _ = self.snapshot_tx.send(snapshot);
    }
}
