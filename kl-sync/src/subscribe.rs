use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::collection::Snapshot;
use crate::synchronizer::SnapshotReceiver;

// GUI toolkits forbid cross-thread widget mutation, so snapshots are handed to the
// toolkit through this "post to the main thread" seam (a glib idle_add wrapper, in
// practice) instead of being invoked from the synchronizer's task directly.
pub trait Dispatch: Send + Sync {
    fn post(&self, f: Box<dyn FnOnce() + Send>);
}

// Runs callbacks inline on the publishing task; for headless consumers and tests
pub struct InlineDispatch;

impl Dispatch for InlineDispatch {
    fn post(&self, f: Box<dyn FnOnce() + Send>) {
        f()
    }
}

pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// Bridges a synchronizer's snapshot channel to a callback.  Delivery is debounced
// upstream; this only marshals.  Dropping (or unsubscribing) the returned handle stops
// delivery.
pub fn subscribe<F>(mut rx: SnapshotReceiver, dispatch: Arc<dyn Dispatch>, callback: F) -> Subscription
where
    F: Fn(Snapshot) + Send + Sync + 'static,
{
    let task = tokio::spawn(async move {
        let callback = Arc::new(callback);
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let cb = callback.clone();
            dispatch.post(Box::new(move || cb(snapshot)));
        }
    });
    Subscription { task }
}
