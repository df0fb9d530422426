use std::mem::take;
use std::sync::{
    Arc,
    Mutex,
};

use kl_core::k8s::TypedScheme;
use kl_core::prelude::*;
use tokio::sync::watch;

use super::*;

// Stands in for the UI thread's idle queue: callbacks pile up until the "frame" runs
#[derive(Default)]
struct QueueDispatch {
    queue: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
}

impl Dispatch for QueueDispatch {
    fn post(&self, f: Box<dyn FnOnce() + Send>) {
        self.queue.lock().unwrap().push(f);
    }
}

impl QueueDispatch {
    fn queued(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    fn drain(&self) {
        for f in take(&mut *self.queue.lock().unwrap()) {
            f();
        }
    }
}

fn snapshot_of(count: usize) -> Snapshot {
    let scheme = TypedScheme::with_defaults();
    Arc::new(
        (0..count)
            .map(|i| KubeObject::from_dynamic(test_pod(&format!("pod-{i}")), &scheme).unwrap())
            .collect(),
    )
}

#[rstest]
#[tokio::test]
async fn test_subscribe_marshals_through_dispatch() {
    let (tx, rx) = watch::channel(Snapshot::default());
    let dispatch = Arc::new(QueueDispatch::default());
    let received = Arc::new(Mutex::new(vec![]));

    let received_ = received.clone();
    let _sub = subscribe(rx, dispatch.clone(), move |snap| received_.lock().unwrap().push(snap.len()));

    tx.send(snapshot_of(2)).unwrap();
    eventually(|| dispatch.queued() == 1).await;

    // nothing reaches the callback until the UI thread gets around to it
    assert!(received.lock().unwrap().is_empty());
    dispatch.drain();
    assert_eq!(*received.lock().unwrap(), vec![2]);
}

#[rstest]
#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let (tx, rx) = watch::channel(Snapshot::default());
    let dispatch = Arc::new(QueueDispatch::default());
    let received = Arc::new(Mutex::new(vec![]));

    let received_ = received.clone();
    let sub = subscribe(rx, dispatch.clone(), move |snap| received_.lock().unwrap().push(snap.len()));

    tx.send(snapshot_of(1)).unwrap();
    eventually(|| dispatch.queued() == 1).await;
    dispatch.drain();

    sub.unsubscribe();
    tx.send(snapshot_of(3)).unwrap();
    tokio::task::yield_now().await;

    dispatch.drain();
    assert_eq!(*received.lock().unwrap(), vec![1]);
}

#[rstest]
#[tokio::test]
async fn test_inline_dispatch_runs_immediately() {
    let (tx, rx) = watch::channel(Snapshot::default());
    let received = Arc::new(Mutex::new(vec![]));

    let received_ = received.clone();
    let _sub = subscribe(rx, Arc::new(InlineDispatch), move |snap| received_.lock().unwrap().push(snap.len()));

    tx.send(snapshot_of(1)).unwrap();
    eventually(|| received.lock().unwrap().len() == 1).await;
    assert_eq!(*received.lock().unwrap(), vec![1]);
}
