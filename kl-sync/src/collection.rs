use std::sync::Arc;

use kl_core::k8s::GVK;
use kl_core::prelude::*;
use tracing::*;

pub type Snapshot = Arc<Vec<KubeObject>>;

// The in-memory image of one resource kind.  Insertion-ordered (stable row identity for
// the list view) and keyed by UID, which is stable across updates and immune to
// name-reuse races.  There is exactly one writer: the synchronizer that owns it.
pub struct ObjectCollection {
    expected: GVK,
    objs: Vec<KubeObject>,
}

impl ObjectCollection {
    pub fn new(expected: GVK) -> ObjectCollection {
        ObjectCollection { expected, objs: vec![] }
    }

    pub fn expected_gvk(&self) -> &GVK {
        &self.expected
    }

    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    pub fn get(&self, uid: &str) -> Option<&KubeObject> {
        self.position(uid).map(|i| &self.objs[i])
    }

    // Add-or-update: a duplicate add replaces in place rather than appending, so the
    // same event applied twice leaves one entry, and an update never moves its row.
    pub fn apply(&mut self, obj: KubeObject) -> bool {
        let Some(uid) = self.bind_check(&obj) else {
            return false;
        };
        match self.position(&uid) {
            Some(i) => self.objs[i] = obj,
            None => self.objs.push(obj),
        }
        true
    }

    pub fn delete(&mut self, obj: &KubeObject) -> bool {
        match obj.uid() {
            Some(uid) => self.delete_by_uid(&uid),
            None => false,
        }
    }

    // Deleting something already absent is a no-op (watches can replay deletes)
    pub fn delete_by_uid(&mut self, uid: &str) -> bool {
        match self.position(uid) {
            Some(i) => {
                self.objs.remove(i);
                true
            },
            None => false,
        }
    }

    // Wholesale replacement, used by the poll loop and by watch re-list events
    pub fn replace_all(&mut self, objs: impl IntoIterator<Item = KubeObject>) {
        self.objs.clear();
        for obj in objs {
            self.apply(obj);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::new(self.objs.clone())
    }

    // Defensive type check on every bind: a collection must never contain objects of a
    // kind other than the one its synchronizer was started for.
    fn bind_check(&self, obj: &KubeObject) -> Option<String> {
        if obj.gvk() != &self.expected {
            warn!(
                "dropping {} of kind {}: collection holds {}",
                obj.namespaced_name(),
                obj.gvk(),
                self.expected
            );
            return None;
        }
        match obj.uid() {
            Some(uid) => Some(uid),
            None => {
                warn!("dropping {}: no uid assigned", obj.namespaced_name());
                None
            },
        }
    }

    fn position(&self, uid: &str) -> Option<usize> {
        self.objs.iter().position(|o| o.uid().as_deref() == Some(uid))
    }
}
