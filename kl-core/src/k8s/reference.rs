use std::fmt;
use std::sync::OnceLock;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use tracing::*;

use crate::cluster::ClusterHandle;
use crate::k8s::{
    GVK,
    KubeObject,
    conform_type_meta,
};
use crate::prelude::*;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no type registered in the scheme for {0}")]
    UnknownKind(GVK),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("lookup failed: {0}")]
    Lookup(#[from] kube::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// A serialized pointer to one object: gvk + namespace + name.  Built either from a live
// object (owner references, event "regarding" fields) or deserialized from persisted
// pin/favourite data.  Resolution is lazy and cached on the reference itself, so
// re-rendering a detail view doesn't re-fetch.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ObjectRef {
    pub gvk: GVK,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,

    #[serde(skip)]
    resolved: OnceLock<KubeObject>,
}

impl ObjectRef {
    pub fn new(gvk: GVK, namespace: Option<&str>, name: &str) -> ObjectRef {
        ObjectRef {
            gvk,
            namespace: namespace.map(String::from),
            name: name.into(),
            resolved: OnceLock::new(),
        }
    }

    // Owner references never cross namespaces, so the child's namespace applies.
    pub fn from_owner_ref(namespace: Option<&str>, rf: &metav1::OwnerReference) -> anyhow::Result<ObjectRef> {
        Ok(ObjectRef::new(GVK::from_owner_ref(rf)?, namespace, &rf.name))
    }

    pub fn owners_of(obj: &KubeObject) -> Vec<ObjectRef> {
        let ns = obj.namespace();
        obj.owner_references()
            .iter()
            .filter_map(|rf| match ObjectRef::from_owner_ref(ns.as_deref(), rf) {
                Ok(r) => Some(r),
                Err(err) => {
                    warn!("skipping malformed owner reference on {}: {err}", obj.namespaced_name());
                    None
                },
            })
            .collect()
    }

    pub async fn resolve(&self, cluster: &ClusterHandle) -> Result<KubeObject, ResolveError> {
        if let Some(obj) = self.resolved.get() {
            return Ok(obj.clone());
        }

        let obj = self.fetch(cluster).await?;
        Ok(self.resolved.get_or_init(|| obj).clone())
    }

    async fn fetch(&self, cluster: &ClusterHandle) -> Result<KubeObject, ResolveError> {
        // Mirrors the original scheme lookup: a kind nobody registered is an error, not
        // a silent dynamic fallback.
        let scheme = cluster.scheme();
        if !scheme.contains(&self.gvk) {
            return Err(ResolveError::UnknownKind(self.gvk.clone()));
        }

        let api = {
            let mut apis = cluster.apis().lock().await;
            apis.api_for(&self.gvk, self.namespace.as_deref()).await?
        };

        match api.get(&self.name).await {
            Ok(mut obj) => {
                conform_type_meta(&mut obj, &self.gvk)?;
                Ok(KubeObject::from_dynamic(obj, &scheme)?)
            },
            Err(kube::Error::Api(resp)) if resp.code == 404 => Err(ResolveError::NotFound(self.to_string())),
            Err(err) => Err(ResolveError::Lookup(err)),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ", self.gvk)?;
        match &self.namespace {
            Some(ns) => write!(f, "{ns}/{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// The resolution cache is deliberately ignored for equality
impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.gvk == other.gvk && self.namespace == other.namespace && self.name == other.name
    }
}

impl Eq for ObjectRef {}
