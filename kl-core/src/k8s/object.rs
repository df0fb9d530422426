use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use derive_more::Debug;
use kube::api::DynamicObject;

use crate::k8s::{
    GVK,
    KubeResourceExt,
    TypedScheme,
};
use crate::prelude::*;

// One synchronized object.  The raw dynamic form is always present and backs the generic
// accessors (uid/name/namespace/labels); kinds registered in the scheme additionally
// carry a decoded typed form that per-kind rendering code can downcast to.
#[derive(Clone, Debug)]
pub struct KubeObject {
    gvk: GVK,
    raw: DynamicObject,
    #[debug(skip)]
    typed: Option<Arc<dyn Any + Send + Sync>>,
}

impl KubeObject {
    pub fn from_dynamic(raw: DynamicObject, scheme: &TypedScheme) -> anyhow::Result<KubeObject> {
        let gvk = GVK::from_dynamic_obj(&raw)?;
        let typed = scheme.decode(&gvk, &raw);
        Ok(KubeObject { gvk, raw, typed })
    }

    pub fn gvk(&self) -> &GVK {
        &self.gvk
    }

    pub fn raw(&self) -> &DynamicObject {
        &self.raw
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.raw.data
    }

    pub fn typed<K: Any>(&self) -> Option<&K> {
        self.typed.as_deref()?.downcast_ref()
    }

    pub fn has_typed_form(&self) -> bool {
        self.typed.is_some()
    }

    pub fn uid(&self) -> Option<String> {
        self.raw.uid()
    }

    pub fn name(&self) -> String {
        self.raw.name_any()
    }

    pub fn namespace(&self) -> Option<String> {
        self.raw.namespace()
    }

    pub fn namespaced_name(&self) -> String {
        self.raw.namespaced_name()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        self.raw.labels()
    }

    pub fn creation_timestamp(&self) -> Option<metav1::Time> {
        self.raw.creation_timestamp()
    }

    pub fn owner_references(&self) -> &[metav1::OwnerReference] {
        self.raw.owner_references()
    }
}
