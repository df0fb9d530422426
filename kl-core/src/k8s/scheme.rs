use std::any::Any;
use std::sync::Arc;

use kube::api::DynamicObject;
use serde::de::DeserializeOwned;
use tracing::*;

use crate::k8s::GVK;
use crate::prelude::*;

type DecodeFn = fn(&DynamicObject) -> anyhow::Result<Arc<dyn Any + Send + Sync>>;

struct SchemeEntry {
    gvk: GVK,
    decode: DecodeFn,
}

// The set of kinds this process knows statically, with a decoder from the dynamic
// (JSON) form into the corresponding k8s-openapi type.  Lookup is a linear scan: the
// registered set is a couple dozen entries and decoding is not on a hot path.
pub struct TypedScheme {
    entries: Vec<SchemeEntry>,
}

impl TypedScheme {
    pub fn new() -> TypedScheme {
        TypedScheme { entries: vec![] }
    }

    pub fn with_defaults() -> TypedScheme {
        use k8s_openapi::api::batch::v1 as batchv1;
        use k8s_openapi::api::events::v1 as eventsv1;
        use k8s_openapi::api::networking::v1 as networkingv1;
        use k8s_openapi::api::rbac::v1 as rbacv1;
        use k8s_openapi::api::storage::v1 as storagev1;

        let mut scheme = TypedScheme::new();

        scheme.register::<corev1::ConfigMap>();
        scheme.register::<corev1::Endpoints>();
        scheme.register::<corev1::Event>();
        scheme.register::<corev1::Namespace>();
        scheme.register::<corev1::Node>();
        scheme.register::<corev1::PersistentVolume>();
        scheme.register::<corev1::PersistentVolumeClaim>();
        scheme.register::<corev1::Pod>();
        scheme.register::<corev1::Secret>();
        scheme.register::<corev1::Service>();
        scheme.register::<corev1::ServiceAccount>();

        scheme.register::<appsv1::DaemonSet>();
        scheme.register::<appsv1::Deployment>();
        scheme.register::<appsv1::ReplicaSet>();
        scheme.register::<appsv1::StatefulSet>();

        scheme.register::<batchv1::CronJob>();
        scheme.register::<batchv1::Job>();

        scheme.register::<rbacv1::ClusterRole>();
        scheme.register::<rbacv1::ClusterRoleBinding>();
        scheme.register::<rbacv1::Role>();
        scheme.register::<rbacv1::RoleBinding>();

        scheme.register::<storagev1::StorageClass>();

        scheme.register::<networkingv1::Ingress>();
        scheme.register::<networkingv1::NetworkPolicy>();

        scheme.register::<eventsv1::Event>();

        scheme
    }

    pub fn register<K>(&mut self)
    where
        K: kube::Resource<DynamicType = ()> + DeserializeOwned + Send + Sync + 'static,
    {
        let gvk = GVK::new(&K::group(&()), &K::version(&()), &K::kind(&()));
        self.entries.push(SchemeEntry { gvk, decode: decode_as::<K> });
    }

    pub fn contains(&self, gvk: &GVK) -> bool {
        self.lookup(gvk).is_some()
    }

    // Decode failures are swallowed (debug-logged) on purpose: the object remains fully
    // usable through the dynamic interface, and a malformed CRD instance shouldn't take
    // the whole list view down with it.
    pub fn decode(&self, gvk: &GVK, obj: &DynamicObject) -> Option<Arc<dyn Any + Send + Sync>> {
        let entry = self.lookup(gvk)?;
        match (entry.decode)(obj) {
            Ok(typed) => Some(typed),
            Err(err) => {
                debug!("could not decode {} {} into a typed object: {err}", gvk, obj.name_any());
                None
            },
        }
    }

    fn lookup(&self, gvk: &GVK) -> Option<&SchemeEntry> {
        self.entries.iter().find(|e| &e.gvk == gvk)
    }
}

fn decode_as<K>(obj: &DynamicObject) -> anyhow::Result<Arc<dyn Any + Send + Sync>>
where
    K: kube::Resource<DynamicType = ()> + DeserializeOwned + Send + Sync + 'static,
{
    let typed: K = obj.clone().try_parse()?;
    Ok(Arc::new(typed))
}
