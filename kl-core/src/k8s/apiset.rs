use std::collections::HashMap;
use std::collections::hash_map::Entry;

use kube::api::{
    Api,
    DynamicObject,
};
use kube::discovery::{
    ApiResource,
    Scope,
};

use crate::k8s::GVK;

// Maps GVKs to the discovery metadata needed to build dynamic API clients, so that
// repeated reference resolution doesn't hit the apiserver's discovery endpoints every
// time.  The cache is seeded from the resource list discovered at connect time; kinds
// outside that list (e.g. an owner reference pointing at a CRD) fall back to a
// pinned-kind discovery query.
pub struct DynamicApiSet {
    client: kube::Client,
    resources: HashMap<GVK, (ApiResource, bool)>,
}

impl DynamicApiSet {
    pub fn new(client: kube::Client) -> DynamicApiSet {
        DynamicApiSet { client, resources: HashMap::new() }
    }

    pub fn seed(&mut self, gvk: GVK, res: ApiResource, namespaced: bool) {
        self.resources.insert(gvk, (res, namespaced));
    }

    // Cluster-scoped kinds and callers without a namespace get the all-namespaces API.
    pub async fn api_for(&mut self, gvk: &GVK, namespace: Option<&str>) -> anyhow::Result<Api<DynamicObject>> {
        let (res, namespaced) = self.meta_for(gvk).await?;
        Ok(match namespace {
            Some(ns) if namespaced => Api::namespaced_with(self.client.clone(), ns, &res),
            _ => Api::all_with(self.client.clone(), &res),
        })
    }

    async fn meta_for(&mut self, gvk: &GVK) -> anyhow::Result<(ApiResource, bool)> {
        match self.resources.entry(gvk.clone()) {
            Entry::Occupied(e) => Ok(e.get().clone()),
            Entry::Vacant(e) => {
                let (res, caps) = kube::discovery::pinned_kind(&self.client, e.key()).await?;
                Ok(e.insert((res, caps.scope == Scope::Namespaced)).clone())
            },
        }
    }
}
