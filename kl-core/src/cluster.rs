use std::sync::Arc;

use kube::api::{
    Api,
    DynamicObject,
    ListParams,
};
use kube::discovery::{
    ApiResource,
    verbs,
};
use tokio::sync::Mutex;
use tracing::*;

use crate::k8s::{
    DynamicApiSet,
    GVK,
    TypedScheme,
};
use crate::prelude::*;

pub const METRICS_API_GROUP: &str = "metrics.k8s.io";

// One discovered resource type: everything the synchronizer needs to decide how to talk
// to it (endpoint name, scope, supported verbs).  Immutable after discovery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceDescriptor {
    pub gvk: GVK,
    pub plural: String,
    pub namespaced: bool,
    pub verbs: Vec<String>,
}

impl ResourceDescriptor {
    fn from_api_resource(res: &metav1::APIResource, group_version: &str) -> ResourceDescriptor {
        // Most entries inherit group/version from the surrounding list; the odd ones
        // (like the autoscaling Scale subresources) carry their own.
        let (default_group, default_version) = match group_version.split_once('/') {
            Some((g, v)) => (g, v),
            None => ("", group_version),
        };
        let group = res.group.as_deref().unwrap_or(default_group);
        let version = res.version.as_deref().unwrap_or(default_version);

        ResourceDescriptor {
            gvk: GVK::new(group, version, &res.kind),
            plural: res.name.clone(),
            namespaced: res.namespaced,
            verbs: res.verbs.clone(),
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.gvk.group.clone(),
            version: self.gvk.version.clone(),
            api_version: self.gvk.api_version(),
            kind: self.gvk.kind.clone(),
            plural: self.plural.clone(),
        }
    }

    pub fn supports(&self, verb: &str) -> bool {
        self.verbs.iter().any(|v| v == verb)
    }

    pub fn supports_watch(&self) -> bool {
        self.supports(verbs::WATCH)
    }

    // Resources we can neither list nor get are useless to a browser
    fn usable(&self) -> bool {
        self.supports(verbs::LIST) && self.supports(verbs::GET)
    }

    fn is_subresource(&self) -> bool {
        self.plural.contains('/')
    }
}

// Everything owned per cluster connection: the client, the typed scheme, the discovered
// resource list, and the (optional) metrics sub-client.  Read-only after construction,
// so it's safe to share across however many synchronizers the UI has running; the only
// interior state is the api set's discovery cache.
pub struct ClusterHandle {
    client: kube::Client,
    scheme: Arc<TypedScheme>,
    resources: Vec<ResourceDescriptor>,
    metrics: Option<MetricsClient>,
    apis: Mutex<DynamicApiSet>,
}

impl ClusterHandle {
    pub async fn connect() -> anyhow::Result<ClusterHandle> {
        let client = kube::Client::try_default().await?;
        ClusterHandle::with_client(client).await
    }

    pub async fn with_client(client: kube::Client) -> anyhow::Result<ClusterHandle> {
        let resources = discover_resources(&client).await?;
        info!("discovered {} usable resource types", resources.len());

        let metrics = MetricsClient::probe(&client, &resources);
        if metrics.is_none() {
            info!("cluster does not serve {METRICS_API_GROUP}; metrics disabled");
        }

        let mut apis = DynamicApiSet::new(client.clone());
        for d in &resources {
            apis.seed(d.gvk.clone(), d.api_resource(), d.namespaced);
        }

        Ok(ClusterHandle {
            client,
            scheme: Arc::new(TypedScheme::with_defaults()),
            resources,
            metrics,
            apis: Mutex::new(apis),
        })
    }

    pub fn client(&self) -> kube::Client {
        self.client.clone()
    }

    pub fn scheme(&self) -> Arc<TypedScheme> {
        self.scheme.clone()
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn find_resource(&self, gvk: &GVK) -> Option<&ResourceDescriptor> {
        self.resources.iter().find(|d| &d.gvk == gvk)
    }

    pub fn metrics(&self) -> Option<&MetricsClient> {
        self.metrics.as_ref()
    }

    pub fn apis(&self) -> &Mutex<DynamicApiSet> {
        &self.apis
    }

    pub fn dynamic_api(&self, descriptor: &ResourceDescriptor, namespace: Option<&str>) -> Api<DynamicObject> {
        let res = descriptor.api_resource();
        match namespace {
            Some(ns) if descriptor.namespaced => Api::namespaced_with(self.client.clone(), ns, &res),
            _ => Api::all_with(self.client.clone(), &res),
        }
    }
}

// Walk the core group plus every named API group, keeping resources that support both
// "list" and "get".  A group that fails to enumerate is logged and skipped; only failing
// to reach the apiserver at all is fatal.
async fn discover_resources(client: &kube::Client) -> anyhow::Result<Vec<ResourceDescriptor>> {
    let mut resources = vec![];

    let core_versions = client.list_core_api_versions().await?;
    for version in &core_versions.versions {
        match client.list_core_api_resources(version).await {
            Ok(list) => collect_resources(&mut resources, &list),
            Err(err) => warn!("could not enumerate core API group {version}, skipping: {err}"),
        }
    }

    for group in client.list_api_groups().await?.groups {
        let Some(gv) = group.preferred_version.as_ref().or(group.versions.first()) else {
            continue;
        };
        match client.list_api_group_resources(&gv.group_version).await {
            Ok(list) => collect_resources(&mut resources, &list),
            Err(err) => warn!("could not enumerate API group {}, skipping: {err}", gv.group_version),
        }
    }

    // Full sort by kind; the original tool only compared the first character, which
    // grouped rather than ordered.
    resources.sort_by(|a, b| {
        (a.gvk.kind.to_lowercase(), &a.gvk.group).cmp(&(b.gvk.kind.to_lowercase(), &b.gvk.group))
    });
    Ok(resources)
}

fn collect_resources(resources: &mut Vec<ResourceDescriptor>, list: &metav1::APIResourceList) {
    for res in &list.resources {
        let d = ResourceDescriptor::from_api_resource(res, &list.group_version);
        if !d.is_subresource() && d.usable() {
            resources.push(d);
        }
    }
}

// Thin wrapper over the metrics.k8s.io dynamic APIs.  Constructed only if discovery saw
// the metrics group; everything metrics-related in the UI keys off its absence.
pub struct MetricsClient {
    pod_metrics: Api<DynamicObject>,
    node_metrics: Api<DynamicObject>,
}

impl MetricsClient {
    fn probe(client: &kube::Client, resources: &[ResourceDescriptor]) -> Option<MetricsClient> {
        let find = |kind: &str| {
            resources
                .iter()
                .find(|d| d.gvk.group == METRICS_API_GROUP && d.gvk.kind == kind)
                .map(|d| Api::all_with(client.clone(), &d.api_resource()))
        };
        Some(MetricsClient {
            pod_metrics: find("PodMetrics")?,
            node_metrics: find("NodeMetrics")?,
        })
    }

    pub async fn pod_metrics(&self) -> anyhow::Result<Vec<DynamicObject>> {
        Ok(self.pod_metrics.list(&ListParams::default()).await?.items)
    }

    pub async fn node_metrics(&self) -> anyhow::Result<Vec<DynamicObject>> {
        Ok(self.node_metrics.list(&ListParams::default()).await?.items)
    }
}

#[cfg(test)]
mod test {
    use assertables::*;
    use kl_testutils::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn test_with_client_discovers_and_sorts() {
        let (mut fake_apiserver, client) = make_fake_apiserver();
        fake_apiserver.handle_discovery();
        fake_apiserver.build();

        let handle = ClusterHandle::with_client(client).await.unwrap();

        let kinds: Vec<_> = handle.resources().iter().map(|d| d.gvk.kind.as_str()).collect();
        // full alphabetical sort, not just grouped-by-first-letter
        assert_eq!(
            kinds,
            vec!["ConfigMap", "DaemonSet", "Deployment", "NodeMetrics", "Pod", "PodMetrics", "Service"]
        );
        assert!(handle.metrics().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn test_with_client_skips_unlistable_resources() {
        let (mut fake_apiserver, client) = make_fake_apiserver();
        fake_apiserver.handle_discovery();
        fake_apiserver.build();

        let handle = ClusterHandle::with_client(client).await.unwrap();

        // bindings only supports "create", componentstatuses only supports "get"
        assert_none!(handle.find_resource(&GVK::new("", "v1", "Binding")));
        assert_none!(handle.find_resource(&GVK::new("", "v1", "ComponentStatus")));
        assert_none!(handle.find_resource(&GVK::new("autoscaling", "v1", "Scale")));
    }

    #[rstest]
    #[tokio::test]
    async fn test_with_client_tolerates_partial_discovery_failure() {
        let (mut fake_apiserver, client) = make_fake_apiserver();
        fake_apiserver.handle_discovery_with_broken_group();
        fake_apiserver.build();

        let handle = ClusterHandle::with_client(client).await.unwrap();

        // the apps group 500ed, but core discovery still went through
        assert_some!(handle.find_resource(&GVK::new("", "v1", "Pod")));
        assert_none!(handle.find_resource(&GVK::new("apps", "v1", "Deployment")));
        assert!(handle.metrics().is_none());
    }

    #[rstest]
    fn test_descriptor_verbs() {
        let d = ResourceDescriptor {
            gvk: GVK::new("", "v1", "ComponentStatus"),
            plural: "componentstatuses".into(),
            namespaced: false,
            verbs: vec!["get".into(), "list".into()],
        };
        assert!(d.supports("list"));
        assert!(!d.supports_watch());
    }
}
