use kl_core::cluster::ResourceDescriptor;
use kube::api::DynamicObject;
use kube::discovery::ApiResource;
use rstest::fixture;
use serde_json::json;

use crate::constants::*;

// Every fixture object carries a uid, since that's what collections key on
fn with_uid(mut obj: DynamicObject) -> DynamicObject {
    obj.metadata.uid = Some(format!("uid-{}", obj.metadata.name.clone().unwrap()));
    obj
}

#[fixture]
pub fn test_pod(#[default(TEST_POD)] name: &str) -> DynamicObject {
    with_uid(
        DynamicObject::new(name, &ApiResource::from_gvk(&POD_GVK))
            .within(TEST_NAMESPACE)
            .data(json!({
                "spec": {"nodeName": "node-1", "containers": [{"name": "main", "image": "nginx:1.27"}]},
                "status": {"phase": "Pending"},
            })),
    )
}

#[fixture]
pub fn test_deployment(#[default(TEST_DEPLOYMENT)] name: &str) -> DynamicObject {
    with_uid(
        DynamicObject::new(name, &ApiResource::from_gvk(&DEPL_GVK))
            .within(TEST_NAMESPACE)
            .data(json!({
                "spec": {"replicas": 3},
                "status": {"replicas": 3, "readyReplicas": 2},
            })),
    )
}

#[fixture]
pub fn test_service(#[default(TEST_SERVICE)] name: &str) -> DynamicObject {
    with_uid(
        DynamicObject::new(name, &ApiResource::from_gvk(&SVC_GVK))
            .within(TEST_NAMESPACE)
            .data(json!({
                "spec": {
                    "type": "ClusterIP",
                    "clusterIP": "10.96.0.42",
                    "ports": [{"port": 443, "protocol": "TCP"}],
                },
            })),
    )
}

// An object of a kind no scheme registers, for exercising the dynamic-only paths
#[fixture]
pub fn test_gadget(#[default("the-gadget")] name: &str) -> DynamicObject {
    with_uid(
        DynamicObject::new(name, &ApiResource::from_gvk(&GADGET_GVK))
            .within(TEST_NAMESPACE)
            .data(json!({"spec": {"sprockets": 7}})),
    )
}

pub fn set_phase(obj: &mut DynamicObject, phase: &str) {
    obj.data["status"]["phase"] = json!(phase);
}

#[fixture]
pub fn pod_descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        gvk: POD_GVK.clone(),
        plural: "pods".into(),
        namespaced: true,
        verbs: ["create", "delete", "get", "list", "patch", "update", "watch"]
            .map(String::from)
            .to_vec(),
    }
}

// A descriptor whose verb set excludes "watch"; synchronizers have to poll it
#[fixture]
pub fn gadget_descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        gvk: GADGET_GVK.clone(),
        plural: "gadgets".into(),
        namespaced: true,
        verbs: ["get", "list"].map(String::from).to_vec(),
    }
}
