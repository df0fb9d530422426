use std::sync::Arc;

use clockabilly::mock::MockUtcClock;
use kl_core::cluster::ResourceDescriptor;
use kl_core::k8s::TypedScheme;
use kl_core::prelude::*;
use kl_testutils::*;
use kube::api::DynamicObject;
use rstest::*;

use super::*;
use crate::columns::Column;
use crate::properties::Property;
use crate::registry::{
    ExtensionRegistry,
    ResourceExtension,
};

const CREATED_TS: i64 = 1_700_000_000;

fn obj(raw: DynamicObject) -> KubeObject {
    KubeObject::from_dynamic(raw, &TypedScheme::with_defaults()).unwrap()
}

fn titles(columns: &[Column]) -> Vec<&str> {
    columns.iter().map(|c| c.title.as_str()).collect()
}

#[fixture]
fn depl_descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        gvk: DEPL_GVK.clone(),
        plural: "deployments".into(),
        namespaced: true,
        verbs: ["get", "list", "watch"].map(String::from).to_vec(),
    }
}

#[rstest]
fn test_pod_columns_ordered_by_priority(pod_descriptor: ResourceDescriptor, test_pod: DynamicObject) {
    let registry = ExtensionRegistry::with_defaults();
    let columns = registry.columns_for(&pod_descriptor);

    assert_eq!(titles(&columns), vec!["Name", "Namespace", "Ready", "Phase", "Restarts", "Node", "Age"]);

    let pod = obj(test_pod);
    assert_eq!(columns[0].render(&pod), TEST_POD);
    assert_eq!(columns[3].render(&pod), "Pending");
    assert_eq!(columns[5].render(&pod), "node-1");
}

#[rstest]
fn test_unknown_kind_gets_generic_columns(gadget_descriptor: ResourceDescriptor, test_gadget: DynamicObject) {
    let registry = ExtensionRegistry::with_defaults();
    let columns = registry.columns_for(&gadget_descriptor);

    // nothing kind-specific applies; the common metadata still renders
    assert_eq!(titles(&columns), vec!["Name", "Namespace", "Age"]);
    assert_eq!(columns[0].render(&obj(test_gadget)), "the-gadget");
}

#[rstest]
fn test_deployment_properties_use_typed_form(depl_descriptor: ResourceDescriptor, test_deployment: DynamicObject) {
    let registry = ExtensionRegistry::with_defaults();
    let props = registry.properties_for(&depl_descriptor, &obj(test_deployment));

    assert_eq!(props[0], Property::new("Name", TEST_DEPLOYMENT).with_priority(100));

    let replicas = props.iter().find(|p| p.name == "Replicas").unwrap();
    assert!(replicas.children.contains(&Property::new("Desired", "3")));
    assert!(replicas.children.contains(&Property::new("Ready", "2")));
}

#[rstest]
fn test_service_properties_include_ports(test_service: DynamicObject) {
    let descriptor = ResourceDescriptor {
        gvk: SVC_GVK.clone(),
        plural: "services".into(),
        namespaced: true,
        verbs: ["get", "list", "watch"].map(String::from).to_vec(),
    };
    let registry = ExtensionRegistry::with_defaults();

    let columns = registry.columns_for(&descriptor);
    assert_eq!(titles(&columns), vec!["Name", "Namespace", "Type", "Cluster-IP", "Ports", "Age"]);
    assert_eq!(columns[4].render(&obj(test_service.clone())), "443/TCP");

    let props = registry.properties_for(&descriptor, &obj(test_service));
    let svc = props.iter().find(|p| p.name == "Service").unwrap();
    assert!(svc.children.contains(&Property::new("Cluster IP", "10.96.0.42")));
}

#[rstest]
fn test_extensions_append_in_registration_order(pod_descriptor: ResourceDescriptor) {
    struct PinnedColumn(&'static str);
    impl ResourceExtension for PinnedColumn {
        fn contribute_columns(&self, _descriptor: &ResourceDescriptor, columns: &mut Vec<Column>) {
            columns.push(Column::new(self.0, 10, |_| String::new()));
        }
    }

    let mut registry = ExtensionRegistry::new();
    registry.register(PinnedColumn("first"));
    registry.register(PinnedColumn("second"));
    registry.register(PinnedColumn("third"));

    // equal priorities: the stable sort keeps registration order
    assert_eq!(titles(&registry.columns_for(&pod_descriptor)), vec!["first", "second", "third"]);
}

#[rstest]
fn test_custom_extension_slots_between_defaults(gadget_descriptor: ResourceDescriptor) {
    struct SprocketsExtension;
    impl ResourceExtension for SprocketsExtension {
        fn contribute_columns(&self, descriptor: &ResourceDescriptor, columns: &mut Vec<Column>) {
            if descriptor.gvk.kind == "Gadget" {
                columns.push(Column::new("Sprockets", 95, |obj| obj.data()["spec"]["sprockets"].to_string()));
            }
        }
    }

    let mut registry = ExtensionRegistry::with_defaults();
    registry.register(SprocketsExtension);

    let columns = registry.columns_for(&gadget_descriptor);
    assert_eq!(titles(&columns), vec!["Name", "Sprockets", "Namespace", "Age"]);
}

#[rstest]
fn test_age_column_with_pinned_clock(pod_descriptor: ResourceDescriptor, mut test_pod: DynamicObject) {
    test_pod.metadata.creation_timestamp =
        Some(metav1::Time(chrono::DateTime::from_timestamp(CREATED_TS, 0).unwrap()));

    let clock = MockUtcClock::new(CREATED_TS + 3 * 3600 + 300);
    let mut registry = ExtensionRegistry::new();
    registry.register(MetadataExtension::new_with_clock(Arc::from(clock)));

    let columns = registry.columns_for(&pod_descriptor);
    let age = columns.iter().find(|c| c.title == "Age").unwrap();
    assert_eq!(age.render(&obj(test_pod)), "3h5m");
}
