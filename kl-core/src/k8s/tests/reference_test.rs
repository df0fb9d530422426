use httpmock::Method::*;
use kube::api::DynamicObject;
use serde_json::json;

use super::*;
use crate::cluster::ClusterHandle;

async fn connected_handle(fake_apiserver: &mut MockServerBuilder, client: kube::Client) -> ClusterHandle {
    fake_apiserver.handle_discovery();
    fake_apiserver.build();
    ClusterHandle::with_client(client).await.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_resolve_caches_on_the_reference(test_pod: DynamicObject) {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    fake_apiserver.handle(move |when, then| {
        when.method(GET)
            .path(format!("/api/v1/namespaces/{TEST_NAMESPACE}/pods/{TEST_POD}"));
        then.json_body(serde_json::to_value(&test_pod).unwrap());
    });
    let handle = connected_handle(&mut fake_apiserver, client).await;

    let rf = ObjectRef::new(POD_GVK.clone(), Some(TEST_NAMESPACE), TEST_POD);
    let obj = rf.resolve(&handle).await.unwrap();
    assert_eq!(obj.name(), TEST_POD);
    assert_some!(obj.typed::<corev1::Pod>());

    // second resolution comes out of the cache, not the apiserver
    rf.resolve(&handle).await.unwrap();
    fake_apiserver.assert_hits(0, 1);
}

#[rstest]
#[tokio::test]
async fn test_resolve_not_found() {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    fake_apiserver.handle_not_found(format!("/api/v1/namespaces/{TEST_NAMESPACE}/pods/nope"));
    let handle = connected_handle(&mut fake_apiserver, client).await;

    let rf = ObjectRef::new(POD_GVK.clone(), Some(TEST_NAMESPACE), "nope");
    assert!(matches!(rf.resolve(&handle).await, Err(ResolveError::NotFound(_))));
}

#[rstest]
#[tokio::test]
async fn test_resolve_unknown_kind() {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let handle = connected_handle(&mut fake_apiserver, client).await;

    let rf = ObjectRef::new(GADGET_GVK.clone(), Some(TEST_NAMESPACE), "the-gadget");
    assert!(matches!(rf.resolve(&handle).await, Err(ResolveError::UnknownKind(_))));
}

#[rstest]
fn test_owners_of(mut test_pod: DynamicObject) {
    test_pod.metadata.owner_references = Some(vec![metav1::OwnerReference {
        api_version: "apps/v1".into(),
        kind: "ReplicaSet".into(),
        name: "the-rs".into(),
        uid: "uid-the-rs".into(),
        ..Default::default()
    }]);
    let obj = KubeObject::from_dynamic(test_pod, &TypedScheme::with_defaults()).unwrap();

    let owners = ObjectRef::owners_of(&obj);
    assert_eq!(
        owners,
        vec![ObjectRef::new(GVK::new("apps", "v1", "ReplicaSet"), Some(TEST_NAMESPACE), "the-rs")]
    );
}

#[rstest]
fn test_reference_serialized_form() {
    let rf = ObjectRef::new(DEPL_GVK.clone(), Some(TEST_NAMESPACE), TEST_DEPLOYMENT);
    let serialized = serde_json::to_value(&rf).unwrap();
    assert_eq!(
        serialized,
        json!({"gvk": "apps/v1.Deployment", "namespace": TEST_NAMESPACE, "name": TEST_DEPLOYMENT})
    );
    assert_eq!(serde_json::from_value::<ObjectRef>(serialized).unwrap(), rf);
}
