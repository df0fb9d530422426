use std::sync::Arc;

use httpmock::Method::*;
use kl_core::cluster::ClusterHandle;
use kl_core::k8s::GVK;

use super::*;

#[rstest]
#[tokio::test]
async fn test_select_swaps_synchronizers() {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    fake_apiserver.handle_discovery();
    fake_apiserver.handle(|when, then| {
        when.method(GET).path("/api/v1/pods");
        then.json_body(obj_list("v1", vec![serde_json::to_value(test_pod("pod-1")).unwrap()]));
    });
    fake_apiserver.handle(|when, then| {
        when.method(GET).path("/apis/apps/v1/deployments");
        then.json_body(obj_list("apps/v1", vec![serde_json::to_value(test_deployment("depl-1")).unwrap()]));
    });
    fake_apiserver.build();

    let cluster = Arc::new(ClusterHandle::with_client(client).await.unwrap());
    let pods = cluster.find_resource(&POD_GVK).unwrap().clone();
    let depls = cluster.find_resource(&GVK::new("apps", "v1", "Deployment")).unwrap().clone();

    let mut session = SyncSession::new(cluster.clone(), SyncSettings::default());

    let mut pod_rx = session.select(&pods, None).await;
    pod_rx.changed().await.unwrap();
    assert_eq!(pod_rx.borrow_and_update()[0].name(), "pod-1");

    // switching kinds stops the old synchronizer before the new one starts; the old
    // receiver's channel closes once any trailing publish has gone out
    let mut depl_rx = session.select(&depls, None).await;
    while pod_rx.changed().await.is_ok() {}

    depl_rx.changed().await.unwrap();
    assert_eq!(depl_rx.borrow_and_update()[0].name(), "depl-1");

    session.stop().await;
    assert!(!session.is_active());
}
