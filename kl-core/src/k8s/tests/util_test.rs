use kube::api::DynamicObject;

use super::*;

#[rstest]
fn test_conform_type_meta_stamps_missing_types(mut test_pod: DynamicObject) {
    test_pod.types = None;

    conform_type_meta(&mut test_pod, &POD_GVK).unwrap();
    assert_eq!(GVK::from_dynamic_obj(&test_pod).unwrap(), *POD_GVK);
}

#[rstest]
fn test_conform_type_meta_keeps_matching_types(mut test_pod: DynamicObject) {
    conform_type_meta(&mut test_pod, &POD_GVK).unwrap();
    assert_eq!(GVK::from_dynamic_obj(&test_pod).unwrap(), *POD_GVK);
}

#[rstest]
fn test_conform_type_meta_rejects_mismatch(mut test_service: DynamicObject) {
    assert_err!(conform_type_meta(&mut test_service, &POD_GVK));
}

#[rstest]
#[case::namespaced("test/the-pod", Some("test".to_string()), "the-pod")]
#[case::cluster_scoped("the-node", None, "the-node")]
fn test_split_namespaced_name(#[case] input: &str, #[case] ns: Option<String>, #[case] name: &str) {
    assert_eq!(split_namespaced_name(input), (ns, name.into()));
}
