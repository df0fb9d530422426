use kl_core::cluster::ResourceDescriptor;
use kl_core::prelude::*;

use crate::columns::Column;
use crate::properties::Property;
use crate::registry::ResourceExtension;

pub struct PodsExtension;

impl ResourceExtension for PodsExtension {
    fn contribute_columns(&self, descriptor: &ResourceDescriptor, columns: &mut Vec<Column>) {
        if !applies(descriptor) {
            return;
        }

        columns.push(Column::new("Ready", 60, |obj| {
            match obj.typed::<corev1::Pod>() {
                Some(pod) => {
                    let total = container_statuses(pod).len();
                    let ready = container_statuses(pod).iter().filter(|cs| cs.ready).count();
                    format!("{ready}/{total}")
                },
                None => "-".into(),
            }
        }));
        columns.push(Column::new("Phase", 55, pod_phase));
        columns.push(Column::new("Restarts", 50, |obj| match obj.typed::<corev1::Pod>() {
            Some(pod) => container_statuses(pod)
                .iter()
                .map(|cs| cs.restart_count)
                .sum::<i32>()
                .to_string(),
            None => "-".into(),
        }));
        columns.push(Column::new("Node", 40, |obj| match obj.typed::<corev1::Pod>() {
            Some(pod) => pod.spec.as_ref().and_then(|s| s.node_name.clone()).unwrap_or_default(),
            None => String::new(),
        }));
    }

    fn contribute_properties(&self, _descriptor: &ResourceDescriptor, obj: &KubeObject, props: &mut Vec<Property>) {
        let Some(pod) = obj.typed::<corev1::Pod>() else {
            return;
        };

        props.push(Property::new("Phase", pod_phase(obj)).with_priority(60));
        if let Some(node) = pod.spec.as_ref().and_then(|s| s.node_name.clone()) {
            props.push(Property::new("Node", node).with_priority(59));
        }
        if let Some(ip) = pod.status.as_ref().and_then(|s| s.pod_ip.clone()) {
            props.push(Property::new("IP", ip).with_priority(58));
        }

        // one group per container: image, readiness, restart count
        if let Some(containers) = pod.spec.as_ref().map(|s| &s.containers) {
            let statuses = container_statuses(pod);
            let children = containers
                .iter()
                .map(|c| {
                    let mut details = vec![Property::new("Image", c.image.clone().unwrap_or_default())];
                    if let Some(cs) = statuses.iter().find(|cs| cs.name == c.name) {
                        details.push(Property::new("Ready", cs.ready.to_string()));
                        details.push(Property::new("Restarts", cs.restart_count.to_string()));
                    }
                    Property::group(&c.name, details)
                })
                .collect();
            props.push(Property::group("Containers", children).with_priority(55));
        }
    }
}

fn applies(descriptor: &ResourceDescriptor) -> bool {
    descriptor.gvk.group.is_empty() && descriptor.gvk.kind == "Pod"
}

// The phase also has a dynamic fallback so pods still render usefully if typed decoding
// ever fails underneath us.
fn pod_phase(obj: &KubeObject) -> String {
    if let Some(pod) = obj.typed::<corev1::Pod>() {
        pod.status.as_ref().and_then(|s| s.phase.clone()).unwrap_or_default()
    } else {
        obj.data()
            .pointer("/status/phase")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .into()
    }
}

fn container_statuses(pod: &corev1::Pod) -> &[corev1::ContainerStatus] {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default()
}
