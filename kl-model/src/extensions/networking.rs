use k8s_openapi::api::networking::v1 as networkingv1;
use kl_core::cluster::ResourceDescriptor;
use kl_core::prelude::*;

use crate::columns::Column;
use crate::properties::Property;
use crate::registry::ResourceExtension;

pub struct NetworkingExtension;

impl ResourceExtension for NetworkingExtension {
    fn contribute_columns(&self, descriptor: &ResourceDescriptor, columns: &mut Vec<Column>) {
        match (descriptor.gvk.group.as_str(), descriptor.gvk.kind.as_str()) {
            ("", "Service") => {
                columns.push(Column::new("Type", 60, |obj| {
                    svc_spec(obj).and_then(|s| s.type_.clone()).unwrap_or_default()
                }));
                columns.push(Column::new("Cluster-IP", 55, |obj| {
                    svc_spec(obj).and_then(|s| s.cluster_ip.clone()).unwrap_or_default()
                }));
                columns.push(Column::new("Ports", 50, |obj| {
                    let ports = svc_spec(obj).and_then(|s| s.ports.as_ref()).map(|ports| {
                        ports.iter().map(format_port).collect::<Vec<_>>().join(",")
                    });
                    ports.unwrap_or_default()
                }));
            },
            ("networking.k8s.io", "Ingress") => {
                columns.push(Column::new("Class", 60, |obj| match obj.typed::<networkingv1::Ingress>() {
                    Some(ing) => ing.spec.as_ref().and_then(|s| s.ingress_class_name.clone()).unwrap_or_default(),
                    None => String::new(),
                }));
                columns.push(Column::new("Hosts", 55, |obj| match obj.typed::<networkingv1::Ingress>() {
                    Some(ing) => ingress_hosts(ing).join(","),
                    None => String::new(),
                }));
            },
            _ => {},
        }
    }

    fn contribute_properties(&self, _descriptor: &ResourceDescriptor, obj: &KubeObject, props: &mut Vec<Property>) {
        if let Some(svc) = obj.typed::<corev1::Service>() {
            if let Some(spec) = &svc.spec {
                let mut children = vec![];
                if let Some(t) = &spec.type_ {
                    children.push(Property::new("Type", t.clone()));
                }
                if let Some(ip) = &spec.cluster_ip {
                    children.push(Property::new("Cluster IP", ip.clone()));
                }
                if let Some(ports) = &spec.ports {
                    let port_props = ports
                        .iter()
                        .map(|p| Property::new(&p.name.clone().unwrap_or_else(|| p.port.to_string()), format_port(p)))
                        .collect();
                    children.push(Property::group("Ports", port_props));
                }
                props.push(Property::group("Service", children).with_priority(50));
            }
        } else if let Some(ing) = obj.typed::<networkingv1::Ingress>() {
            // the rule table: one group per host, one row per path
            let rules = ing.spec.as_ref().and_then(|s| s.rules.as_deref()).unwrap_or_default();
            let children = rules
                .iter()
                .map(|rule| {
                    let host = rule.host.clone().unwrap_or_else(|| "*".into());
                    let paths = rule
                        .http
                        .as_ref()
                        .map(|http| {
                            http.paths
                                .iter()
                                .map(|p| {
                                    let path = p.path.clone().unwrap_or_else(|| "/".into());
                                    Property::new(&path, ingress_backend(&p.backend))
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    Property::group(&host, paths)
                })
                .collect();
            props.push(Property::group("Rules", children).with_priority(50));
        }
    }
}

fn svc_spec(obj: &KubeObject) -> Option<&corev1::ServiceSpec> {
    obj.typed::<corev1::Service>()?.spec.as_ref()
}

fn format_port(port: &corev1::ServicePort) -> String {
    let protocol = port.protocol.clone().unwrap_or_else(|| "TCP".into());
    format!("{}/{protocol}", port.port)
}

fn ingress_hosts(ing: &networkingv1::Ingress) -> Vec<String> {
    ing.spec
        .as_ref()
        .and_then(|s| s.rules.as_ref())
        .map(|rules| rules.iter().filter_map(|r| r.host.clone()).collect())
        .unwrap_or_default()
}

fn ingress_backend(backend: &networkingv1::IngressBackend) -> String {
    match &backend.service {
        Some(svc) => match svc.port.as_ref().and_then(|p| p.number) {
            Some(port) => format!("{}:{port}", svc.name),
            None => svc.name.clone(),
        },
        None => "-".into(),
    }
}
