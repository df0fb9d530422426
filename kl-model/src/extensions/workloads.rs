use k8s_openapi::api::batch::v1 as batchv1;
use kl_core::cluster::ResourceDescriptor;
use kl_core::prelude::*;

use crate::columns::Column;
use crate::properties::Property;
use crate::registry::ResourceExtension;

// Replica/completion summaries for the workload controllers.  Everything goes through
// the typed form; a workload that failed typed decoding just renders a dash.
pub struct WorkloadsExtension;

impl ResourceExtension for WorkloadsExtension {
    fn contribute_columns(&self, descriptor: &ResourceDescriptor, columns: &mut Vec<Column>) {
        match (descriptor.gvk.group.as_str(), descriptor.gvk.kind.as_str()) {
            ("apps", "Deployment") => {
                columns.push(Column::new("Ready", 50, |obj| {
                    fraction(obj.typed::<appsv1::Deployment>().and_then(|d| {
                        let status = d.status.as_ref()?;
                        Some((status.ready_replicas.unwrap_or(0), status.replicas.unwrap_or(0)))
                    }))
                }));
            },
            ("apps", "StatefulSet") => {
                columns.push(Column::new("Ready", 50, |obj| {
                    fraction(obj.typed::<appsv1::StatefulSet>().and_then(|s| {
                        let status = s.status.as_ref()?;
                        Some((status.ready_replicas.unwrap_or(0), status.replicas))
                    }))
                }));
            },
            ("apps", "DaemonSet") => {
                columns.push(Column::new("Ready", 50, |obj| {
                    fraction(obj.typed::<appsv1::DaemonSet>().and_then(|d| {
                        let status = d.status.as_ref()?;
                        Some((status.number_ready, status.desired_number_scheduled))
                    }))
                }));
            },
            ("apps", "ReplicaSet") => {
                columns.push(Column::new("Ready", 50, |obj| {
                    fraction(obj.typed::<appsv1::ReplicaSet>().and_then(|r| {
                        let status = r.status.as_ref()?;
                        Some((status.ready_replicas.unwrap_or(0), status.replicas))
                    }))
                }));
            },
            ("batch", "Job") => {
                columns.push(Column::new("Completions", 50, |obj| {
                    fraction(obj.typed::<batchv1::Job>().map(|j| {
                        let succeeded = j.status.as_ref().and_then(|s| s.succeeded).unwrap_or(0);
                        let wanted = j.spec.as_ref().and_then(|s| s.completions).unwrap_or(1);
                        (succeeded, wanted)
                    }))
                }));
            },
            _ => {},
        }
    }

    fn contribute_properties(&self, _descriptor: &ResourceDescriptor, obj: &KubeObject, props: &mut Vec<Property>) {
        if let Some(depl) = obj.typed::<appsv1::Deployment>() {
            let mut children = vec![];
            if let Some(spec) = &depl.spec {
                children.push(Property::new("Desired", spec.replicas.unwrap_or(1).to_string()));
                if let Some(strategy) = spec.strategy.as_ref().and_then(|s| s.type_.clone()) {
                    children.push(Property::new("Strategy", strategy));
                }
            }
            if let Some(status) = &depl.status {
                children.push(Property::new("Ready", status.ready_replicas.unwrap_or(0).to_string()));
                children.push(Property::new("Updated", status.updated_replicas.unwrap_or(0).to_string()));
            }
            props.push(Property::group("Replicas", children).with_priority(50));
        } else if let Some(job) = obj.typed::<batchv1::Job>() {
            let succeeded = job.status.as_ref().and_then(|s| s.succeeded).unwrap_or(0);
            let failed = job.status.as_ref().and_then(|s| s.failed).unwrap_or(0);
            let wanted = job.spec.as_ref().and_then(|s| s.completions).unwrap_or(1);
            props.push(
                Property::group("Completions", vec![
                    Property::new("Succeeded", format!("{succeeded}/{wanted}")),
                    Property::new("Failed", failed.to_string()),
                ])
                .with_priority(50),
            );
        }
    }
}

fn fraction(counts: Option<(i32, i32)>) -> String {
    match counts {
        Some((have, want)) => format!("{have}/{want}"),
        None => "-".into(),
    }
}
