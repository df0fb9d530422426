use std::sync::Arc;

use clockabilly::{
    Clockable,
    UtcClock,
};
use kl_core::cluster::ResourceDescriptor;
use kl_core::prelude::*;

use crate::columns::Column;
use crate::properties::Property;
use crate::registry::ResourceExtension;

// Applies to every kind: the identifying columns and the common metadata block at the
// top of the detail view.
pub struct MetadataExtension {
    clock: Arc<dyn Clockable + Send + Sync>,
}

impl MetadataExtension {
    pub fn new() -> MetadataExtension {
        MetadataExtension { clock: Arc::new(UtcClock) }
    }

    // Tests pin the clock so age strings come out deterministic
    pub fn new_with_clock(clock: Arc<dyn Clockable + Send + Sync>) -> MetadataExtension {
        MetadataExtension { clock }
    }
}

impl Default for MetadataExtension {
    fn default() -> Self {
        MetadataExtension::new()
    }
}

impl ResourceExtension for MetadataExtension {
    fn contribute_columns(&self, descriptor: &ResourceDescriptor, columns: &mut Vec<Column>) {
        columns.push(Column::new("Name", 100, |obj| obj.name()));
        if descriptor.namespaced {
            columns.push(Column::new("Namespace", 90, |obj| obj.namespace().unwrap_or_default()));
        }

        let clock = self.clock.clone();
        columns.push(Column::new("Age", -100, move |obj| match obj.creation_timestamp() {
            Some(ts) => format_age(clock.now_ts() - ts.0.timestamp()),
            None => String::new(),
        }));
    }

    fn contribute_properties(&self, _descriptor: &ResourceDescriptor, obj: &KubeObject, props: &mut Vec<Property>) {
        props.push(Property::new("Name", obj.name()).with_priority(100));
        if let Some(ns) = obj.namespace() {
            props.push(Property::new("Namespace", ns).with_priority(99));
        }
        if let Some(uid) = obj.uid() {
            props.push(Property::new("UID", uid).with_priority(98));
        }
        if let Some(ts) = obj.creation_timestamp() {
            props.push(Property::new("Created", ts.0.to_rfc3339()).with_priority(97));
        }
        if !obj.labels().is_empty() {
            let labels = obj.labels().iter().map(|(k, v)| Property::new(k, v.clone())).collect();
            props.push(Property::group("Labels", labels).with_priority(96));
        }
    }
}

// kubectl-style: the two most significant units, no padding
fn format_age(mut secs: i64) -> String {
    secs = secs.max(0);

    let (days, hours, mins) = (secs / 86400, (secs % 86400) / 3600, (secs % 3600) / 60);
    if days > 0 {
        format!("{days}d{hours}h")
    } else if hours > 0 {
        format!("{hours}h{mins}m")
    } else if mins > 0 {
        format!("{mins}m")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod test {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::seconds(42, "42s")]
    #[case::minutes(300, "5m")]
    #[case::hours(7500, "2h5m")]
    #[case::days(200000, "2d7h")]
    #[case::clock_skew(-30, "0s")]
    fn test_format_age(#[case] secs: i64, #[case] expected: &str) {
        assert_eq!(format_age(secs), expected);
    }
}
