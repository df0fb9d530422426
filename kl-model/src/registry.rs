use std::cmp::Reverse;

use kl_core::cluster::ResourceDescriptor;
use kl_core::prelude::*;
use lazy_static::lazy_static;

use crate::columns::Column;
use crate::extensions;
use crate::properties::Property;

// Per-kind rendering lives in extensions instead of type-switches in the view code: each
// extension appends whatever applies to the kind at hand (never removes), and the final
// ordering is a stable priority sort, so an extension can slot a column between two
// contributed by somebody else.
pub trait ResourceExtension: Send + Sync {
    fn contribute_columns(&self, _descriptor: &ResourceDescriptor, _columns: &mut Vec<Column>) {}

    fn contribute_properties(&self, _descriptor: &ResourceDescriptor, _obj: &KubeObject, _props: &mut Vec<Property>) {}
}

#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn ResourceExtension>>,
}

impl ExtensionRegistry {
    pub fn new() -> ExtensionRegistry {
        ExtensionRegistry::default()
    }

    pub fn with_defaults() -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();
        registry.register(extensions::metadata::MetadataExtension::new());
        registry.register(extensions::workloads::WorkloadsExtension);
        registry.register(extensions::pods::PodsExtension);
        registry.register(extensions::networking::NetworkingExtension);
        registry
    }

    pub fn register(&mut self, extension: impl ResourceExtension + 'static) {
        self.extensions.push(Box::new(extension));
    }

    pub fn columns_for(&self, descriptor: &ResourceDescriptor) -> Vec<Column> {
        let mut columns = vec![];
        for extension in &self.extensions {
            extension.contribute_columns(descriptor, &mut columns);
        }
        columns.sort_by_key(|c| Reverse(c.priority));
        columns
    }

    pub fn properties_for(&self, descriptor: &ResourceDescriptor, obj: &KubeObject) -> Vec<Property> {
        let mut props = vec![];
        for extension in &self.extensions {
            extension.contribute_properties(descriptor, obj, &mut props);
        }
        props.sort_by_key(|p| Reverse(p.priority));
        props
    }
}

lazy_static! {
    pub static ref EXTENSIONS: ExtensionRegistry = ExtensionRegistry::with_defaults();
}
