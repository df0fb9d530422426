mod apiset;
mod gvk;
mod object;
mod reference;
mod scheme;
mod util;

pub use apiset::DynamicApiSet;
pub use gvk::GVK;
pub use object::KubeObject;
pub use reference::{
    ObjectRef,
    ResolveError,
};
pub use scheme::TypedScheme;
pub use util::*;

use crate::prelude::*;

pub trait KubeResourceExt {
    fn namespaced_name(&self) -> String;
}

impl<T: kube::Resource> KubeResourceExt for T {
    fn namespaced_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{ns}/{}", self.name_any()),
            None => self.name_any(),
        }
    }
}

#[cfg(test)]
mod tests;
