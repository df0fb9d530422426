use kube::api::DynamicObject;

use crate::errors::*;
use crate::k8s::GVK;
use crate::prelude::*;

// Items coming off a dynamic list or watch don't reliably carry per-item TypeMeta, so we
// stamp the expected type onto each object before it's bound anywhere.  An object that
// already claims a *different* type is an error; the caller decides whether to drop it.
pub fn conform_type_meta(obj: &mut DynamicObject, expected: &GVK) -> EmptyResult {
    if let Some(t) = &obj.types {
        let actual = GVK::from_type_meta(t)?;
        if &actual != expected {
            bail!("object {} has kind {actual}, expected {expected}", obj.name_any());
        }
    }
    obj.types = Some(expected.into_type_meta());
    Ok(())
}

pub fn split_namespaced_name(name: &str) -> (Option<String>, String) {
    match name.split_once('/') {
        Some((ns, n)) => (Some(ns.into()), n.into()),
        None => (None, name.into()),
    }
}
