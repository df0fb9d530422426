use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use kube::api::{
    DynamicObject,
    GroupVersionKind,
    TypeMeta,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
    de,
};

use crate::errors::*;
use crate::prelude::*;

// Newtype around kube's GroupVersionKind; the compact string form "group/version.kind"
// ("version.kind" for the core group) is what gets persisted for pinned resources, so
// serde round-trips through that form rather than a struct.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GVK(GroupVersionKind);

impl GVK {
    pub fn new(group: &str, version: &str, kind: &str) -> GVK {
        GVK(GroupVersionKind::gvk(group, version, kind))
    }

    pub fn from_dynamic_obj(obj: &DynamicObject) -> anyhow::Result<GVK> {
        match &obj.types {
            Some(t) => GVK::from_type_meta(t),
            None => bail!("dynamic object {} has no type data", obj.name_any()),
        }
    }

    pub fn from_type_meta(t: &TypeMeta) -> anyhow::Result<GVK> {
        Ok(GVK(t.try_into()?))
    }

    // Owner references carry "apiVersion" + "kind"; a bare version means the core group.
    pub fn from_owner_ref(rf: &metav1::OwnerReference) -> anyhow::Result<GVK> {
        let parts: Vec<_> = rf.api_version.split('/').collect();
        match parts[..] {
            [version] => Ok(GVK::new("", version, &rf.kind)),
            [group, version] => Ok(GVK::new(group, version, &rf.kind)),
            _ => bail!("invalid apiVersion in owner reference: {}", rf.api_version),
        }
    }

    pub fn into_type_meta(&self) -> TypeMeta {
        TypeMeta {
            api_version: self.0.api_version(),
            kind: self.0.kind.clone(),
        }
    }
}

// Deref lets a GVK be passed anywhere a GroupVersionKind is expected
impl Deref for GVK {
    type Target = GroupVersionKind;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for GVK {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.0.group.is_empty() {
            write!(f, "{}/", self.0.group)?;
        }
        write!(f, "{}.{}", self.0.version, self.0.kind)
    }
}

impl FromStr for GVK {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<GVK> {
        let (group, rest) = match s.split_once('/') {
            Some((g, r)) => (g, r),
            None => ("", s),
        };

        // the group can contain dots (metrics.k8s.io), the version never does
        match rest.split_once('.') {
            Some((version, kind)) if !version.is_empty() && !kind.is_empty() && !version.contains('/') => {
                Ok(GVK::new(group, version, kind))
            },
            _ => bail!("invalid format for gvk: {s}"),
        }
    }
}

impl Serialize for GVK {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GVK {
    fn deserialize<D>(deserializer: D) -> Result<GVK, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        GVK::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::core(GVK::new("", "v1", "Pod"), "v1.Pod")]
    #[case::grouped(GVK::new("apps", "v1", "Deployment"), "apps/v1.Deployment")]
    #[case::dotted_group(GVK::new("metrics.k8s.io", "v1beta1", "PodMetrics"), "metrics.k8s.io/v1beta1.PodMetrics")]
    fn test_serialized_form_round_trips(#[case] gvk: GVK, #[case] expected: &str) {
        assert_eq!(gvk.to_string(), expected);
        assert_eq!(expected.parse::<GVK>().unwrap(), gvk);
        assert_eq!(serde_json::to_string(&gvk).unwrap(), format!("\"{expected}\""));
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_kind("apps/v1")]
    #[case::no_version("apps/.Deployment")]
    #[case::extra_slashes("a/b/v1.Kind")]
    fn test_parse_rejects_garbage(#[case] input: &str) {
        assert_err!(input.parse::<GVK>());
    }

    #[rstest]
    #[case::core("v1", GVK::new("", "v1", "ReplicationController"))]
    #[case::grouped("apps/v1", GVK::new("apps", "v1", "ReplicationController"))]
    fn test_from_owner_ref(#[case] api_version: &str, #[case] expected: GVK) {
        let rf = metav1::OwnerReference {
            api_version: api_version.into(),
            kind: "ReplicationController".into(),
            ..Default::default()
        };
        assert_eq!(GVK::from_owner_ref(&rf).unwrap(), expected);
    }

    #[rstest]
    fn test_from_owner_ref_invalid() {
        let rf = metav1::OwnerReference { api_version: "a/b/c".into(), kind: "Foo".into(), ..Default::default() };
        assert_err!(GVK::from_owner_ref(&rf));
    }
}
