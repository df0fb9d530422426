use kl_core::k8s::GVK;
use lazy_static::lazy_static;

pub const TEST_NAMESPACE: &str = "test";
pub const TEST_POD: &str = "the-pod";
pub const TEST_DEPLOYMENT: &str = "the-deployment";
pub const TEST_SERVICE: &str = "the-service";

lazy_static! {
    pub static ref POD_GVK: GVK = GVK::new("", "v1", "Pod");
    pub static ref SVC_GVK: GVK = GVK::new("", "v1", "Service");
    pub static ref DEPL_GVK: GVK = GVK::new("apps", "v1", "Deployment");
    pub static ref GADGET_GVK: GVK = GVK::new("fake.io", "v1", "Gadget");
}
