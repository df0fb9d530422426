use httpmock::prelude::*;
use httpmock::{
    Method,
    Mock,
    Then,
    When,
};
use serde_json::json;

pub struct MockServerBuilder {
    server: MockServer,
    handlers: Vec<Box<dyn Fn(When, Then)>>,
    mock_ids: Vec<usize>,
}

fn print_req(req: &HttpMockRequest) -> bool {
    // Use println instead of info! so that this works outside of the lib crate
    println!("    Received: {} {}", req.method_str(), req.uri().path());
    true
}

impl MockServerBuilder {
    pub fn new() -> MockServerBuilder {
        MockServerBuilder {
            server: MockServer::start(),
            handlers: vec![],
            mock_ids: vec![],
        }
    }

    pub fn handle<F: Fn(When, Then) + 'static>(&mut self, f: F) -> &mut Self {
        self.handlers.push(Box::new(move |w, t| {
            let w = w.matches(print_req);
            f(w, t);
        }));
        self
    }

    pub fn handle_not_found(&mut self, path: String) -> &mut Self {
        self.handle(move |when, then| {
            when.path(&path);
            then.status(404).json_body(status_not_found());
        })
    }

    // Wires up the discovery endpoints a ClusterHandle walks at connect time: the core
    // group plus "apps" and "metrics.k8s.io".
    pub fn handle_discovery(&mut self) -> &mut Self {
        self.handle_discovery_base();
        self.handle(|when, then| {
            when.method(Method::GET).path("/apis/apps/v1");
            then.json_body(apps_v1_discovery());
        });
        self.handle(|when, then| {
            when.method(Method::GET).path("/apis/metrics.k8s.io/v1beta1");
            then.json_body(metrics_v1beta1_discovery());
        })
    }

    // Same as handle_discovery, except every named group fails to enumerate.
    pub fn handle_discovery_with_broken_group(&mut self) -> &mut Self {
        self.handle_discovery_base();
        self.handle(|when, then| {
            when.method(Method::GET).path("/apis/apps/v1");
            then.status(500).json_body(status_internal_error());
        });
        self.handle(|when, then| {
            when.method(Method::GET).path("/apis/metrics.k8s.io/v1beta1");
            then.status(500).json_body(status_internal_error());
        })
    }

    fn handle_discovery_base(&mut self) {
        self.handle(|when, then| {
            when.method(Method::GET).path("/api");
            then.json_body(json!({
                "kind": "APIVersions",
                "versions": ["v1"],
                "serverAddressByClientCIDRs": [],
            }));
        });
        self.handle(|when, then| {
            when.method(Method::GET).path("/api/v1");
            then.json_body(core_v1_discovery());
        });
        self.handle(|when, then| {
            when.method(Method::GET).path("/apis");
            then.json_body(api_group_discovery());
        });
    }

    pub fn build(&mut self) {
        for f in self.handlers.iter() {
            self.mock_ids.push(self.server.mock(f).id);
        }

        // Print all unmatched/unhandled requests for easier debugging;
        // this has to go last so that the other mock rules have a chance
        // to match first
        self.server.mock(|when, _| {
            when.matches(print_req);
        });
    }

    pub fn assert(&self) {
        for id in &self.mock_ids {
            println!("checking assertions for mock {id}");
            Mock::new(*id, &self.server).assert()
        }
    }

    pub fn assert_hits(&self, idx: usize, hits: usize) {
        Mock::new(self.mock_ids[idx], &self.server).assert_hits(hits)
    }

    pub fn url(&self) -> http::Uri {
        http::Uri::try_from(self.server.url("/")).unwrap()
    }
}

pub fn make_fake_apiserver() -> (MockServerBuilder, kube::Client) {
    let builder = MockServerBuilder::new();
    let config = kube::Config::new(builder.url());
    let client = kube::Client::try_from(config).unwrap();
    (builder, client)
}

pub fn status_not_found() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "reason": "NotFound",
      "code": 404
    })
}

pub fn status_internal_error() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "reason": "InternalError",
      "code": 500
    })
}

// Wrap a set of serialized objects in the list envelope a LIST call returns
pub fn obj_list(api_version: &str, items: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "kind": "List",
        "apiVersion": api_version,
        "metadata": {"resourceVersion": "1"},
        "items": items,
    })
}

pub fn api_group_discovery() -> serde_json::Value {
    json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": [
            {
                "name": "apps",
                "versions": [{"groupVersion": "apps/v1", "version": "v1"}],
                "preferredVersion": {"groupVersion": "apps/v1", "version": "v1"},
            },
            {
                "name": "metrics.k8s.io",
                "versions": [{"groupVersion": "metrics.k8s.io/v1beta1", "version": "v1beta1"}],
                "preferredVersion": {"groupVersion": "metrics.k8s.io/v1beta1", "version": "v1beta1"},
            },
        ],
    })
}

// The interesting entries: bindings has no list/get at all, componentstatuses can't be
// listed, and pods/status is a subresource; none of those should survive discovery
// filtering.
pub fn core_v1_discovery() -> serde_json::Value {
    json!({
        "kind": "APIResourceList",
        "groupVersion": "v1",
        "resources": [
            {
                "name": "bindings",
                "singularName": "binding",
                "namespaced": true,
                "kind": "Binding",
                "verbs": ["create"],
            },
            {
                "name": "componentstatuses",
                "singularName": "componentstatus",
                "namespaced": false,
                "kind": "ComponentStatus",
                "shortNames": ["cs"],
                "verbs": ["get"],
            },
            {
                "name": "configmaps",
                "singularName": "configmap",
                "namespaced": true,
                "kind": "ConfigMap",
                "shortNames": ["cm"],
                "verbs": ["create", "delete", "deletecollection", "get", "list", "patch", "update", "watch"],
            },
            {
                "name": "pods",
                "singularName": "pod",
                "namespaced": true,
                "kind": "Pod",
                "shortNames": ["po"],
                "categories": ["all"],
                "verbs": ["create", "delete", "deletecollection", "get", "list", "patch", "update", "watch"],
            },
            {
                "name": "pods/status",
                "singularName": "",
                "namespaced": true,
                "kind": "Pod",
                "verbs": ["get", "patch", "update"],
            },
            {
                "name": "services",
                "singularName": "service",
                "namespaced": true,
                "kind": "Service",
                "shortNames": ["svc"],
                "categories": ["all"],
                "verbs": ["create", "delete", "deletecollection", "get", "list", "patch", "update", "watch"],
            },
        ],
    })
}

pub fn apps_v1_discovery() -> serde_json::Value {
    json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "apps/v1",
        "resources": [
            {
                "name": "daemonsets",
                "singularName": "daemonset",
                "namespaced": true,
                "kind": "DaemonSet",
                "shortNames": ["ds"],
                "categories": ["all"],
                "verbs": ["create", "delete", "deletecollection", "get", "list", "patch", "update", "watch"],
            },
            {
                "name": "deployments",
                "singularName": "deployment",
                "namespaced": true,
                "kind": "Deployment",
                "shortNames": ["deploy"],
                "categories": ["all"],
                "verbs": ["create", "delete", "deletecollection", "get", "list", "patch", "update", "watch"],
            },
            {
                "name": "deployments/scale",
                "singularName": "",
                "namespaced": true,
                "group": "autoscaling",
                "version": "v1",
                "kind": "Scale",
                "verbs": ["get", "patch", "update"],
            },
        ],
    })
}

pub fn metrics_v1beta1_discovery() -> serde_json::Value {
    json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "metrics.k8s.io/v1beta1",
        "resources": [
            {
                "name": "nodes",
                "singularName": "",
                "namespaced": false,
                "kind": "NodeMetrics",
                "verbs": ["get", "list"],
            },
            {
                "name": "pods",
                "singularName": "",
                "namespaced": true,
                "kind": "PodMetrics",
                "verbs": ["get", "list"],
            },
        ],
    })
}
