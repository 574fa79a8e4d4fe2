//! Test fixtures and builder patterns for HTTPProxy admission reviews.

#![allow(dead_code)]

use httpproxy_admission::webhooks::policies::{
    ANNOTATION_CONTOUR_INGRESS_CLASS, ANNOTATION_KUBERNETES_INGRESS_CLASS,
};
use httpproxy_admission::webhooks::{AdmissionReview, DynamicObject};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Builder for HTTPProxy objects as they appear inside an admission review.
///
/// # Example
/// ```
/// let proxy = HttpProxyBuilder::new("test-proxy")
///     .contour_ingress_class("external")
///     .fqdn("app.example.com")
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct HttpProxyBuilder {
    name: String,
    namespace: String,
    annotations: BTreeMap<String, String>,
    ingress_class_name: Option<Value>,
    fqdn: Option<String>,
}

impl HttpProxyBuilder {
    /// Create a new builder with the given resource name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "default".to_string(),
            annotations: BTreeMap::new(),
            ingress_class_name: None,
            fqdn: None,
        }
    }

    /// Set the namespace for the resource.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Add an annotation to the resource.
    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Set `kubernetes.io/ingress.class`.
    pub fn kubernetes_ingress_class(self, value: impl Into<String>) -> Self {
        self.annotation(ANNOTATION_KUBERNETES_INGRESS_CLASS, value)
    }

    /// Set `projectcontour.io/ingress.class`.
    pub fn contour_ingress_class(self, value: impl Into<String>) -> Self {
        self.annotation(ANNOTATION_CONTOUR_INGRESS_CLASS, value)
    }

    /// Set `spec.ingressClassName` to a string.
    pub fn ingress_class_name(mut self, value: impl Into<String>) -> Self {
        self.ingress_class_name = Some(Value::String(value.into()));
        self
    }

    /// Set `spec.ingressClassName` to an arbitrary JSON value.
    pub fn raw_ingress_class_name(mut self, value: Value) -> Self {
        self.ingress_class_name = Some(value);
        self
    }

    /// Set `spec.virtualhost.fqdn`.
    pub fn fqdn(mut self, fqdn: impl Into<String>) -> Self {
        self.fqdn = Some(fqdn.into());
        self
    }

    /// Build the resource as raw JSON.
    pub fn build(self) -> Value {
        let mut spec = Map::new();
        if let Some(fqdn) = self.fqdn {
            spec.insert("virtualhost".to_string(), json!({ "fqdn": fqdn }));
        }
        if let Some(ingress_class_name) = self.ingress_class_name {
            spec.insert("ingressClassName".to_string(), ingress_class_name);
        }
        spec.insert(
            "routes".to_string(),
            json!([{ "services": [{ "name": "app", "port": 80 }] }]),
        );

        let mut metadata = json!({
            "name": self.name,
            "namespace": self.namespace,
        });
        if !self.annotations.is_empty() {
            metadata["annotations"] = json!(self.annotations);
        }

        json!({
            "apiVersion": "projectcontour.io/v1",
            "kind": "HTTPProxy",
            "metadata": metadata,
            "spec": Value::Object(spec),
        })
    }

    /// Build the resource decoded as a `DynamicObject`.
    pub fn build_dynamic(self) -> DynamicObject {
        serde_json::from_value(self.build()).expect("fixture decodes as DynamicObject")
    }
}

impl Default for HttpProxyBuilder {
    fn default() -> Self {
        Self::new("test-proxy")
    }
}

/// Wrap objects in an `admission.k8s.io/v1` AdmissionReview document.
pub fn review_json(operation: &str, object: Option<Value>, old_object: Option<Value>) -> Value {
    let mut request = json!({
        "uid": format!("uid-{}", operation.to_lowercase()),
        "kind": { "group": "projectcontour.io", "version": "v1", "kind": "HTTPProxy" },
        "resource": { "group": "projectcontour.io", "version": "v1", "resource": "httpproxies" },
        "name": "test-proxy",
        "namespace": "default",
        "operation": operation,
        "userInfo": { "username": "system:admin", "groups": ["system:masters"] },
        "dryRun": false,
    });
    if let Some(object) = object {
        request["object"] = object;
    }
    if let Some(old_object) = old_object {
        request["oldObject"] = old_object;
    }
    json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": request,
    })
}

/// Decode an AdmissionReview document.
pub fn review(
    operation: &str,
    object: Option<Value>,
    old_object: Option<Value>,
) -> AdmissionReview<DynamicObject> {
    serde_json::from_value(review_json(operation, object, old_object))
        .expect("fixture decodes as AdmissionReview")
}

/// CREATE review for `object`.
pub fn create_review(object: Value) -> AdmissionReview<DynamicObject> {
    review("CREATE", Some(object), None)
}

/// UPDATE review from `old_object` to `object`.
pub fn update_review(old_object: Value, object: Value) -> AdmissionReview<DynamicObject> {
    review("UPDATE", Some(object), Some(old_object))
}
