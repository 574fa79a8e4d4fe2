//! Ingress-class identity of an HTTPProxy.
//!
//! Contour has accumulated three ways of saying which controller instance
//! owns a proxy: the legacy `kubernetes.io/ingress.class` annotation, the
//! vendor `projectcontour.io/ingress.class` annotation, and the
//! `spec.ingressClassName` field. This module collects all three.

use kube::core::DynamicObject;

use super::field::{FieldError, nested_string};

/// Legacy ingress-class annotation
pub const ANNOTATION_KUBERNETES_INGRESS_CLASS: &str = "kubernetes.io/ingress.class";

/// Contour-specific ingress-class annotation
pub const ANNOTATION_CONTOUR_INGRESS_CLASS: &str = "projectcontour.io/ingress.class";

/// Path of the ingress-class field inside the resource data
pub const INGRESS_CLASS_NAME_PATH: &[&str] = &["spec", "ingressClassName"];

/// The three identity signals of a resource. Absent signals are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IdentityTuple {
    /// Value of `kubernetes.io/ingress.class`
    pub kubernetes_ingress_class: String,
    /// Value of `projectcontour.io/ingress.class`
    pub contour_ingress_class: String,
    /// Value of `spec.ingressClassName`
    pub ingress_class_name: String,
}

impl IdentityTuple {
    /// True when no identity signal is set.
    pub fn is_empty(&self) -> bool {
        self.kubernetes_ingress_class.is_empty()
            && self.contour_ingress_class.is_empty()
            && self.ingress_class_name.is_empty()
    }
}

/// Compute the identity tuple of a decoded resource.
///
/// Annotations are optional metadata and never fail. A malformed
/// `spec.ingressClassName` is returned as an error.
pub fn resolve(resource: &DynamicObject) -> Result<IdentityTuple, FieldError> {
    let annotation = |key: &str| {
        resource
            .metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .cloned()
            .unwrap_or_default()
    };

    let ingress_class_name =
        nested_string(&resource.data, INGRESS_CLASS_NAME_PATH)?.unwrap_or_default();

    Ok(IdentityTuple {
        kubernetes_ingress_class: annotation(ANNOTATION_KUBERNETES_INGRESS_CLASS),
        contour_ingress_class: annotation(ANNOTATION_CONTOUR_INGRESS_CLASS),
        ingress_class_name,
    })
}
