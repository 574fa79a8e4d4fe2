//! CREATE reviews.

use axum::http::StatusCode;
use httpproxy_admission::admit;
use serde_json::json;

use crate::common::fixtures::{HttpProxyBuilder, create_review};
use crate::response_of;

#[test]
fn test_create_without_identity_denied() {
    let proxy = HttpProxyBuilder::new("orphan").fqdn("orphan.example.com").build();
    let (status, review) = admit(create_review(proxy), None);

    assert_eq!(status, StatusCode::OK);
    let response = response_of(review);
    assert!(!response.allowed);
    assert_eq!(response.result.code, 403);
    assert_eq!(
        response.result.message,
        "either kubernetes.io/ingress.class or projectcontour.io/ingress.class \
         annotation or the .spec.ingressClassName field must be set"
    );
}

#[test]
fn test_create_with_contour_annotation_allowed() {
    let proxy = HttpProxyBuilder::default()
        .contour_ingress_class("external")
        .build();
    let response = response_of(admit(create_review(proxy), None).1);

    assert!(response.allowed);
    assert_eq!(response.result.message, "ok");
}

#[test]
fn test_create_with_kubernetes_annotation_allowed() {
    let proxy = HttpProxyBuilder::default()
        .kubernetes_ingress_class("contour")
        .build();
    assert!(response_of(admit(create_review(proxy), None).1).allowed);
}

#[test]
fn test_create_with_field_allowed() {
    let proxy = HttpProxyBuilder::default()
        .ingress_class_name("contour")
        .build();
    assert!(response_of(admit(create_review(proxy), None).1).allowed);
}

#[test]
fn test_create_with_empty_values_denied() {
    let proxy = HttpProxyBuilder::default()
        .kubernetes_ingress_class("")
        .contour_ingress_class("")
        .ingress_class_name("")
        .build();
    assert!(!response_of(admit(create_review(proxy), None).1).allowed);
}

#[test]
fn test_create_with_nested_object_field_errored() {
    let proxy = HttpProxyBuilder::default()
        .contour_ingress_class("external")
        .raw_ingress_class_name(json!({"name": "contour"}))
        .build();
    let (status, review) = admit(create_review(proxy), None);

    assert_eq!(status, StatusCode::OK);
    let response = response_of(review);
    assert!(!response.allowed);
    assert_eq!(response.result.code, 400);
    assert_eq!(response.result.reason, "BadRequest");
    assert!(response.result.message.contains(".spec.ingressClassName"));
    assert!(response.result.message.contains("expected string"));
}

#[test]
fn test_create_with_numeric_field_errored() {
    let proxy = HttpProxyBuilder::default()
        .raw_ingress_class_name(json!(7))
        .build();
    assert_eq!(response_of(admit(create_review(proxy), None).1).result.code, 400);
}
