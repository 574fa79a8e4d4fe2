//! Immutability validation policy.
//!
//! Enforced on UPDATE: once a proxy has been claimed by a controller
//! instance, none of its identity signals may change. Moving a proxy
//! between instances means deleting and recreating it.
//!
//! Checks run in a fixed order and stop at the first change, so the
//! message for a given pair of objects is always the same.

use super::field::dotted;
use super::{
    ANNOTATION_CONTOUR_INGRESS_CLASS, ANNOTATION_KUBERNETES_INGRESS_CLASS, Decision,
    INGRESS_CLASS_NAME_PATH, ValidationContext,
};

/// Validate immutability constraints on UPDATE operations
pub fn validate(ctx: &ValidationContext<'_>) -> Decision {
    let old = match ctx.old_identity {
        Some(identity) => identity,
        None => return Decision::Allowed, // Not an UPDATE
    };

    let new = ctx.identity;

    if new.kubernetes_ingress_class != old.kubernetes_ingress_class {
        return Decision::denied(format!(
            "changing annotation {} is not allowed",
            ANNOTATION_KUBERNETES_INGRESS_CLASS
        ));
    }

    if new.contour_ingress_class != old.contour_ingress_class {
        return Decision::denied(format!(
            "changing annotation {} is not allowed",
            ANNOTATION_CONTOUR_INGRESS_CLASS
        ));
    }

    if new.ingress_class_name != old.ingress_class_name {
        return Decision::denied(format!(
            "changing the {} field is not allowed",
            dotted(INGRESS_CLASS_NAME_PATH)
        ));
    }

    Decision::Allowed
}
