//! Ingress-class presence policy.
//!
//! Enforced on CREATE: a new HTTPProxy must name its controller through at
//! least one identity signal, otherwise no Contour instance will claim it.
//! Conflicting signals are not checked here.

use super::field::dotted;
use super::{
    ANNOTATION_CONTOUR_INGRESS_CLASS, ANNOTATION_KUBERNETES_INGRESS_CLASS, Decision,
    INGRESS_CLASS_NAME_PATH, ValidationContext,
};

/// Validate that at least one identity signal is set
pub fn validate(ctx: &ValidationContext<'_>) -> Decision {
    if ctx.identity.is_empty() {
        return Decision::denied(format!(
            "either {} or {} annotation or the {} field must be set",
            ANNOTATION_KUBERNETES_INGRESS_CLASS,
            ANNOTATION_CONTOUR_INGRESS_CLASS,
            dotted(INGRESS_CLASS_NAME_PATH)
        ));
    }

    Decision::Allowed
}
