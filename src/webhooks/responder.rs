//! Projection of a [`Decision`] onto the admission response.
//!
//! The status block mirrors what the API server expects from a validating
//! webhook: 200 for allowed requests, 403/Forbidden for policy denials and
//! 400/BadRequest for requests that could not be evaluated.

use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse};

use crate::webhooks::policies::Decision;

/// Message attached to allowed responses
pub const ALLOWED_MESSAGE: &str = "ok";

/// Status reason for policy denials
pub const REASON_FORBIDDEN: &str = "Forbidden";

/// Status reason for requests that could not be evaluated
pub const REASON_BAD_REQUEST: &str = "BadRequest";

/// Build the admission response for `decision`.
pub fn respond(
    request: &AdmissionRequest<DynamicObject>,
    decision: &Decision,
) -> AdmissionResponse {
    let response = AdmissionResponse::from(request);
    match decision {
        Decision::Allowed => with_status(response, 200, "", ALLOWED_MESSAGE),
        Decision::Denied { reason } => {
            with_status(response.deny(reason), 403, REASON_FORBIDDEN, reason)
        }
        Decision::Errored(cause) => {
            let message = cause.to_string();
            with_status(response.deny(&message), 400, REASON_BAD_REQUEST, &message)
        }
    }
}

fn with_status(
    mut response: AdmissionResponse,
    code: u16,
    reason: &str,
    message: &str,
) -> AdmissionResponse {
    response.result.code = code;
    response.result.reason = reason.to_string();
    response.result.message = message.to_string();
    response
}
