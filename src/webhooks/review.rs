//! Evaluation of a single admission request.
//!
//! Resolves the identity of the new (and for UPDATE the old) object and
//! hands both to the policies. Any resolution failure aborts the review.

use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, Operation};

use crate::webhooks::policies::{Decision, ReviewError, ValidationContext, resolve, validate_all};

/// Decide on an admission request.
///
/// DELETE and CONNECT carry no identity to check and are always allowed.
pub fn review(request: &AdmissionRequest<DynamicObject>) -> Decision {
    let is_update = match request.operation {
        Operation::Create => false,
        Operation::Update => true,
        _ => return Decision::Allowed,
    };

    evaluate_request(request, is_update).unwrap_or_else(Decision::Errored)
}

fn evaluate_request(
    request: &AdmissionRequest<DynamicObject>,
    is_update: bool,
) -> Result<Decision, ReviewError> {
    let object = request.object.as_ref().ok_or(ReviewError::MissingObject)?;
    let identity = resolve(object)?;

    if !is_update {
        return Ok(validate_all(&ValidationContext::create(&identity)));
    }

    let old_object = request
        .old_object
        .as_ref()
        .ok_or(ReviewError::MissingOldObject)?;
    let old_identity = resolve(old_object)?;

    Ok(validate_all(&ValidationContext::update(
        &identity,
        &old_identity,
    )))
}
