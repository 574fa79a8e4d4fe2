//! Admission policies for HTTPProxy ingress-class identity.
//!
//! Policies are organized by operation:
//! - Create: an identity signal must be present (`ingress_class`)
//! - Update: identity signals are immutable (`immutability`)
//!
//! Everything here is synchronous and side-effect free. Resources are
//! reduced to an [`IdentityTuple`] first, and the rules only ever see tuples.

pub mod field;
pub mod identity;
pub mod immutability;
pub mod ingress_class;

pub use field::FieldError;
pub use identity::{
    ANNOTATION_CONTOUR_INGRESS_CLASS, ANNOTATION_KUBERNETES_INGRESS_CLASS,
    INGRESS_CLASS_NAME_PATH, IdentityTuple, resolve,
};

use thiserror::Error;

/// Reasons a request cannot be evaluated at all.
///
/// These are protocol problems (unexpected request or resource shape),
/// answered with a client error rather than a policy denial.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// A recognized identity field has the wrong type
    #[error(transparent)]
    Field(#[from] FieldError),

    /// CREATE or UPDATE without the new object
    #[error("there is no content to decode: request carries no object")]
    MissingObject,

    /// UPDATE without the previous object
    #[error("there is no content to decode: update request carries no oldObject")]
    MissingOldObject,
}

/// Outcome of an admission review. Produced once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Request passes every policy
    Allowed,
    /// Request violates a policy
    Denied {
        /// User-facing explanation naming the violated rule
        reason: String,
    },
    /// Request could not be evaluated
    Errored(ReviewError),
}

impl Decision {
    /// Create a denied decision
    pub fn denied(reason: impl Into<String>) -> Self {
        Decision::Denied {
            reason: reason.into(),
        }
    }

    /// Whether the request is admitted
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Short outcome label used in logs and metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::Denied { .. } => "denied",
            Decision::Errored(_) => "errored",
        }
    }
}

impl From<ReviewError> for Decision {
    fn from(err: ReviewError) -> Self {
        Decision::Errored(err)
    }
}

/// Context for validation
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Identity of the incoming resource
    pub identity: &'a IdentityTuple,
    /// Identity of the stored resource (UPDATE only)
    pub old_identity: Option<&'a IdentityTuple>,
}

impl<'a> ValidationContext<'a> {
    /// Context for a CREATE request
    pub fn create(identity: &'a IdentityTuple) -> Self {
        Self {
            identity,
            old_identity: None,
        }
    }

    /// Context for an UPDATE request
    pub fn update(identity: &'a IdentityTuple, old_identity: &'a IdentityTuple) -> Self {
        Self {
            identity,
            old_identity: Some(old_identity),
        }
    }

    /// Check if this is an UPDATE operation
    pub fn is_update(&self) -> bool {
        self.old_identity.is_some()
    }
}

/// Run the policy matching the operation.
///
/// Only the first violation is reported.
pub fn validate_all(ctx: &ValidationContext<'_>) -> Decision {
    if ctx.is_update() {
        immutability::validate(ctx)
    } else {
        ingress_class::validate(ctx)
    }
}
