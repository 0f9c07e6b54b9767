//! Authorization error types.

use ridehub_core::error::RidehubError;
use ridehub_core::models::membership::ClubRole;
use ridehub_core::models::resource::ResourceKind;
use ridehub_core::models::role::Role;
use thiserror::Error;

use crate::permission::Permission;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    /// No principal was resolved for the request.
    #[error("authentication required")]
    Unauthenticated,

    /// The principal holds none of the roles that would allow the
    /// operation. Carries the sufficient roles for actionable error
    /// messages.
    #[error("requires one of roles {required:?}")]
    MissingRole { required: Vec<Role> },

    #[error("requires permission '{permission}'")]
    MissingPermission { permission: Permission },

    /// Club-scoped denial: the principal's membership role (if any)
    /// sits below the required rung of the ladder.
    #[error("requires club role {required:?} or above")]
    InsufficientClubRole { required: ClubRole },

    /// The principal neither owns the resource nor holds an
    /// overriding role.
    #[error("not permitted to act on this {kind:?}")]
    NotOwner { kind: ResourceKind },

    /// Unknown permission name in a route or job configuration. A
    /// programming defect, never a request-time condition.
    #[error("unknown permission name: {0}")]
    UnknownPermission(String),
}

impl From<AuthzError> for RidehubError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthenticated => RidehubError::Unauthenticated,
            AuthzError::UnknownPermission(name) => {
                RidehubError::Configuration(format!("unknown permission name: {name}"))
            }
            denied => RidehubError::Forbidden {
                reason: denied.to_string(),
            },
        }
    }
}
