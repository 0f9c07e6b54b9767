//! Principal resolution — loading the role set for an authenticated
//! identity.

use ridehub_core::error::{RidehubError, RidehubResult};
use ridehub_core::models::role::RoleSet;
use ridehub_core::repository::{RoleGrantRepository, UserRepository};
use uuid::Uuid;

/// A resolved principal: the identity plus its canonical role set.
///
/// Valid for a single request. Role assignments can change between
/// requests, so contexts must not be persisted or shared across them.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub roles: RoleSet,
}

/// Resolves an authenticated identity into an [`AuthContext`].
///
/// Generic over repository implementations so the authorization layer
/// has no dependency on the database crate.
pub struct PrincipalResolver<U: UserRepository, R: RoleGrantRepository> {
    user_repo: U,
    role_repo: R,
}

impl<U: UserRepository, R: RoleGrantRepository> PrincipalResolver<U, R> {
    pub fn new(user_repo: U, role_repo: R) -> Self {
        Self {
            user_repo,
            role_repo,
        }
    }

    /// Load the canonical role set for a principal.
    ///
    /// Fails with `NotFound` if the identity does not exist. The
    /// returned set always contains the baseline role, so it is never
    /// empty for a valid principal. Read-only.
    pub async fn resolve(&self, user_id: Uuid) -> RidehubResult<AuthContext> {
        // Existence check first so an unknown principal surfaces as
        // NotFound rather than an empty-but-valid role set.
        let user = self.user_repo.get_by_id(user_id).await.map_err(|e| match e {
            RidehubError::NotFound { .. } => RidehubError::NotFound {
                entity: "principal".into(),
                id: user_id.to_string(),
            },
            other => other,
        })?;

        let granted = self.role_repo.roles_for_user(user.id).await?;

        Ok(AuthContext {
            user_id: user.id,
            roles: RoleSet::from_granted(granted),
        })
    }
}
