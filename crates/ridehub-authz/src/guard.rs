//! Authorization guard — the allow/deny gate in front of protected
//! operations.
//!
//! Guards never mutate state and never partially authorize: a request
//! is wholly allowed or wholly denied before any side-effecting
//! operation begins. `None` for the context always means
//! [`AuthzError::Unauthenticated`], which callers map to 401 as
//! distinct from a 403 denial.

use ridehub_core::models::role::Role;

use crate::error::AuthzError;
use crate::permission::Permission;
use crate::principal::AuthContext;

/// Allow iff the principal holds any of `allowed`, or `SuperAdmin`
/// (global override). A denial carries the roles that would have
/// sufficed.
pub fn require_any_role(
    ctx: Option<&AuthContext>,
    allowed: &[Role],
) -> Result<(), AuthzError> {
    let ctx = ctx.ok_or(AuthzError::Unauthenticated)?;

    if ctx.roles.contains(Role::SuperAdmin) || ctx.roles.intersects(allowed) {
        return Ok(());
    }

    Err(AuthzError::MissingRole {
        required: allowed.to_vec(),
    })
}

/// Coarse hierarchy gate: allow iff any held role is at least `min`.
/// This is the only place the numeric hierarchy is consulted.
pub fn require_role(ctx: Option<&AuthContext>, min: Role) -> Result<(), AuthzError> {
    let ctx = ctx.ok_or(AuthzError::Unauthenticated)?;

    if ctx.roles.iter().any(|r| r.at_least(min)) {
        return Ok(());
    }

    Err(AuthzError::MissingRole {
        required: vec![min],
    })
}

/// Fine-grained gate: allow iff the permission's explicit grant set
/// intersects the principal's roles.
pub fn require_permission(
    ctx: Option<&AuthContext>,
    permission: Permission,
) -> Result<(), AuthzError> {
    let ctx = ctx.ok_or(AuthzError::Unauthenticated)?;

    if permission.granted_to(&ctx.roles) {
        return Ok(());
    }

    Err(AuthzError::MissingPermission { permission })
}

#[cfg(test)]
mod tests {
    use ridehub_core::models::role::RoleSet;
    use uuid::Uuid;

    use super::*;

    fn ctx(granted: &[Role]) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            roles: RoleSet::from_granted(granted.iter().copied()),
        }
    }

    #[test]
    fn missing_principal_is_unauthenticated_not_forbidden() {
        let err = require_any_role(None, &[Role::Admin]).unwrap_err();
        assert_eq!(err, AuthzError::Unauthenticated);
    }

    #[test]
    fn intersecting_role_allows() {
        let ctx = ctx(&[Role::Seller]);
        require_any_role(Some(&ctx), &[Role::Seller, Role::Admin]).unwrap();
    }

    #[test]
    fn super_admin_overrides_any_role_list() {
        let ctx = ctx(&[Role::SuperAdmin]);
        require_any_role(Some(&ctx), &[Role::Seller]).unwrap();
    }

    #[test]
    fn denial_carries_sufficient_roles() {
        let ctx = ctx(&[Role::Rider]);
        let err = require_any_role(Some(&ctx), &[Role::Seller, Role::Admin]).unwrap_err();
        assert_eq!(
            err,
            AuthzError::MissingRole {
                required: vec![Role::Seller, Role::Admin],
            }
        );
    }

    #[test]
    fn coarse_guard_uses_hierarchy() {
        let admin = ctx(&[Role::Admin]);
        require_role(Some(&admin), Role::Seller).unwrap();

        let rider = ctx(&[Role::Rider]);
        assert!(require_role(Some(&rider), Role::Seller).is_err());
    }

    #[test]
    fn permission_guard_delegates_to_matrix() {
        let seller = ctx(&[Role::Seller]);
        require_permission(Some(&seller), Permission::SellListings).unwrap();

        let err =
            require_permission(Some(&seller), Permission::ModeratePosts).unwrap_err();
        assert_eq!(
            err,
            AuthzError::MissingPermission {
                permission: Permission::ModeratePosts,
            }
        );
    }
}
