//! System roles and the multi-role set held by a principal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A system-wide role a principal may hold. A principal may hold
/// several roles at once; roles are only ever added through explicit
/// assignment and never silently revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Baseline role. Held implicitly by every resolved principal.
    User,
    Rider,
    Seller,
    ClubOwner,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Hierarchy level. A higher level implies the capabilities of
    /// lower levels for the coarse role guard only; the permission
    /// matrix uses explicit grant sets instead.
    pub const fn level(self) -> u8 {
        match self {
            Role::User => 0,
            Role::Rider => 1,
            Role::Seller => 2,
            Role::ClubOwner => 3,
            Role::Admin => 4,
            Role::SuperAdmin => 5,
        }
    }

    pub fn at_least(self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Stable name used for storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Rider => "Rider",
            Role::Seller => "Seller",
            Role::ClubOwner => "ClubOwner",
            Role::Admin => "Admin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "User" => Some(Role::User),
            "Rider" => Some(Role::Rider),
            "Seller" => Some(Role::Seller),
            "ClubOwner" => Some(Role::ClubOwner),
            "Admin" => Some(Role::Admin),
            "SuperAdmin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

/// The deduplicated set of roles held by a resolved principal.
///
/// Never empty: construction through [`RoleSet::from_granted`] always
/// inserts the baseline [`Role::User`], so a valid principal without
/// explicit grants still holds one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet(HashSet<Role>);

impl RoleSet {
    /// Build a role set from explicit grants, adding the baseline role.
    pub fn from_granted(granted: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: HashSet<Role> = granted.into_iter().collect();
        roles.insert(Role::User);
        RoleSet(roles)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// True iff this set intersects `allowed`. Set semantics: the
    /// result does not depend on the order of either side.
    pub fn intersects(&self, allowed: &[Role]) -> bool {
        allowed.iter().any(|r| self.0.contains(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_is_strictly_ordered() {
        let ordered = [
            Role::User,
            Role::Rider,
            Role::Seller,
            Role::ClubOwner,
            Role::Admin,
            Role::SuperAdmin,
        ];
        for window in ordered.windows(2) {
            assert!(window[0].level() < window[1].level());
        }
    }

    #[test]
    fn at_least_follows_levels() {
        assert!(Role::Admin.at_least(Role::Rider));
        assert!(Role::Rider.at_least(Role::Rider));
        assert!(!Role::Seller.at_least(Role::Admin));
    }

    #[test]
    fn role_set_always_contains_baseline() {
        let empty = RoleSet::from_granted([]);
        assert!(empty.contains(Role::User));
        assert!(!empty.is_empty());

        let granted = RoleSet::from_granted([Role::Admin, Role::Admin]);
        assert!(granted.contains(Role::User));
        assert!(granted.contains(Role::Admin));
        assert_eq!(granted.len(), 2);
    }

    #[test]
    fn role_names_round_trip() {
        for role in [
            Role::User,
            Role::Rider,
            Role::Seller,
            Role::ClubOwner,
            Role::Admin,
            Role::SuperAdmin,
        ] {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_name("Moderator"), None);
    }
}
