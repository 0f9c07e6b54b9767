//! Named permissions and the static role-grant matrix.
//!
//! A principal has a permission iff the intersection of held roles and
//! the permission's grant set is non-empty. Grant sets are explicit:
//! giving `Admin` a permission means listing it here, not inferring it
//! from hierarchy level. `SuperAdmin` appears in every grant set, which
//! is what makes it the global override without a second code path.

use std::fmt;

use ridehub_core::models::role::{Role, RoleSet};

use crate::error::AuthzError;

/// A named capability gated by role membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageOwnClubs,
    ManageAnyClub,
    CreateRides,
    SellListings,
    ModeratePosts,
    ManageUsers,
    RunJobs,
}

impl Permission {
    /// The explicit set of roles granting this permission.
    pub const fn granting_roles(self) -> &'static [Role] {
        match self {
            Permission::ManageOwnClubs => {
                &[Role::ClubOwner, Role::Admin, Role::SuperAdmin]
            }
            Permission::ManageAnyClub => &[Role::Admin, Role::SuperAdmin],
            Permission::CreateRides => {
                &[Role::Rider, Role::ClubOwner, Role::Admin, Role::SuperAdmin]
            }
            Permission::SellListings => &[Role::Seller, Role::Admin, Role::SuperAdmin],
            Permission::ModeratePosts => &[Role::Admin, Role::SuperAdmin],
            Permission::ManageUsers => &[Role::Admin, Role::SuperAdmin],
            Permission::RunJobs => &[Role::SuperAdmin],
        }
    }

    /// Pure matrix lookup, total over the fixed permission table.
    pub fn granted_to(self, roles: &RoleSet) -> bool {
        roles.intersects(self.granting_roles())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::ManageOwnClubs => "manage_own_clubs",
            Permission::ManageAnyClub => "manage_any_club",
            Permission::CreateRides => "create_rides",
            Permission::SellListings => "sell_listings",
            Permission::ModeratePosts => "moderate_posts",
            Permission::ManageUsers => "manage_users",
            Permission::RunJobs => "run_jobs",
        }
    }

    /// Resolve an externally configured permission name. An unknown
    /// name is a configuration defect, not a request-time failure.
    pub fn from_name(name: &str) -> Result<Permission, AuthzError> {
        match name {
            "manage_own_clubs" => Ok(Permission::ManageOwnClubs),
            "manage_any_club" => Ok(Permission::ManageAnyClub),
            "create_rides" => Ok(Permission::CreateRides),
            "sell_listings" => Ok(Permission::SellListings),
            "moderate_posts" => Ok(Permission::ModeratePosts),
            "manage_users" => Ok(Permission::ManageUsers),
            "run_jobs" => Ok(Permission::RunJobs),
            other => Err(AuthzError::UnknownPermission(other.to_string())),
        }
    }

    pub const ALL: &'static [Permission] = &[
        Permission::ManageOwnClubs,
        Permission::ManageAnyClub,
        Permission::CreateRides,
        Permission::SellListings,
        Permission::ModeratePosts,
        Permission::ManageUsers,
        Permission::RunJobs,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
