//! Club membership and the ordered membership-role ladder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Club-specific role on the ordered ladder
/// `Member < Officer < Admin < Founder`.
///
/// The derived [`Ord`] follows declaration order, which is the ladder
/// order used by club authorization checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ClubRole {
    Member,
    Officer,
    Admin,
    Founder,
}

impl ClubRole {
    /// Index on the ladder; higher means more authority within a club.
    pub const fn ladder_index(self) -> u8 {
        match self {
            ClubRole::Member => 0,
            ClubRole::Officer => 1,
            ClubRole::Admin => 2,
            ClubRole::Founder => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ClubRole::Member => "Member",
            ClubRole::Officer => "Officer",
            ClubRole::Admin => "Admin",
            ClubRole::Founder => "Founder",
        }
    }

    pub fn from_name(name: &str) -> Option<ClubRole> {
        match name {
            "Member" => Some(ClubRole::Member),
            "Officer" => Some(ClubRole::Officer),
            "Admin" => Some(ClubRole::Admin),
            "Founder" => Some(ClubRole::Founder),
            _ => None,
        }
    }
}

/// Relates a user to a club. Created at join time, removed at
/// leave/removal time. Founder rows are only ever removed together
/// with the whole club.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubMembership {
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: ClubRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: ClubRole,
}
