//! Ride domain model and lifecycle status.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a ride.
///
/// Created as `Planned`; the scheduler advances `Planned ->
/// InProgress -> Completed` based on elapsed time. `Cancelled` is
/// reachable only through an explicit creator action before the ride
/// completes. No backward transition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RideStatus::Planned => "Planned",
            RideStatus::InProgress => "InProgress",
            RideStatus::Completed => "Completed",
            RideStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_name(name: &str) -> Option<RideStatus> {
        match name {
            "Planned" => Some(RideStatus::Planned),
            "InProgress" => Some(RideStatus::InProgress),
            "Completed" => Some(RideStatus::Completed),
            "Cancelled" => Some(RideStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub club_id: Option<Uuid>,
    pub title: String,
    pub status: RideStatus,
    pub scheduled_at: DateTime<Utc>,
    pub duration_mins: u32,
    /// End of the scheduled window, `scheduled_at + duration`. Stored
    /// so the completion pass is a single indexed predicate.
    pub ends_at: DateTime<Utc>,
    /// When set, the retention-cleanup job never deletes this ride.
    pub keep_permanently: bool,
    /// Stamped by the lifecycle pass that marks the ride `Completed`.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRide {
    pub creator_id: Uuid,
    pub club_id: Option<Uuid>,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_mins: u32,
}

impl CreateRide {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_mins))
    }
}
