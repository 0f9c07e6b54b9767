//! Ride service — creation and the creator's cancellation path.
//!
//! Scheduled status transitions never go through here; they are
//! exclusively applied by the lifecycle jobs. The one user-driven
//! transition is cancellation by the ride's creator.

use ridehub_core::error::{RidehubError, RidehubResult};
use ridehub_core::models::ride::{CreateRide, Ride};
use ridehub_core::notify::{CommunityEvent, Notifier};
use ridehub_core::repository::RideRepository;
use uuid::Uuid;

pub struct RideService<R: RideRepository, N: Notifier> {
    rides: R,
    notifier: N,
}

impl<R: RideRepository, N: Notifier> RideService<R, N> {
    pub fn new(rides: R, notifier: N) -> Self {
        Self { rides, notifier }
    }

    /// Create a ride in `Planned` state. The creator is fixed for the
    /// ride's lifetime.
    pub async fn create(&self, input: CreateRide) -> RidehubResult<Ride> {
        let ride = self.rides.create(input).await?;
        tracing::info!(ride_id = %ride.id, creator_id = %ride.creator_id, "ride created");
        Ok(ride)
    }

    /// Cancel a ride. Only the creator may do this, at any point
    /// before the ride completes. The write is conditional on the
    /// ride still being cancellable, so a racing lifecycle pass
    /// cannot be overwritten.
    pub async fn cancel(&self, caller_id: Uuid, ride_id: Uuid) -> RidehubResult<Ride> {
        let ride = self.rides.get_by_id(ride_id).await?;

        if ride.creator_id != caller_id {
            return Err(RidehubError::Forbidden {
                reason: "only the ride's creator may cancel it".into(),
            });
        }

        let cancelled = self.rides.cancel(ride_id).await?;

        self.notifier.notify(CommunityEvent::RideCancelled {
            ride_id,
            creator_id: caller_id,
        });

        Ok(cancelled)
    }

    /// Toggle the retention flag. Caller authorization (owner or
    /// admin) is decided above this layer.
    pub async fn set_keep_permanently(&self, ride_id: Uuid, keep: bool) -> RidehubResult<Ride> {
        self.rides.set_keep_permanently(ride_id, keep).await
    }
}
