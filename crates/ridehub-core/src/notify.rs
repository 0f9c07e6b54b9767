//! Fire-and-forget notification contract.
//!
//! The outbound delivery channel (email/SMS) is an external
//! collaborator; this crate only defines the call site contract. A
//! notification must never block or fail the transaction that emits
//! it, which is why [`Notifier::notify`] is infallible and synchronous
//! from the caller's perspective.

use uuid::Uuid;

/// Events the community core emits for out-of-band delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunityEvent {
    ClubJoined { club_id: Uuid, user_id: Uuid },
    ClubMemberRemoved { club_id: Uuid, user_id: Uuid },
    RideCancelled { ride_id: Uuid, creator_id: Uuid },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, event: CommunityEvent);
}

/// Default notifier: structured log line, nothing else. The real
/// delivery pipeline subscribes to these log events downstream.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: CommunityEvent) {
        tracing::info!(?event, "community event");
    }
}
