//! RideHub Services — club and ride orchestration.
//!
//! Services compose repository operations into the domain workflows
//! the request layer exposes. Authorization (who may call what) is
//! decided by `ridehub-authz` before a service runs; the policies
//! enforced here are the ones that hold regardless of caller, such as
//! Founder-row protection and creator-only cancellation.

pub mod club;
pub mod ride;

pub use club::ClubService;
pub use ride::RideService;
