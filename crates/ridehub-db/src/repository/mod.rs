//! SurrealDB repository implementations.

mod club;
mod listing;
mod membership;
mod post;
mod ride;
mod role_grant;
mod user;

pub use club::SurrealClubRepository;
pub use listing::SurrealListingRepository;
pub use membership::SurrealMembershipRepository;
pub use post::SurrealPostRepository;
pub use ride::SurrealRideRepository;
pub use role_grant::SurrealRoleGrantRepository;
pub use user::SurrealUserRepository;
