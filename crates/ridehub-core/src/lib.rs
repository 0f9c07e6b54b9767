//! RideHub Core — domain models, error taxonomy, repository contracts,
//! and the notification contract shared across all crates.

pub mod error;
pub mod models;
pub mod notify;
pub mod repository;

pub use error::{RidehubError, RidehubResult};
