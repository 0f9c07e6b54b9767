//! Resource kinds subject to ownership resolution.

use serde::{Deserialize, Serialize};

/// Selects which owned resource the ownership resolver loads. Each
/// kind has exactly one designated owner field, set at creation and
/// immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Ride,
    Club,
    Listing,
    Post,
}

impl ResourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Ride => "ride",
            ResourceKind::Club => "club",
            ResourceKind::Listing => "listing",
            ResourceKind::Post => "post",
        }
    }
}
