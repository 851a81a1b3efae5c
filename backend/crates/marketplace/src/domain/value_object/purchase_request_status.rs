//! Purchase Request Status
//!
//! ```text
//!            accept
//! PENDING ----------> ACCEPTED
//!    |
//!    +--------------> DENIED
//!            deny
//! ```
//!
//! PENDING is the only initial state; ACCEPTED and DENIED are terminal.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseRequestStatus {
    #[default]
    #[display("PENDING")]
    Pending,
    #[display("ACCEPTED")]
    Accepted,
    #[display("DENIED")]
    Denied,
}

impl PurchaseRequestStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            PurchaseRequestStatus::Pending => "PENDING",
            PurchaseRequestStatus::Accepted => "ACCEPTED",
            PurchaseRequestStatus::Denied => "DENIED",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(PurchaseRequestStatus::Pending),
            "ACCEPTED" => Some(PurchaseRequestStatus::Accepted),
            "DENIED" => Some(PurchaseRequestStatus::Denied),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, PurchaseRequestStatus::Pending)
    }

    #[inline]
    pub const fn can_transition_to(&self, next: PurchaseRequestStatus) -> bool {
        use PurchaseRequestStatus::*;
        matches!((self, next), (Pending, Accepted) | (Pending, Denied))
    }
}
