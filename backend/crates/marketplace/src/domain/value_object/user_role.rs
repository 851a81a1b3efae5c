use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Fixed at registration; vendors list and sell, buyers request purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[display("BUYER")]
    Buyer,
    #[display("VENDOR")]
    Vendor,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Buyer => "BUYER",
            UserRole::Vendor => "VENDOR",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BUYER" => Some(UserRole::Buyer),
            "VENDOR" => Some(UserRole::Vendor),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_vendor(&self) -> bool {
        matches!(self, UserRole::Vendor)
    }
}
