//! Price Value Object
//!
//! Positive amount with at most two decimal places, fitting NUMERIC(12, 2).
//! Always held at scale 2, the way the database returns it.

use kernel::error::app_error::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 9_999_999_999.99
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> AppResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(AppError::bad_request("Price must be greater than zero"));
        }
        let mut amount = amount.normalize();
        if amount.scale() > 2 {
            return Err(AppError::bad_request(
                "Price must have at most two decimal places",
            ));
        }
        if amount > MAX_PRICE {
            return Err(AppError::bad_request(format!(
                "Price must not exceed {MAX_PRICE}"
            )));
        }

        amount.rescale(2);
        Ok(Self(amount))
    }

    /// Trusts the stored value.
    pub fn from_db(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
