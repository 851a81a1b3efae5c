//! Sale Entity
//!
//! Finalized transaction for a vehicle. Exists only while the vehicle is
//! flagged sold.

use chrono::{DateTime, Utc};

use crate::domain::entity::vehicle::Vehicle;
use crate::domain::value_object::{SaleId, UserId, VehicleId, price::Price};
use crate::error::{MarketplaceError, MarketplaceResult};

#[derive(Debug, Clone)]
pub struct Sale {
    pub id: SaleId,
    pub vehicle_id: VehicleId,
    pub vendor_id: UserId,
    pub buyer_id: UserId,
    pub price: Price,
    pub sale_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    pub fn record(vehicle: &Vehicle, buyer_id: UserId, price: Price) -> Self {
        let now = Utc::now();
        Self {
            id: SaleId::new(),
            vehicle_id: vehicle.id,
            vendor_id: vehicle.vendor_id,
            buyer_id,
            price,
            sale_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ensure_sold_by(&self, vendor_id: &UserId) -> MarketplaceResult<()> {
        if self.vendor_id == *vendor_id {
            Ok(())
        } else {
            Err(MarketplaceError::NotOwner("Sale"))
        }
    }

    /// Buyer and price are the only correctable fields.
    pub fn amend(&mut self, buyer_id: UserId, price: Price) {
        self.buyer_id = buyer_id;
        self.price = price;
        self.updated_at = Utc::now();
    }
}
