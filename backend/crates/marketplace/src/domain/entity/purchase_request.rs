//! Purchase Request Entity

use chrono::{DateTime, Utc};

use crate::domain::entity::vehicle::Vehicle;
use crate::domain::value_object::{
    PurchaseRequestId, UserId, VehicleId, purchase_request_status::PurchaseRequestStatus,
};
use crate::error::{MarketplaceError, MarketplaceResult};

/// A buyer's offer to buy a vehicle at its listed price.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub id: PurchaseRequestId,
    pub vehicle_id: VehicleId,
    pub buyer_id: UserId,
    /// Copied from the vehicle when the request is opened
    pub vendor_id: UserId,
    pub status: PurchaseRequestStatus,
    pub request_date: DateTime<Utc>,
    /// Set when the vendor accepts or denies
    pub response_date: Option<DateTime<Utc>>,
}

impl PurchaseRequest {
    pub fn open(vehicle: &Vehicle, buyer_id: UserId) -> Self {
        Self {
            id: PurchaseRequestId::new(),
            vehicle_id: vehicle.id,
            buyer_id,
            vendor_id: vehicle.vendor_id,
            status: PurchaseRequestStatus::Pending,
            request_date: Utc::now(),
            response_date: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == PurchaseRequestStatus::Pending
    }

    pub fn ensure_addressed_to(&self, vendor_id: &UserId) -> MarketplaceResult<()> {
        if self.vendor_id == *vendor_id {
            Ok(())
        } else {
            Err(MarketplaceError::NotOwner("Purchase request"))
        }
    }

    pub fn ensure_pending(&self) -> MarketplaceResult<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(MarketplaceError::RequestNotPending(self.status))
        }
    }

    pub fn accept(&mut self) -> MarketplaceResult<()> {
        self.respond(PurchaseRequestStatus::Accepted)
    }

    pub fn deny(&mut self) -> MarketplaceResult<()> {
        self.respond(PurchaseRequestStatus::Denied)
    }

    fn respond(&mut self, next: PurchaseRequestStatus) -> MarketplaceResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(MarketplaceError::RequestNotPending(self.status));
        }
        self.status = next;
        self.response_date = Some(Utc::now());
        Ok(())
    }
}
