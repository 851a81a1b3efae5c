//! Repository Traits
//!
//! Interfaces for persistence. Implementations live in the infra layer.
//!
//! Operations that touch more than one aggregate (`create_marking_sold`,
//! `delete_releasing_vehicle`, `commit_acceptance`) are single calls so an
//! implementation can make them atomic.

use crate::domain::entity::{PurchaseRequest, Sale, User, Vehicle};
use crate::domain::value_object::{
    PurchaseRequestId, SaleId, UserId, VehicleId,
    email::Email,
    paging::{Page, PageRequest},
    vehicle_filter::VehicleFilter,
};
use crate::error::MarketplaceResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Fails with `EmailTaken` on a duplicate email.
    async fn create(&self, user: &User) -> MarketplaceResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> MarketplaceResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> MarketplaceResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> MarketplaceResult<bool>;

    /// Oldest first.
    async fn list(&self) -> MarketplaceResult<Vec<User>>;

    /// Fails with `EmailTaken` if the new email belongs to someone else.
    async fn update(&self, user: &User) -> MarketplaceResult<()>;

    /// Returns false if no such user. Fails with `InvalidState` while
    /// vehicles, requests or sales still reference the user.
    async fn delete(&self, user_id: &UserId) -> MarketplaceResult<bool>;
}

#[trait_variant::make(VehicleRepository: Send)]
pub trait LocalVehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> MarketplaceResult<()>;

    async fn find_by_id(&self, vehicle_id: &VehicleId) -> MarketplaceResult<Option<Vehicle>>;

    /// Newest first.
    async fn search(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> MarketplaceResult<Page<Vehicle>>;

    /// Listing details only; never changes `sold` or the owner.
    async fn update(&self, vehicle: &Vehicle) -> MarketplaceResult<()>;

    /// Flip `sold` to true unless it already is. Returns false if the
    /// vehicle was already sold.
    async fn mark_sold(&self, vehicle_id: &VehicleId) -> MarketplaceResult<bool>;

    /// Removes the vehicle together with its purchase requests.
    /// Returns false if no such vehicle.
    async fn delete(&self, vehicle_id: &VehicleId) -> MarketplaceResult<bool>;
}

#[trait_variant::make(PurchaseRequestRepository: Send)]
pub trait LocalPurchaseRequestRepository {
    /// Fails with `PendingRequestExists` if the vehicle already has a
    /// PENDING request.
    async fn create(&self, request: &PurchaseRequest) -> MarketplaceResult<()>;

    async fn find_by_id(
        &self,
        request_id: &PurchaseRequestId,
    ) -> MarketplaceResult<Option<PurchaseRequest>>;

    async fn find_pending_by_vehicle(
        &self,
        vehicle_id: &VehicleId,
    ) -> MarketplaceResult<Option<PurchaseRequest>>;

    /// Newest first.
    async fn list_by_buyer(&self, buyer_id: &UserId) -> MarketplaceResult<Vec<PurchaseRequest>>;

    /// Newest first.
    async fn list_by_vendor(&self, vendor_id: &UserId)
    -> MarketplaceResult<Vec<PurchaseRequest>>;

    /// Persist a DENIED request. Fails with `RequestNotPending` if the
    /// stored request was answered in the meantime.
    async fn record_denial(&self, request: &PurchaseRequest) -> MarketplaceResult<()>;

    /// Persist an ACCEPTED request, mark its vehicle sold and insert the
    /// sale, all or nothing. Fails with `RequestNotPending` or
    /// `VehicleAlreadySold` when a concurrent writer got there first.
    async fn commit_acceptance(
        &self,
        request: &PurchaseRequest,
        sale: &Sale,
    ) -> MarketplaceResult<()>;

    /// Returns false if no such request.
    async fn delete(&self, request_id: &PurchaseRequestId) -> MarketplaceResult<bool>;
}

#[trait_variant::make(SaleRepository: Send)]
pub trait LocalSaleRepository {
    /// Mark the vehicle sold and insert the sale, all or nothing. Fails with
    /// `VehicleAlreadySold` if the vehicle was sold concurrently.
    async fn create_marking_sold(&self, sale: &Sale) -> MarketplaceResult<()>;

    async fn find_by_id(&self, sale_id: &SaleId) -> MarketplaceResult<Option<Sale>>;

    /// Newest first.
    async fn list(&self) -> MarketplaceResult<Vec<Sale>>;

    /// Newest first.
    async fn list_by_vendor(&self, vendor_id: &UserId) -> MarketplaceResult<Vec<Sale>>;

    /// Buyer and price only.
    async fn update(&self, sale: &Sale) -> MarketplaceResult<()>;

    /// Delete the sale and put its vehicle back on the market, all or
    /// nothing. Returns false if no such sale.
    async fn delete_releasing_vehicle(&self, sale: &Sale) -> MarketplaceResult<bool>;
}
