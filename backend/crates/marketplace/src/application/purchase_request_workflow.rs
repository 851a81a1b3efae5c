//! Purchase Request Workflow
//!
//! Buyers open requests on unsold vehicles; the owning vendor accepts
//! (recording a sale at the listed price) or denies them.

use std::sync::Arc;

use crate::application::sale_registrar::SaleRegistrar;
use crate::domain::entity::{purchase_request::PurchaseRequest, user::User};
use crate::domain::repository::{
    PurchaseRequestRepository, SaleRepository, UserRepository, VehicleRepository,
};
use crate::domain::value_object::{PurchaseRequestId, UserId, VehicleId};
use crate::error::{MarketplaceError, MarketplaceResult};

pub struct PurchaseRequestWorkflow<V, P, S, U>
where
    V: VehicleRepository,
    P: PurchaseRequestRepository,
    S: SaleRepository,
    U: UserRepository,
{
    vehicle_repo: Arc<V>,
    request_repo: Arc<P>,
    registrar: SaleRegistrar<V, S, U>,
}

impl<V, P, S, U> PurchaseRequestWorkflow<V, P, S, U>
where
    V: VehicleRepository,
    P: PurchaseRequestRepository,
    S: SaleRepository,
    U: UserRepository,
{
    pub fn new(vehicle_repo: Arc<V>, request_repo: Arc<P>, sale_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            registrar: SaleRegistrar::new(vehicle_repo.clone(), sale_repo, user_repo),
            vehicle_repo,
            request_repo,
        }
    }

    /// Checks, in order: vehicle exists, is unsold, has no pending request,
    /// and is not the buyer's own listing.
    pub async fn create(&self, vehicle_id: &VehicleId, buyer: &User) -> MarketplaceResult<PurchaseRequest> {
        let vehicle = self
            .vehicle_repo
            .find_by_id(vehicle_id)
            .await?
            .ok_or(MarketplaceError::VehicleNotFound)?;

        vehicle.ensure_available()?;

        if self
            .request_repo
            .find_pending_by_vehicle(vehicle_id)
            .await?
            .is_some()
        {
            return Err(MarketplaceError::PendingRequestExists);
        }

        if vehicle.is_owned_by(&buyer.id) {
            return Err(MarketplaceError::InvalidArgument(
                "Cannot request to buy your own vehicle".to_string(),
            ));
        }

        let request = PurchaseRequest::open(&vehicle, buyer.id);
        self.request_repo.create(&request).await?;

        tracing::info!(
            request_id = %request.id,
            vehicle_id = %request.vehicle_id,
            buyer_id = %request.buyer_id,
            "Purchase request opened"
        );

        Ok(request)
    }

    /// Sale creation, the sold flag and the status change commit together.
    pub async fn accept(&self, request_id: &PurchaseRequestId, vendor: &User) -> MarketplaceResult<PurchaseRequest> {
        let mut request = self.pending_request_of(request_id, vendor).await?;

        let sale = self
            .registrar
            .prepare_sale(&request.vehicle_id, &request.buyer_id, None, vendor)
            .await?;

        request.accept()?;
        self.request_repo.commit_acceptance(&request, &sale).await?;

        tracing::info!(
            request_id = %request.id,
            sale_id = %sale.id,
            vehicle_id = %request.vehicle_id,
            price = %sale.price,
            "Purchase request accepted"
        );

        Ok(request)
    }

    /// No side effects on the vehicle.
    pub async fn deny(&self, request_id: &PurchaseRequestId, vendor: &User) -> MarketplaceResult<PurchaseRequest> {
        let mut request = self.pending_request_of(request_id, vendor).await?;

        request.deny()?;
        self.request_repo.record_denial(&request).await?;

        tracing::info!(request_id = %request.id, "Purchase request denied");

        Ok(request)
    }

    pub async fn get(&self, request_id: &PurchaseRequestId) -> MarketplaceResult<PurchaseRequest> {
        self.request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(MarketplaceError::PurchaseRequestNotFound)
    }

    pub async fn list_by_buyer(&self, buyer_id: &UserId) -> MarketplaceResult<Vec<PurchaseRequest>> {
        self.request_repo.list_by_buyer(buyer_id).await
    }

    pub async fn list_by_vendor(&self, vendor_id: &UserId) -> MarketplaceResult<Vec<PurchaseRequest>> {
        self.request_repo.list_by_vendor(vendor_id).await
    }

    /// Any status may be deleted.
    pub async fn delete(&self, request_id: &PurchaseRequestId) -> MarketplaceResult<()> {
        if !self.request_repo.delete(request_id).await? {
            return Err(MarketplaceError::PurchaseRequestNotFound);
        }

        tracing::info!(request_id = %request_id, "Purchase request deleted");

        Ok(())
    }

    async fn pending_request_of(
        &self,
        request_id: &PurchaseRequestId,
        vendor: &User,
    ) -> MarketplaceResult<PurchaseRequest> {
        let request = self.get(request_id).await?;
        request.ensure_addressed_to(&vendor.id)?;
        request.ensure_pending()?;
        Ok(request)
    }
}
