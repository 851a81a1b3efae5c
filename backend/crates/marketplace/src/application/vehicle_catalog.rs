//! Vehicle Catalog
//!
//! Listing CRUD for vendors and the public search.

use std::sync::Arc;

use crate::application::config::MarketplaceConfig;
use crate::domain::entity::vehicle::{Vehicle, VehicleDetails};
use crate::domain::entity::user::User;
use crate::domain::repository::VehicleRepository;
use crate::domain::value_object::{
    VehicleId, paging::Page, user_role::UserRole, vehicle_filter::VehicleFilter,
};
use crate::error::{MarketplaceError, MarketplaceResult};

pub struct VehicleCatalog<V>
where
    V: VehicleRepository,
{
    vehicle_repo: Arc<V>,
    config: Arc<MarketplaceConfig>,
}

impl<V> VehicleCatalog<V>
where
    V: VehicleRepository,
{
    pub fn new(vehicle_repo: Arc<V>, config: Arc<MarketplaceConfig>) -> Self {
        Self {
            vehicle_repo,
            config,
        }
    }

    pub async fn register(&self, vendor: &User, details: VehicleDetails) -> MarketplaceResult<Vehicle> {
        if !vendor.is_vendor() {
            return Err(MarketplaceError::RoleMismatch {
                expected: UserRole::Vendor,
            });
        }

        let vehicle = Vehicle::list(vendor.id, details)?;
        self.vehicle_repo.create(&vehicle).await?;

        tracing::info!(
            vehicle_id = %vehicle.id,
            vendor_id = %vendor.id,
            price = %vehicle.price,
            "Vehicle listed"
        );

        Ok(vehicle)
    }

    /// `page` is zero-based; `size` defaults and is capped per config.
    pub async fn search(
        &self,
        filter: &VehicleFilter,
        page: Option<u32>,
        size: Option<u32>,
    ) -> MarketplaceResult<Page<Vehicle>> {
        let page = self.config.page_request(page, size);
        self.vehicle_repo.search(filter, page).await
    }

    pub async fn get(&self, vehicle_id: &VehicleId) -> MarketplaceResult<Vehicle> {
        self.vehicle_repo
            .find_by_id(vehicle_id)
            .await?
            .ok_or(MarketplaceError::VehicleNotFound)
    }

    pub async fn update(
        &self,
        vehicle_id: &VehicleId,
        vendor: &User,
        details: VehicleDetails,
    ) -> MarketplaceResult<Vehicle> {
        let mut vehicle = self.get(vehicle_id).await?;
        vehicle.ensure_owned_by(&vendor.id)?;

        vehicle.revise(details)?;
        self.vehicle_repo.update(&vehicle).await?;

        tracing::info!(vehicle_id = %vehicle.id, "Vehicle listing updated");

        Ok(vehicle)
    }

    /// Flag the vehicle sold without recording a sale (off-platform deal).
    pub async fn mark_as_sold(&self, vehicle_id: &VehicleId, vendor: &User) -> MarketplaceResult<Vehicle> {
        let mut vehicle = self.get(vehicle_id).await?;
        vehicle.ensure_owned_by(&vendor.id)?;
        vehicle.mark_sold()?;

        if !self.vehicle_repo.mark_sold(vehicle_id).await? {
            return Err(MarketplaceError::VehicleAlreadySold);
        }

        tracing::info!(vehicle_id = %vehicle.id, "Vehicle marked as sold");

        Ok(vehicle)
    }

    pub async fn delete(&self, vehicle_id: &VehicleId, vendor: &User) -> MarketplaceResult<()> {
        let vehicle = self.get(vehicle_id).await?;
        vehicle.ensure_owned_by(&vendor.id)?;

        if vehicle.sold {
            return Err(MarketplaceError::InvalidState(
                "A sold vehicle cannot be deleted".to_string(),
            ));
        }

        if !self.vehicle_repo.delete(vehicle_id).await? {
            return Err(MarketplaceError::VehicleNotFound);
        }

        tracing::info!(vehicle_id = %vehicle_id, "Vehicle deleted");

        Ok(())
    }
}
