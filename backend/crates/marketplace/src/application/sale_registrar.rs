//! Sale Registrar
//!
//! Records sales (which flips the vehicle to sold), corrects them, and
//! reverses them (which puts the vehicle back on the market).

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::entity::{sale::Sale, user::User};
use crate::domain::repository::{SaleRepository, UserRepository, VehicleRepository};
use crate::domain::value_object::{SaleId, UserId, VehicleId, price::Price};
use crate::error::{MarketplaceError, MarketplaceResult};

pub struct SaleRegistrar<V, S, U>
where
    V: VehicleRepository,
    S: SaleRepository,
    U: UserRepository,
{
    vehicle_repo: Arc<V>,
    sale_repo: Arc<S>,
    user_repo: Arc<U>,
}

impl<V, S, U> SaleRegistrar<V, S, U>
where
    V: VehicleRepository,
    S: SaleRepository,
    U: UserRepository,
{
    pub fn new(vehicle_repo: Arc<V>, sale_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            vehicle_repo,
            sale_repo,
            user_repo,
        }
    }

    /// Run every precondition of a sale and build it, without persisting.
    ///
    /// Checks, in order: vehicle exists, `vendor` owns it, it is unsold,
    /// buyer exists. `price: None` sells at the vehicle's listed price.
    pub(crate) async fn prepare_sale(
        &self,
        vehicle_id: &VehicleId,
        buyer_id: &UserId,
        price: Option<Price>,
        vendor: &User,
    ) -> MarketplaceResult<Sale> {
        let vehicle = self
            .vehicle_repo
            .find_by_id(vehicle_id)
            .await?
            .ok_or(MarketplaceError::VehicleNotFound)?;

        vehicle.ensure_owned_by(&vendor.id)?;
        vehicle.ensure_available()?;

        if self.user_repo.find_by_id(buyer_id).await?.is_none() {
            return Err(MarketplaceError::UserNotFound);
        }

        Ok(Sale::record(&vehicle, *buyer_id, price.unwrap_or(vehicle.price)))
    }

    /// Price is validated before anything is looked up.
    pub async fn register_sale(
        &self,
        vehicle_id: &VehicleId,
        buyer_id: &UserId,
        price: Decimal,
        vendor: &User,
    ) -> MarketplaceResult<Sale> {
        let price = Price::new(price)?;

        let sale = self
            .prepare_sale(vehicle_id, buyer_id, Some(price), vendor)
            .await?;
        self.sale_repo.create_marking_sold(&sale).await?;

        tracing::info!(
            sale_id = %sale.id,
            vehicle_id = %sale.vehicle_id,
            buyer_id = %sale.buyer_id,
            price = %sale.price,
            "Sale registered"
        );

        Ok(sale)
    }

    pub async fn delete_sale(&self, sale_id: &SaleId) -> MarketplaceResult<()> {
        let sale = self.get_sale(sale_id).await?;

        if !self.sale_repo.delete_releasing_vehicle(&sale).await? {
            return Err(MarketplaceError::SaleNotFound);
        }

        tracing::info!(
            sale_id = %sale.id,
            vehicle_id = %sale.vehicle_id,
            "Sale deleted, vehicle back on the market"
        );

        Ok(())
    }

    pub async fn list_sales(&self) -> MarketplaceResult<Vec<Sale>> {
        self.sale_repo.list().await
    }

    pub async fn get_sale(&self, sale_id: &SaleId) -> MarketplaceResult<Sale> {
        self.sale_repo
            .find_by_id(sale_id)
            .await?
            .ok_or(MarketplaceError::SaleNotFound)
    }

    pub async fn list_sales_by_vendor(&self, vendor_id: &UserId) -> MarketplaceResult<Vec<Sale>> {
        self.sale_repo.list_by_vendor(vendor_id).await
    }

    /// Correct the buyer and/or price. Vehicle, vendor and date stay.
    pub async fn update_sale(
        &self,
        sale_id: &SaleId,
        buyer_id: &UserId,
        price: Decimal,
        vendor: &User,
    ) -> MarketplaceResult<Sale> {
        let price = Price::new(price)?;

        let mut sale = self.get_sale(sale_id).await?;
        sale.ensure_sold_by(&vendor.id)?;

        if self.user_repo.find_by_id(buyer_id).await?.is_none() {
            return Err(MarketplaceError::UserNotFound);
        }

        sale.amend(*buyer_id, price);
        self.sale_repo.update(&sale).await?;

        tracing::info!(sale_id = %sale.id, price = %sale.price, "Sale updated");

        Ok(sale)
    }
}
