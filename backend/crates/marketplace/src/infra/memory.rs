//! In-memory repository
//!
//! Every trait backed by one mutex-guarded state, so composite writes are
//! atomic just like the PostgreSQL transactions. Intended for tests and
//! local experiments; nothing is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::entity::{PurchaseRequest, Sale, User, Vehicle};
use crate::domain::repository::{
    PurchaseRequestRepository, SaleRepository, UserRepository, VehicleRepository,
};
use crate::domain::value_object::{
    PurchaseRequestId, SaleId, UserId, VehicleId,
    email::Email,
    paging::{Page, PageRequest},
    vehicle_filter::VehicleFilter,
};
use crate::error::{MarketplaceError, MarketplaceResult};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    vehicles: HashMap<VehicleId, Vehicle>,
    requests: HashMap<PurchaseRequestId, PurchaseRequest>,
    sales: HashMap<SaleId, Sale>,
}

impl MemoryState {
    fn email_owner(&self, email: &Email) -> Option<UserId> {
        self.users
            .values()
            .find(|u| u.email == *email)
            .map(|u| u.id)
    }

    fn is_user_referenced(&self, user_id: &UserId) -> bool {
        self.vehicles.values().any(|v| v.vendor_id == *user_id)
            || self
                .requests
                .values()
                .any(|r| r.buyer_id == *user_id || r.vendor_id == *user_id)
            || self
                .sales
                .values()
                .any(|s| s.buyer_id == *user_id || s.vendor_id == *user_id)
    }

    fn has_pending_request(&self, vehicle_id: &VehicleId) -> bool {
        self.requests
            .values()
            .any(|r| r.vehicle_id == *vehicle_id && r.is_pending())
    }

    fn stored_pending(&self, request_id: &PurchaseRequestId) -> MarketplaceResult<()> {
        self.requests
            .get(request_id)
            .ok_or(MarketplaceError::PurchaseRequestNotFound)?
            .ensure_pending()
    }

    fn unsold_vehicle_mut(&mut self, vehicle_id: &VehicleId) -> MarketplaceResult<&mut Vehicle> {
        let vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or(MarketplaceError::VehicleNotFound)?;
        vehicle.ensure_available()?;
        Ok(vehicle)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplaceRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryMarketplaceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MarketplaceResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| MarketplaceError::Internal("in-memory store lock poisoned".to_string()))
    }
}

fn newest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryMarketplaceRepository {
    async fn create(&self, user: &User) -> MarketplaceResult<()> {
        let mut state = self.lock()?;
        if state.email_owner(&user.email).is_some() {
            return Err(MarketplaceError::EmailTaken);
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> MarketplaceResult<Option<User>> {
        Ok(self.lock()?.users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> MarketplaceResult<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> MarketplaceResult<bool> {
        Ok(self.lock()?.email_owner(email).is_some())
    }

    async fn list(&self) -> MarketplaceResult<Vec<User>> {
        let mut users: Vec<User> = self.lock()?.users.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, *u.id.as_uuid()));
        Ok(users)
    }

    async fn update(&self, user: &User) -> MarketplaceResult<()> {
        let mut state = self.lock()?;
        if state
            .email_owner(&user.email)
            .is_some_and(|owner| owner != user.id)
        {
            return Err(MarketplaceError::EmailTaken);
        }
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(MarketplaceError::UserNotFound),
        }
    }

    async fn delete(&self, user_id: &UserId) -> MarketplaceResult<bool> {
        let mut state = self.lock()?;
        if !state.users.contains_key(user_id) {
            return Ok(false);
        }
        if state.is_user_referenced(user_id) {
            return Err(MarketplaceError::InvalidState(
                "User is still referenced by listings or transactions".to_string(),
            ));
        }
        state.users.remove(user_id);
        Ok(true)
    }
}

// ============================================================================
// Vehicle Repository Implementation
// ============================================================================

impl VehicleRepository for InMemoryMarketplaceRepository {
    async fn create(&self, vehicle: &Vehicle) -> MarketplaceResult<()> {
        self.lock()?.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn find_by_id(&self, vehicle_id: &VehicleId) -> MarketplaceResult<Option<Vehicle>> {
        Ok(self.lock()?.vehicles.get(vehicle_id).cloned())
    }

    async fn search(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> MarketplaceResult<Page<Vehicle>> {
        let matching: Vec<Vehicle> = self
            .lock()?
            .vehicles
            .values()
            .filter(|v| filter.matches(&v.brand, &v.model, v.year, v.sold))
            .cloned()
            .collect();
        let matching = newest_first(matching, |v| (v.created_at, *v.id.as_uuid()));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(page.size() as usize)
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn update(&self, vehicle: &Vehicle) -> MarketplaceResult<()> {
        let mut state = self.lock()?;
        let stored = state
            .vehicles
            .get_mut(&vehicle.id)
            .ok_or(MarketplaceError::VehicleNotFound)?;

        stored.brand = vehicle.brand.clone();
        stored.model = vehicle.model.clone();
        stored.year = vehicle.year;
        stored.color = vehicle.color.clone();
        stored.price = vehicle.price;
        stored.vehicle_type = vehicle.vehicle_type.clone();
        stored.photo_urls = vehicle.photo_urls.clone();
        stored.updated_at = vehicle.updated_at;
        Ok(())
    }

    async fn mark_sold(&self, vehicle_id: &VehicleId) -> MarketplaceResult<bool> {
        let mut state = self.lock()?;
        match state.vehicles.get_mut(vehicle_id) {
            Some(vehicle) if !vehicle.sold => {
                vehicle.sold = true;
                vehicle.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, vehicle_id: &VehicleId) -> MarketplaceResult<bool> {
        let mut state = self.lock()?;
        if !state.vehicles.contains_key(vehicle_id) {
            return Ok(false);
        }
        if state.sales.values().any(|s| s.vehicle_id == *vehicle_id) {
            return Err(MarketplaceError::InvalidState(
                "Vehicle is referenced by a sale".to_string(),
            ));
        }
        state.requests.retain(|_, r| r.vehicle_id != *vehicle_id);
        state.vehicles.remove(vehicle_id);
        Ok(true)
    }
}

// ============================================================================
// Purchase Request Repository Implementation
// ============================================================================

impl PurchaseRequestRepository for InMemoryMarketplaceRepository {
    async fn create(&self, request: &PurchaseRequest) -> MarketplaceResult<()> {
        let mut state = self.lock()?;
        if request.is_pending() && state.has_pending_request(&request.vehicle_id) {
            return Err(MarketplaceError::PendingRequestExists);
        }
        state.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        request_id: &PurchaseRequestId,
    ) -> MarketplaceResult<Option<PurchaseRequest>> {
        Ok(self.lock()?.requests.get(request_id).cloned())
    }

    async fn find_pending_by_vehicle(
        &self,
        vehicle_id: &VehicleId,
    ) -> MarketplaceResult<Option<PurchaseRequest>> {
        Ok(self
            .lock()?
            .requests
            .values()
            .find(|r| r.vehicle_id == *vehicle_id && r.is_pending())
            .cloned())
    }

    async fn list_by_buyer(&self, buyer_id: &UserId) -> MarketplaceResult<Vec<PurchaseRequest>> {
        let requests = self
            .lock()?
            .requests
            .values()
            .filter(|r| r.buyer_id == *buyer_id)
            .cloned()
            .collect();
        Ok(newest_first(requests, |r| (r.request_date, *r.id.as_uuid())))
    }

    async fn list_by_vendor(
        &self,
        vendor_id: &UserId,
    ) -> MarketplaceResult<Vec<PurchaseRequest>> {
        let requests = self
            .lock()?
            .requests
            .values()
            .filter(|r| r.vendor_id == *vendor_id)
            .cloned()
            .collect();
        Ok(newest_first(requests, |r| (r.request_date, *r.id.as_uuid())))
    }

    async fn record_denial(&self, request: &PurchaseRequest) -> MarketplaceResult<()> {
        let mut state = self.lock()?;
        state.stored_pending(&request.id)?;
        state.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn commit_acceptance(
        &self,
        request: &PurchaseRequest,
        sale: &Sale,
    ) -> MarketplaceResult<()> {
        let mut state = self.lock()?;

        // Nothing is written until both checks pass.
        state.stored_pending(&request.id)?;
        let vehicle = state.unsold_vehicle_mut(&sale.vehicle_id)?;
        vehicle.sold = true;
        vehicle.updated_at = sale.created_at;

        state.requests.insert(request.id, request.clone());
        state.sales.insert(sale.id, sale.clone());
        Ok(())
    }

    async fn delete(&self, request_id: &PurchaseRequestId) -> MarketplaceResult<bool> {
        Ok(self.lock()?.requests.remove(request_id).is_some())
    }
}

// ============================================================================
// Sale Repository Implementation
// ============================================================================

impl SaleRepository for InMemoryMarketplaceRepository {
    async fn create_marking_sold(&self, sale: &Sale) -> MarketplaceResult<()> {
        let mut state = self.lock()?;

        let vehicle = state.unsold_vehicle_mut(&sale.vehicle_id)?;
        vehicle.sold = true;
        vehicle.updated_at = sale.created_at;

        state.sales.insert(sale.id, sale.clone());
        Ok(())
    }

    async fn find_by_id(&self, sale_id: &SaleId) -> MarketplaceResult<Option<Sale>> {
        Ok(self.lock()?.sales.get(sale_id).cloned())
    }

    async fn list(&self) -> MarketplaceResult<Vec<Sale>> {
        let sales = self.lock()?.sales.values().cloned().collect();
        Ok(newest_first(sales, |s| (s.sale_date, *s.id.as_uuid())))
    }

    async fn list_by_vendor(&self, vendor_id: &UserId) -> MarketplaceResult<Vec<Sale>> {
        let sales = self
            .lock()?
            .sales
            .values()
            .filter(|s| s.vendor_id == *vendor_id)
            .cloned()
            .collect();
        Ok(newest_first(sales, |s| (s.sale_date, *s.id.as_uuid())))
    }

    async fn update(&self, sale: &Sale) -> MarketplaceResult<()> {
        let mut state = self.lock()?;
        let stored = state
            .sales
            .get_mut(&sale.id)
            .ok_or(MarketplaceError::SaleNotFound)?;

        stored.buyer_id = sale.buyer_id;
        stored.price = sale.price;
        stored.updated_at = sale.updated_at;
        Ok(())
    }

    async fn delete_releasing_vehicle(&self, sale: &Sale) -> MarketplaceResult<bool> {
        let mut state = self.lock()?;
        let Some(removed) = state.sales.remove(&sale.id) else {
            return Ok(false);
        };
        if let Some(vehicle) = state.vehicles.get_mut(&removed.vehicle_id) {
            vehicle.release();
        }
        Ok(true)
    }
}
