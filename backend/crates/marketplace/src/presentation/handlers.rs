//! HTTP Handlers
//!
//! Operations acting on behalf of a user carry that user's credentials in
//! the body; they are checked (with the required role) before the use case
//! runs.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::config::MarketplaceConfig;
use crate::application::{
    PurchaseRequestWorkflow, RegisterUserInput, SaleRegistrar, UserDirectory, VehicleCatalog,
};
use crate::domain::entity::User;
use crate::domain::repository::{
    PurchaseRequestRepository, SaleRepository, UserRepository, VehicleRepository,
};
use crate::domain::value_object::{
    PurchaseRequestId, SaleId, UserId, VehicleId, paging::Page, user_role::UserRole,
    vehicle_filter::VehicleFilter,
};
use crate::error::MarketplaceResult;
use crate::presentation::dto::{
    CreatePurchaseRequestRequest, CredentialsRequest, PurchaseRequestResponse,
    RegisterSaleRequest, RegisterUserRequest, SaleResponse, UpdateSaleRequest, UpdateUserRequest,
    UserResponse, VehicleRequest, VehicleResponse, VehicleSearchParams, VendorCredentialsRequest,
};
use crate::presentation::extract::{ApiJson, ApiPath, ApiQuery};

/// Every repository the handlers need, behind one bound.
pub trait MarketplaceRepository:
    UserRepository
    + VehicleRepository
    + PurchaseRequestRepository
    + SaleRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> MarketplaceRepository for T where
    T: UserRepository
        + VehicleRepository
        + PurchaseRequestRepository
        + SaleRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for marketplace handlers
#[derive(Clone)]
pub struct MarketplaceAppState<R>
where
    R: MarketplaceRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<MarketplaceConfig>,
}

impl<R> MarketplaceAppState<R>
where
    R: MarketplaceRepository,
{
    fn users(&self) -> UserDirectory<R> {
        UserDirectory::new(self.repo.clone(), self.config.clone())
    }

    fn catalog(&self) -> VehicleCatalog<R> {
        VehicleCatalog::new(self.repo.clone(), self.config.clone())
    }

    fn workflow(&self) -> PurchaseRequestWorkflow<R, R, R, R> {
        PurchaseRequestWorkflow::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
        )
    }

    fn registrar(&self) -> SaleRegistrar<R, R, R> {
        SaleRegistrar::new(self.repo.clone(), self.repo.clone(), self.repo.clone())
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> MarketplaceResult<User> {
        self.users().authenticate(email, password, role).await
    }
}

// ============================================================================
// Users
// ============================================================================

/// POST /api/users
pub async fn register_user<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiJson(req): ApiJson<RegisterUserRequest>,
) -> MarketplaceResult<(StatusCode, Json<UserResponse>)>
where
    R: MarketplaceRepository,
{
    let input = RegisterUserInput {
        name: req.name,
        email: req.email,
        password: req.password,
        role: req.role,
        phone_number: req.phone_number,
        cpf: req.cpf,
        date_of_birth: req.date_of_birth,
    };

    let user = state.users().register(input).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users
pub async fn list_users<R>(
    State(state): State<MarketplaceAppState<R>>,
) -> MarketplaceResult<Json<Vec<UserResponse>>>
where
    R: MarketplaceRepository,
{
    let users = state.users().list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_user<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> MarketplaceResult<Json<UserResponse>>
where
    R: MarketplaceRepository,
{
    let user = state.users().get(&user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /api/users/{id}
pub async fn update_user<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> MarketplaceResult<Json<UserResponse>>
where
    R: MarketplaceRepository,
{
    let user = state.users().update(&user_id, &req.name, &req.email).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/{id}
pub async fn delete_user<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> MarketplaceResult<StatusCode>
where
    R: MarketplaceRepository,
{
    state.users().delete(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Vehicles
// ============================================================================

/// POST /api/vehicles
pub async fn register_vehicle<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> MarketplaceResult<(StatusCode, Json<VehicleResponse>)>
where
    R: MarketplaceRepository,
{
    let (credentials, details) = req.into_parts();
    let vendor = state
        .authenticate(&credentials.email, &credentials.password, UserRole::Vendor)
        .await?;

    let vehicle = state.catalog().register(&vendor, details).await?;

    Ok((StatusCode::CREATED, Json(vehicle.into())))
}

/// GET /api/vehicles?brand&model&year&sold&page&size
pub async fn search_vehicles<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiQuery(params): ApiQuery<VehicleSearchParams>,
) -> MarketplaceResult<Json<Page<VehicleResponse>>>
where
    R: MarketplaceRepository,
{
    let filter = VehicleFilter::new(params.brand, params.model, params.year, params.sold);

    let page = state
        .catalog()
        .search(&filter, params.page, params.size)
        .await?;

    Ok(Json(page.map(VehicleResponse::from)))
}

/// GET /api/vehicles/{id}
pub async fn get_vehicle<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(vehicle_id): ApiPath<VehicleId>,
) -> MarketplaceResult<Json<VehicleResponse>>
where
    R: MarketplaceRepository,
{
    let vehicle = state.catalog().get(&vehicle_id).await?;
    Ok(Json(vehicle.into()))
}

/// PUT /api/vehicles/{id}
pub async fn update_vehicle<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(vehicle_id): ApiPath<VehicleId>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> MarketplaceResult<Json<VehicleResponse>>
where
    R: MarketplaceRepository,
{
    let (credentials, details) = req.into_parts();
    let vendor = state
        .authenticate(&credentials.email, &credentials.password, UserRole::Vendor)
        .await?;

    let vehicle = state
        .catalog()
        .update(&vehicle_id, &vendor, details)
        .await?;

    Ok(Json(vehicle.into()))
}

/// PATCH /api/vehicles/{id}/sold
pub async fn mark_vehicle_sold<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(vehicle_id): ApiPath<VehicleId>,
    ApiJson(req): ApiJson<VendorCredentialsRequest>,
) -> MarketplaceResult<Json<VehicleResponse>>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.vendor_email, &req.vendor_password, UserRole::Vendor)
        .await?;

    let vehicle = state.catalog().mark_as_sold(&vehicle_id, &vendor).await?;

    Ok(Json(vehicle.into()))
}

/// DELETE /api/vehicles/{id}
pub async fn delete_vehicle<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(vehicle_id): ApiPath<VehicleId>,
    ApiJson(req): ApiJson<VendorCredentialsRequest>,
) -> MarketplaceResult<StatusCode>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.vendor_email, &req.vendor_password, UserRole::Vendor)
        .await?;

    state.catalog().delete(&vehicle_id, &vendor).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Purchase Requests
// ============================================================================

/// POST /api/purchase-requests
pub async fn create_purchase_request<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiJson(req): ApiJson<CreatePurchaseRequestRequest>,
) -> MarketplaceResult<(StatusCode, Json<PurchaseRequestResponse>)>
where
    R: MarketplaceRepository,
{
    let buyer = state
        .authenticate(&req.buyer_email, &req.buyer_password, UserRole::Buyer)
        .await?;

    let request = state.workflow().create(&req.vehicle_id, &buyer).await?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

/// GET /api/purchase-requests/{id}
pub async fn get_purchase_request<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(request_id): ApiPath<PurchaseRequestId>,
) -> MarketplaceResult<Json<PurchaseRequestResponse>>
where
    R: MarketplaceRepository,
{
    let request = state.workflow().get(&request_id).await?;
    Ok(Json(request.into()))
}

/// POST /api/purchase-requests/query/by-buyer
pub async fn list_purchase_requests_by_buyer<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> MarketplaceResult<Json<Vec<PurchaseRequestResponse>>>
where
    R: MarketplaceRepository,
{
    let buyer = state
        .authenticate(&req.email, &req.password, UserRole::Buyer)
        .await?;

    let requests = state.workflow().list_by_buyer(&buyer.id).await?;

    Ok(Json(
        requests
            .into_iter()
            .map(PurchaseRequestResponse::from)
            .collect(),
    ))
}

/// POST /api/purchase-requests/query/by-vendor
pub async fn list_purchase_requests_by_vendor<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> MarketplaceResult<Json<Vec<PurchaseRequestResponse>>>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.email, &req.password, UserRole::Vendor)
        .await?;

    let requests = state.workflow().list_by_vendor(&vendor.id).await?;

    Ok(Json(
        requests
            .into_iter()
            .map(PurchaseRequestResponse::from)
            .collect(),
    ))
}

/// PUT /api/purchase-requests/{id}/accept
pub async fn accept_purchase_request<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(request_id): ApiPath<PurchaseRequestId>,
    ApiJson(req): ApiJson<VendorCredentialsRequest>,
) -> MarketplaceResult<Json<PurchaseRequestResponse>>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.vendor_email, &req.vendor_password, UserRole::Vendor)
        .await?;

    let request = state.workflow().accept(&request_id, &vendor).await?;

    Ok(Json(request.into()))
}

/// PUT /api/purchase-requests/{id}/deny
pub async fn deny_purchase_request<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(request_id): ApiPath<PurchaseRequestId>,
    ApiJson(req): ApiJson<VendorCredentialsRequest>,
) -> MarketplaceResult<Json<PurchaseRequestResponse>>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.vendor_email, &req.vendor_password, UserRole::Vendor)
        .await?;

    let request = state.workflow().deny(&request_id, &vendor).await?;

    Ok(Json(request.into()))
}

/// DELETE /api/purchase-requests/{id}
pub async fn delete_purchase_request<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(request_id): ApiPath<PurchaseRequestId>,
) -> MarketplaceResult<StatusCode>
where
    R: MarketplaceRepository,
{
    state.workflow().delete(&request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Sales
// ============================================================================

/// POST /api/sales
pub async fn register_sale<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiJson(req): ApiJson<RegisterSaleRequest>,
) -> MarketplaceResult<(StatusCode, Json<SaleResponse>)>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.vendor_email, &req.vendor_password, UserRole::Vendor)
        .await?;

    let sale = state
        .registrar()
        .register_sale(&req.vehicle_id, &req.buyer_id, req.price, &vendor)
        .await?;

    Ok((StatusCode::CREATED, Json(sale.into())))
}

/// GET /api/sales
pub async fn list_sales<R>(
    State(state): State<MarketplaceAppState<R>>,
) -> MarketplaceResult<Json<Vec<SaleResponse>>>
where
    R: MarketplaceRepository,
{
    let sales = state.registrar().list_sales().await?;
    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}

/// POST /api/sales/query/by-vendor
pub async fn list_sales_by_vendor<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> MarketplaceResult<Json<Vec<SaleResponse>>>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.email, &req.password, UserRole::Vendor)
        .await?;

    let sales = state.registrar().list_sales_by_vendor(&vendor.id).await?;

    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}

/// GET /api/sales/{id}
pub async fn get_sale<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(sale_id): ApiPath<SaleId>,
) -> MarketplaceResult<Json<SaleResponse>>
where
    R: MarketplaceRepository,
{
    let sale = state.registrar().get_sale(&sale_id).await?;
    Ok(Json(sale.into()))
}

/// PUT /api/sales/{id}
pub async fn update_sale<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(sale_id): ApiPath<SaleId>,
    ApiJson(req): ApiJson<UpdateSaleRequest>,
) -> MarketplaceResult<Json<SaleResponse>>
where
    R: MarketplaceRepository,
{
    let vendor = state
        .authenticate(&req.vendor_email, &req.vendor_password, UserRole::Vendor)
        .await?;

    let sale = state
        .registrar()
        .update_sale(&sale_id, &req.buyer_id, req.price, &vendor)
        .await?;

    Ok(Json(sale.into()))
}

/// DELETE /api/sales/{id}
pub async fn delete_sale<R>(
    State(state): State<MarketplaceAppState<R>>,
    ApiPath(sale_id): ApiPath<SaleId>,
) -> MarketplaceResult<StatusCode>
where
    R: MarketplaceRepository,
{
    state.registrar().delete_sale(&sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
