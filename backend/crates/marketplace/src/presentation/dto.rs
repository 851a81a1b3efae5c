//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{PurchaseRequest, Sale, User, Vehicle, VehicleDetails};
use crate::domain::value_object::{
    PurchaseRequestId, SaleId, UserId, VehicleId, purchase_request_status::PurchaseRequestStatus,
    user_role::UserRole,
};

// ============================================================================
// Credentials
// ============================================================================

/// Email + password of the acting user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Users
// ============================================================================

/// Register user request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default, alias = "phonenumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Update user request (name and email only)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

/// User response. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub cpf: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_db(),
            role: user.role,
            phone_number: user.phone_number,
            cpf: user.cpf,
            date_of_birth: user.date_of_birth,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Vehicles
// ============================================================================

/// Register / update vehicle request, signed with vendor credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub color: String,
    /// Accepts a JSON string ("45000.00") or number
    pub price: Decimal,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub vendor_email: String,
    pub vendor_password: String,
}

impl VehicleRequest {
    pub fn into_parts(self) -> (CredentialsRequest, VehicleDetails) {
        let credentials = CredentialsRequest {
            email: self.vendor_email,
            password: self.vendor_password,
        };
        let details = VehicleDetails {
            brand: self.brand,
            model: self.model,
            year: self.year,
            color: self.color,
            price: self.price,
            vehicle_type: self.vehicle_type,
            photo_urls: self.photo_urls,
        };
        (credentials, details)
    }
}

/// Vendor credentials for mark-sold / delete
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCredentialsRequest {
    pub vendor_email: String,
    pub vendor_password: String,
}

/// Query string of `GET /vehicles`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleSearchParams {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub sold: Option<bool>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Vehicle response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: VehicleId,
    pub vendor_id: UserId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: Decimal,
    pub vehicle_type: String,
    pub photo_urls: Vec<String>,
    pub sold: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vendor_id: vehicle.vendor_id,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            color: vehicle.color,
            price: vehicle.price.amount(),
            vehicle_type: vehicle.vehicle_type,
            photo_urls: vehicle.photo_urls,
            sold: vehicle.sold,
            created_at: vehicle.created_at,
        }
    }
}

// ============================================================================
// Purchase Requests
// ============================================================================

/// Create purchase request, signed with buyer credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequestRequest {
    pub vehicle_id: VehicleId,
    pub buyer_email: String,
    pub buyer_password: String,
}

/// Purchase request response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestResponse {
    pub id: PurchaseRequestId,
    pub vehicle_id: VehicleId,
    pub buyer_id: UserId,
    pub vendor_id: UserId,
    pub status: PurchaseRequestStatus,
    pub request_date: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
}

impl From<PurchaseRequest> for PurchaseRequestResponse {
    fn from(request: PurchaseRequest) -> Self {
        Self {
            id: request.id,
            vehicle_id: request.vehicle_id,
            buyer_id: request.buyer_id,
            vendor_id: request.vendor_id,
            status: request.status,
            request_date: request.request_date,
            response_date: request.response_date,
        }
    }
}

// ============================================================================
// Sales
// ============================================================================

/// Register sale request, signed with vendor credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSaleRequest {
    pub vehicle_id: VehicleId,
    pub buyer_id: UserId,
    pub price: Decimal,
    pub vendor_email: String,
    pub vendor_password: String,
}

/// Update sale request (buyer and price only)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleRequest {
    pub buyer_id: UserId,
    pub price: Decimal,
    pub vendor_email: String,
    pub vendor_password: String,
}

/// Sale response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: SaleId,
    pub vehicle_id: VehicleId,
    pub vendor_id: UserId,
    pub buyer_id: UserId,
    pub price: Decimal,
    pub sale_date: DateTime<Utc>,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            vehicle_id: sale.vehicle_id,
            vendor_id: sale.vendor_id,
            buyer_id: sale.buyer_id,
            price: sale.price.amount(),
            sale_date: sale.sale_date,
        }
    }
}
