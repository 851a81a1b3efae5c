//! Value Object Module

pub mod email;
pub mod paging;
pub mod price;
pub mod purchase_request_status;
pub mod user_password;
pub mod user_role;
pub mod vehicle_filter;

pub use kernel::id::{PurchaseRequestId, SaleId, UserId, VehicleId};
