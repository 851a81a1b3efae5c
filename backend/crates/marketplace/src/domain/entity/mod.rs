//! Entity Module

pub mod purchase_request;
pub mod sale;
pub mod user;
pub mod vehicle;

pub use purchase_request::PurchaseRequest;
pub use sale::Sale;
pub use user::User;
pub use vehicle::{Vehicle, VehicleDetails};
