//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod purchase_request_workflow;
pub mod sale_registrar;
pub mod user_directory;
pub mod vehicle_catalog;

// Re-exports
pub use config::MarketplaceConfig;
pub use purchase_request_workflow::PurchaseRequestWorkflow;
pub use sale_registrar::SaleRegistrar;
pub use user_directory::{RegisterUserInput, UserDirectory};
pub use vehicle_catalog::VehicleCatalog;
