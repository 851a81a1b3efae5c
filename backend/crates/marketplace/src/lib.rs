//! Marketplace Backend Module
//!
//! Layered structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases (user directory, vehicle catalog,
//!   purchase-request workflow, sale registrar)
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - BUYER / VENDOR accounts with Argon2id-hashed passwords
//! - Vehicle listings with filtered, paginated search
//! - Purchase requests: PENDING, then ACCEPTED or DENIED by the vendor
//! - Sales: accepting a request (or registering directly) marks the
//!   vehicle sold; deleting the sale puts it back on the market
//!
//! ## Authentication
//! Credentials (email + password) travel in the request body of every
//! operation that acts on behalf of a user, and are checked together with
//! the role the operation requires. There are no sessions.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::MarketplaceConfig;
pub use error::{MarketplaceError, MarketplaceResult};
pub use infra::memory::InMemoryMarketplaceRepository;
pub use infra::postgres::PgMarketplaceRepository;
pub use presentation::router::{marketplace_router, marketplace_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
