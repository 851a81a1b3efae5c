//! Presentation Layer
//!
//! HTTP handlers, DTOs, router.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use handlers::{MarketplaceAppState, MarketplaceRepository};
pub use router::{marketplace_router, marketplace_router_generic};
