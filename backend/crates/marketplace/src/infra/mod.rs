//! Infrastructure Layer
//!
//! Repository implementations: PostgreSQL for the server, in-memory for
//! tests.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMarketplaceRepository;
pub use postgres::PgMarketplaceRepository;
