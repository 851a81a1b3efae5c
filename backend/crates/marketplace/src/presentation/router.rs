//! Marketplace Router

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use std::sync::Arc;

use crate::application::config::MarketplaceConfig;
use crate::infra::postgres::PgMarketplaceRepository;
use crate::presentation::handlers::{self, MarketplaceAppState, MarketplaceRepository};

/// Create the Marketplace router with PostgreSQL repository
pub fn marketplace_router(repo: PgMarketplaceRepository, config: MarketplaceConfig) -> Router {
    marketplace_router_generic(repo, config)
}

/// Create a generic Marketplace router for any repository implementation
pub fn marketplace_router_generic<R>(repo: R, config: MarketplaceConfig) -> Router
where
    R: MarketplaceRepository,
{
    let state = MarketplaceAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        // Users
        .route(
            "/users",
            post(handlers::register_user::<R>).get(handlers::list_users::<R>),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user::<R>)
                .put(handlers::update_user::<R>)
                .delete(handlers::delete_user::<R>),
        )
        // Vehicles
        .route(
            "/vehicles",
            post(handlers::register_vehicle::<R>).get(handlers::search_vehicles::<R>),
        )
        .route(
            "/vehicles/{id}",
            get(handlers::get_vehicle::<R>)
                .put(handlers::update_vehicle::<R>)
                .delete(handlers::delete_vehicle::<R>),
        )
        .route(
            "/vehicles/{id}/sold",
            patch(handlers::mark_vehicle_sold::<R>),
        )
        // Purchase requests
        .route(
            "/purchase-requests",
            post(handlers::create_purchase_request::<R>),
        )
        .route(
            "/purchase-requests/query/by-buyer",
            post(handlers::list_purchase_requests_by_buyer::<R>),
        )
        .route(
            "/purchase-requests/query/by-vendor",
            post(handlers::list_purchase_requests_by_vendor::<R>),
        )
        .route(
            "/purchase-requests/{id}",
            get(handlers::get_purchase_request::<R>)
                .delete(handlers::delete_purchase_request::<R>),
        )
        .route(
            "/purchase-requests/{id}/accept",
            put(handlers::accept_purchase_request::<R>),
        )
        .route(
            "/purchase-requests/{id}/deny",
            put(handlers::deny_purchase_request::<R>),
        )
        // Sales
        .route(
            "/sales",
            post(handlers::register_sale::<R>).get(handlers::list_sales::<R>),
        )
        .route(
            "/sales/query/by-vendor",
            post(handlers::list_sales_by_vendor::<R>),
        )
        .route(
            "/sales/{id}",
            get(handlers::get_sale::<R>)
                .put(handlers::update_sale::<R>)
                .delete(handlers::delete_sale::<R>),
        )
        .with_state(state)
}
