//! Request extractors whose rejections render as problem documents.
//!
//! axum's own `Json`, `Path` and `Query` reject with plain-text bodies;
//! these wrappers route the rejection through `MarketplaceError` instead.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::MarketplaceError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(MarketplaceError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(MarketplaceError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(MarketplaceError))]
pub struct ApiQuery<T>(pub T);
