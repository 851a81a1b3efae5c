//! Marketplace Error Types
//!
//! Domain failures of the marketplace, mapped onto the unified
//! `kernel::error::AppError` at the HTTP boundary.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::{
    purchase_request_status::PurchaseRequestStatus, user_role::UserRole,
};

pub type MarketplaceResult<T> = Result<T, MarketplaceError>;

#[derive(Debug, Error)]
pub enum MarketplaceError {
    #[error("User not found")]
    UserNotFound,

    #[error("Vehicle not found")]
    VehicleNotFound,

    #[error("Purchase request not found")]
    PurchaseRequestNotFound,

    #[error("Sale not found")]
    SaleNotFound,

    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Operation requires the {expected} role")]
    RoleMismatch { expected: UserRole },

    /// Authenticated vendor does not own the vehicle, request or sale.
    #[error("{0} belongs to another vendor")]
    NotOwner(&'static str),

    #[error("Vehicle is already sold")]
    VehicleAlreadySold,

    #[error("Vehicle already has a pending purchase request")]
    PendingRequestExists,

    #[error("Purchase request is {0}, only PENDING requests can be answered")]
    RequestNotPending(PurchaseRequestStatus),

    /// Other state conflicts (sold vehicle cannot be deleted, user still referenced, ...)
    #[error("{0}")]
    InvalidState(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketplaceError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        use MarketplaceError::*;
        match self {
            UserNotFound | VehicleNotFound | PurchaseRequestNotFound | SaleNotFound => {
                ErrorKind::NotFound
            }
            InvalidCredentials => ErrorKind::Unauthorized,
            RoleMismatch { .. } | NotOwner(_) => ErrorKind::Forbidden,
            VehicleAlreadySold
            | PendingRequestExists
            | RequestNotPending(_)
            | InvalidState(_)
            | EmailTaken => ErrorKind::Conflict,
            InvalidArgument(_) => ErrorKind::BadRequest,
            Database(_) | Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            MarketplaceError::InvalidCredentials => {
                err.with_action("Check the email and password")
            }
            MarketplaceError::RoleMismatch { expected } => {
                err.with_action(format!("Sign in with a {expected} account"))
            }
            MarketplaceError::NotOwner(_) => {
                err.with_action("Use the credentials of the owning vendor")
            }
            // Never leak driver messages to clients.
            MarketplaceError::Database(_) => {
                AppError::internal("Database error").with_action("Try again later")
            }
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            MarketplaceError::Database(e) => {
                tracing::error!(error = %e, "Marketplace database error");
            }
            MarketplaceError::Internal(msg) => {
                tracing::error!(message = %msg, "Marketplace internal error");
            }
            MarketplaceError::InvalidCredentials => {
                tracing::warn!("Rejected credentials");
            }
            MarketplaceError::NotOwner(what) => {
                tracing::warn!(resource = what, "Access to another vendor's resource");
            }
            _ => {
                tracing::debug!(error = %self, "Marketplace request rejected");
            }
        }
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<JsonRejection> for MarketplaceError {
    fn from(rejection: JsonRejection) -> Self {
        MarketplaceError::InvalidArgument(rejection.body_text())
    }
}

impl From<PathRejection> for MarketplaceError {
    fn from(rejection: PathRejection) -> Self {
        MarketplaceError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for MarketplaceError {
    fn from(rejection: QueryRejection) -> Self {
        MarketplaceError::InvalidArgument(rejection.body_text())
    }
}

/// Value objects validate into `AppError`; keep client errors client errors.
impl From<AppError> for MarketplaceError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                MarketplaceError::InvalidArgument(err.message().to_string())
            }
            _ => MarketplaceError::Internal(err.to_string()),
        }
    }
}
