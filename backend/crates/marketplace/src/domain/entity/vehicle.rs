//! Vehicle Entity
//!
//! A listing owned by a vendor. `sold` flips to true when a sale is recorded
//! (or the vendor marks it manually) and back when the sale is deleted.

use chrono::{DateTime, Datelike, Utc};
use kernel::error::app_error::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::value_object::{UserId, VehicleId, price::Price};
use crate::error::{MarketplaceError, MarketplaceResult};

/// First production automobile
pub const FIRST_MODEL_YEAR: i32 = 1886;

const TEXT_MAX_LENGTH: usize = 80;
const MAX_PHOTOS: usize = 20;

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub vendor_id: UserId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: Price,
    pub vehicle_type: String,
    pub photo_urls: Vec<String>,
    pub sold: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vendor-editable part of a listing, unvalidated.
#[derive(Debug, Clone)]
pub struct VehicleDetails {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price: Decimal,
    pub vehicle_type: String,
    pub photo_urls: Vec<String>,
}

struct ValidDetails {
    brand: String,
    model: String,
    year: i32,
    color: String,
    price: Price,
    vehicle_type: String,
    photo_urls: Vec<String>,
}

impl VehicleDetails {
    fn validate(self) -> AppResult<ValidDetails> {
        let brand = required_text("Brand", &self.brand)?;
        let model = required_text("Model", &self.model)?;
        let color = optional_text("Color", &self.color)?;
        let vehicle_type = optional_text("Vehicle type", &self.vehicle_type)?;

        let latest_year = Utc::now().year() + 1;
        if !(FIRST_MODEL_YEAR..=latest_year).contains(&self.year) {
            return Err(AppError::bad_request(format!(
                "Year must be between {FIRST_MODEL_YEAR} and {latest_year}"
            )));
        }

        let price = Price::new(self.price)?;

        let photo_urls: Vec<String> = self
            .photo_urls
            .iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if photo_urls.len() > MAX_PHOTOS {
            return Err(AppError::bad_request(format!(
                "At most {MAX_PHOTOS} photos per vehicle"
            )));
        }

        Ok(ValidDetails {
            brand,
            model,
            year: self.year,
            color,
            price,
            vehicle_type,
            photo_urls,
        })
    }
}

impl Vehicle {
    /// New, unsold listing.
    pub fn list(vendor_id: UserId, details: VehicleDetails) -> AppResult<Self> {
        let d = details.validate()?;
        let now = Utc::now();

        Ok(Self {
            id: VehicleId::new(),
            vendor_id,
            brand: d.brand,
            model: d.model,
            year: d.year,
            color: d.color,
            price: d.price,
            vehicle_type: d.vehicle_type,
            photo_urls: d.photo_urls,
            sold: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the listing details; owner and sold flag are untouched.
    pub fn revise(&mut self, details: VehicleDetails) -> AppResult<()> {
        let d = details.validate()?;
        self.brand = d.brand;
        self.model = d.model;
        self.year = d.year;
        self.color = d.color;
        self.price = d.price;
        self.vehicle_type = d.vehicle_type;
        self.photo_urls = d.photo_urls;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.vendor_id == *user_id
    }

    pub fn ensure_owned_by(&self, user_id: &UserId) -> MarketplaceResult<()> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(MarketplaceError::NotOwner("Vehicle"))
        }
    }

    pub fn ensure_available(&self) -> MarketplaceResult<()> {
        if self.sold {
            Err(MarketplaceError::VehicleAlreadySold)
        } else {
            Ok(())
        }
    }

    pub fn mark_sold(&mut self) -> MarketplaceResult<()> {
        self.ensure_available()?;
        self.sold = true;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Back on the market, e.g. after its sale was deleted.
    pub fn release(&mut self) {
        self.sold = false;
        self.updated_at = Utc::now();
    }
}

fn required_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} cannot be blank")));
    }
    optional_text(field, value)
}

fn optional_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.chars().count() > TEXT_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {TEXT_MAX_LENGTH} characters"
        )));
    }
    Ok(value.to_string())
}
